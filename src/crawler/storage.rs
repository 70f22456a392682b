//! JSON persistence for crawled page sets
//!
//! The `crawl` command saves its pages with [`save_pages`]; `extract` can
//! read them back with [`load_pages`] and replay them through the pipeline
//! with [`SavedCrawler`], so a crawl does not have to be repeated while
//! iterating on extraction.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::{CrawlError, Crawler, Page};

/// On-disk representation of a crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSet {
    /// Seed URL the pages were crawled from
    #[serde(default)]
    pub seed_url: Option<String>,

    /// Pages in crawl-yield order
    pub pages: Vec<Page>,
}

impl PageSet {
    /// The recorded seed URL, or the first page's URL for bare arrays
    pub fn seed(&self) -> Option<&str> {
        self.seed_url
            .as_deref()
            .or_else(|| self.pages.first().map(|page| page.url.as_str()))
    }
}

/// Serves a saved [`PageSet`] in place of a live crawl
#[derive(Debug, Clone)]
pub struct SavedCrawler {
    pages: Vec<Page>,
}

impl SavedCrawler {
    pub fn new(set: PageSet) -> Self {
        Self { pages: set.pages }
    }
}

#[async_trait]
impl Crawler for SavedCrawler {
    async fn crawl(
        &self,
        seed_url: &str,
        _max_depth: u32,
        max_pages: u32,
    ) -> Result<Vec<Page>, CrawlError> {
        debug!("Replaying {} saved pages for {}", self.pages.len(), seed_url);
        Ok(self
            .pages
            .iter()
            .take(max_pages as usize)
            .cloned()
            .collect())
    }
}

/// Write pages as pretty JSON, creating parent directories as needed
pub async fn save_pages(
    path: impl AsRef<Path>,
    seed_url: Option<&str>,
    pages: &[Page],
) -> Result<(), CrawlError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let set = PageSet {
        seed_url: seed_url.map(str::to_string),
        pages: pages.to_vec(),
    };
    let json = serde_json::to_string_pretty(&set)?;
    fs::write(path, json).await?;
    debug!("Saved {} pages to {}", pages.len(), path.display());
    Ok(())
}

/// Read pages written by [`save_pages`].
///
/// A bare JSON array of pages is accepted as well.
pub async fn load_pages(path: impl AsRef<Path>) -> Result<PageSet, CrawlError> {
    let raw = fs::read_to_string(path.as_ref()).await?;
    if raw.trim_start().starts_with('[') {
        let pages: Vec<Page> = serde_json::from_str(&raw)?;
        return Ok(PageSet {
            seed_url: None,
            pages,
        });
    }
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::aggregator::AggregationLimits;
    use crate::extraction::ExtractionClient;
    use crate::extraction::mock::MockGenerator;
    use crate::pipeline::{NO_CONTENT_MESSAGE, Pipeline, ScrapeRequest};
    use crate::schema::ExtractionContract;

    #[tokio::test]
    async fn test_save_and_load_page_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/pages.json");
        let pages = vec![
            Page::new("https://vet.example/", "Welcome to the clinic"),
            Page::new("https://vet.example/hours", "Mon-Fri 8am-6pm"),
        ];

        save_pages(&path, Some("https://vet.example/"), &pages)
            .await
            .unwrap();
        let loaded = load_pages(&path).await.unwrap();

        assert_eq!(loaded.seed_url.as_deref(), Some("https://vet.example/"));
        assert_eq!(loaded.pages, pages);
    }

    #[tokio::test]
    async fn test_load_bare_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.json");
        tokio::fs::write(&path, r#"[{"url": "https://vet.example/", "content": "hi"}]"#)
            .await
            .unwrap();

        let loaded = load_pages(&path).await.unwrap();

        assert!(loaded.seed_url.is_none());
        assert_eq!(loaded.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_pages("/nonexistent/siteprofile/pages.json").await;
        assert!(matches!(result, Err(CrawlError::Storage(_))));
    }

    fn saved_set() -> PageSet {
        PageSet {
            seed_url: None,
            pages: vec![
                Page::new("https://vet.example/", "Happy Paws Veterinary Clinic"),
                Page::new("https://vet.example/blank", "   "),
                Page::new("https://vet.example/hours", "Mon-Fri 08:00-18:00"),
            ],
        }
    }

    fn pipeline_over(set: PageSet, generator: MockGenerator) -> Pipeline {
        let extraction = ExtractionClient::new(
            Arc::new(generator),
            ExtractionContract::current().unwrap(),
            AggregationLimits::default(),
        );
        Pipeline::new(Arc::new(SavedCrawler::new(set)), extraction)
    }

    #[test]
    fn test_seed_falls_back_to_first_page() {
        let mut set = saved_set();
        assert_eq!(set.seed(), Some("https://vet.example/"));

        set.seed_url = Some("https://www.vet.example/".to_string());
        assert_eq!(set.seed(), Some("https://www.vet.example/"));

        assert_eq!(PageSet { seed_url: None, pages: vec![] }.seed(), None);
    }

    #[tokio::test]
    async fn test_saved_crawler_respects_max_pages() {
        let crawler = SavedCrawler::new(saved_set());

        let pages = crawler.crawl("https://vet.example/", 3, 2).await.unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].url, "https://vet.example/");
    }

    #[tokio::test]
    async fn test_saved_pages_run_through_pipeline() {
        let generator = MockGenerator::returning(json!({"name": "Happy Paws"}));
        let pipeline = pipeline_over(saved_set(), generator.clone());

        let envelope = pipeline
            .run_guarded(&ScrapeRequest::new("https://vet.example/"))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.pages_crawled, 2);
        assert_eq!(envelope.data.unwrap().name, "Happy Paws");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_saved_pages_report_no_content() {
        let set = PageSet {
            seed_url: Some("https://vet.example/".to_string()),
            pages: vec![Page::new("https://vet.example/", "")],
        };
        let generator = MockGenerator::default();
        let pipeline = pipeline_over(set, generator.clone());

        let envelope = pipeline
            .run_guarded(&ScrapeRequest::new("https://vet.example/"))
            .await
            .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some(NO_CONTENT_MESSAGE));
        assert_eq!(generator.call_count(), 0);
    }
}
