//! Integration with spider library for web crawling

use async_trait::async_trait;
use spider::tokio;
use spider::tokio::sync::broadcast::error::RecvError;
use spider::website::Website;
use spider_utils::spider_transformations::transformation::content::{
    ReturnFormat, TransformConfig, transform_content,
};
use tracing::{debug, info, info_span, instrument, warn};
use url::Url;

use crate::crawler::error::CrawlError;
use crate::crawler::filter::{has_enough_content, should_skip_url};
use crate::crawler::relevance::KeywordScorer;
use crate::crawler::{Crawler, CrawlerConfig, Page};

/// Crawler backed by the `spider` engine.
///
/// Created once at startup and shared between requests; every call to
/// [`Crawler::crawl`] builds its own `Website` for the duration of that crawl.
#[derive(Debug, Clone)]
pub struct SpiderCrawler {
    config: CrawlerConfig,
    scorer: KeywordScorer,
}

impl SpiderCrawler {
    /// Create a crawler with the given configuration
    pub fn new(config: CrawlerConfig) -> Self {
        let scorer = KeywordScorer::new(
            config.relevance_keywords.iter().cloned(),
            config.relevance_weight,
        );
        Self { config, scorer }
    }

    /// Get the crawler configuration
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }
}

impl Default for SpiderCrawler {
    fn default() -> Self {
        Self::new(CrawlerConfig::default())
    }
}

#[async_trait]
impl Crawler for SpiderCrawler {
    /// Crawl a website and convert each page to markdown
    ///
    /// # Arguments
    ///
    /// * `seed_url` - The URL to start from
    /// * `max_depth` - Maximum link depth from the seed
    /// * `max_pages` - Maximum number of pages to return
    ///
    /// # Returns
    ///
    /// The content pages, most relevant first (seed page leading)
    #[instrument(skip(self))]
    async fn crawl(
        &self,
        seed_url: &str,
        max_depth: u32,
        max_pages: u32,
    ) -> Result<Vec<Page>, CrawlError> {
        let parsed = Url::parse(seed_url)?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(CrawlError::InvalidUrl(seed_url.to_string()));
        }

        info!(
            "Starting deep crawl of {} (max_depth={}, max_pages={})",
            seed_url, max_depth, max_pages
        );
        debug!("Crawler config: {:?}", self.config);

        let mut website = Website::new(seed_url);
        website
            .configuration
            .with_respect_robots_txt(self.config.respect_robots_txt)
            .with_user_agent(Some(self.config.user_agent.as_str()))
            .with_delay(self.config.rate_limit_ms)
            .with_depth(max_depth.try_into().unwrap_or(0))
            .with_limit(max_pages);

        let mut rx = website.subscribe(64);

        let min_page_chars = self.config.min_page_chars;
        let skip_patterns = self.config.skip_patterns.clone();
        let handle = tokio::spawn(async move {
            let mut pages = Vec::new();
            loop {
                let page = match rx.recv().await {
                    Ok(page) => page,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Page receiver lagged, {} pages were not processed", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let span = info_span!("process_page", url = %page.get_url());
                if let Some(converted) =
                    span.in_scope(|| convert_page(&page, &skip_patterns, min_page_chars))
                {
                    pages.push(converted);
                }
            }
            pages
        });

        website.crawl().await;
        website.unsubscribe();
        let pages = handle
            .await
            .map_err(|e| CrawlError::Engine(format!("Task join error: {}", e)))?;

        let mut pages = self.scorer.order(pages, seed_url);
        pages.truncate(max_pages as usize);
        info!("Successfully crawled {} pages", pages.len());
        Ok(pages)
    }
}

/// Convert a fetched page to markdown, or `None` if it is filtered out
fn convert_page(
    page: &spider::page::Page,
    skip_patterns: &[String],
    min_page_chars: usize,
) -> Option<Page> {
    if should_skip_url(page.get_url(), skip_patterns) {
        debug!("Skipping non-content URL: {}", page.get_url());
        return None;
    }

    let transform_config = TransformConfig {
        return_format: ReturnFormat::Markdown,
        readability: true,
        main_content: true,
        ..Default::default()
    };

    let markdown = transform_content(page, &transform_config, &None, &None, &None);
    if !has_enough_content(&markdown, min_page_chars) {
        debug!("Skipping page with insufficient content: {}", page.get_url());
        return None;
    }

    info!(
        "Extracted content from: {} ({} chars)",
        page.get_url(),
        markdown.len()
    );
    Some(Page {
        url: page.get_url().to_string(),
        content: markdown,
    })
}
