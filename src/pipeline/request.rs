//! Inbound scrape request and its validation

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::PipelineError;

/// Default link depth
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default page limit
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Accepted `max_depth` range
pub const MAX_DEPTH_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Accepted `max_pages` range
pub const MAX_PAGES_RANGE: std::ops::RangeInclusive<u32> = 1..=200;

/// http(s) scheme, then a domain, `localhost` or an IPv4 address, an optional
/// port and an optional path
const URL_PATTERN: &str = r"^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,63}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$";

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(URL_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("URL pattern is a valid regex")
});

/// A request to crawl a website and extract its business profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// Seed URL
    pub url: String,

    /// Maximum link depth from the seed
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of pages to crawl
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

impl ScrapeRequest {
    /// Request with default limits
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Check the URL syntax and the limit ranges
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !is_valid_url(&self.url) {
            return Err(PipelineError::InvalidInput(format!(
                "Invalid URL format: {}",
                self.url
            )));
        }
        if !MAX_DEPTH_RANGE.contains(&self.max_depth) {
            return Err(PipelineError::InvalidInput(format!(
                "max_depth must be between {} and {}, got {}",
                MAX_DEPTH_RANGE.start(),
                MAX_DEPTH_RANGE.end(),
                self.max_depth
            )));
        }
        if !MAX_PAGES_RANGE.contains(&self.max_pages) {
            return Err(PipelineError::InvalidInput(format!(
                "max_pages must be between {} and {}, got {}",
                MAX_PAGES_RANGE.start(),
                MAX_PAGES_RANGE.end(),
                self.max_pages
            )));
        }
        Ok(())
    }
}

/// Whether `url` is a syntactically valid http(s) seed URL
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    #[test]
    fn test_accepts_valid_urls() {
        for url in [
            "https://example.com",
            "http://example.com/",
            "https://www.happy-paws.vet/contact-us",
            "HTTPS://EXAMPLE.COM/About",
            "http://localhost:8080/",
            "http://127.0.0.1",
            "https://example.co.uk/hours?lang=en",
            "https://example.com.",
            "https://vet.example/",
            "https://happypaws.veterinary/",
            "https://acme.company",
        ] {
            assert!(is_valid_url(url), "{}", url);
        }
    }

    #[test]
    fn test_rejects_invalid_urls() {
        for url in [
            "not-a-url",
            "ftp://example.com",
            "http://",
            "https://example",
            "example.com",
            "https://exa mple.com",
            "https://example.com/path with space",
            "",
        ] {
            assert!(!is_valid_url(url), "{}", url);
        }
    }

    #[test]
    fn test_defaults_when_deserializing() {
        let request: ScrapeRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();

        assert_eq!(request, ScrapeRequest::new("https://example.com"));
        assert_eq!(request.max_depth, 3);
        assert_eq!(request.max_pages, 50);
    }

    #[test]
    fn test_validate_bounds() {
        let base = ScrapeRequest::new("https://example.com");

        assert_ok!(base.clone().validate());
        assert_ok!(base.clone().with_max_depth(1).with_max_pages(1).validate());
        assert_ok!(base.clone().with_max_depth(10).with_max_pages(200).validate());
        assert!(matches!(
            base.clone().with_max_depth(0).validate(),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            base.clone().with_max_depth(11).validate(),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            base.clone().with_max_pages(0).validate(),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            base.with_max_pages(201).validate(),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_url() {
        let error = assert_err!(ScrapeRequest::new("not-a-url").validate());

        assert!(matches!(error, PipelineError::InvalidInput(message) if message.contains("not-a-url")));
    }
}
