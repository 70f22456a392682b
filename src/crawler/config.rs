//! # Crawler Configuration Module
//!
//! Configuration for `SpiderCrawler`: politeness (rate limit, robots.txt,
//! user agent), content filtering, and relevance ordering. Depth and page
//! limits are per-request and are passed to `Crawler::crawl` instead.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The configuration struct
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration

use crate::crawler::filter::DEFAULT_SKIP_PATTERNS;
use crate::crawler::relevance::DEFAULT_KEYWORDS;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Rate limit in milliseconds between requests
    pub rate_limit_ms: u64,

    /// Whether to respect robots.txt
    pub respect_robots_txt: bool,

    /// User agent to use for requests
    pub user_agent: String,

    /// Pages whose converted content is shorter than this are dropped
    pub min_page_chars: usize,

    /// URL substrings (lowercase) that mark non-content pages
    pub skip_patterns: Vec<String>,

    /// Keywords used to order pages by relevance
    pub relevance_keywords: Vec<String>,

    /// Share of the relevance score taken by keywords, between 0.0 and 1.0;
    /// the rest favors shallow URL paths
    pub relevance_weight: f32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: 250,
            respect_robots_txt: true,
            user_agent: format!("siteprofile/{}", env!("CARGO_PKG_VERSION")),
            min_page_chars: 100,
            skip_patterns: DEFAULT_SKIP_PATTERNS.iter().map(|s| s.to_string()).collect(),
            relevance_keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            relevance_weight: 0.7,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the rate limit in milliseconds between requests
    pub fn rate_limit_ms(mut self, rate_limit_ms: u64) -> Self {
        self.config.rate_limit_ms = rate_limit_ms;
        self
    }

    /// Set whether to respect robots.txt
    pub fn respect_robots_txt(mut self, respect_robots_txt: bool) -> Self {
        self.config.respect_robots_txt = respect_robots_txt;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the minimum converted content length for a page to be kept
    pub fn min_page_chars(mut self, min_page_chars: usize) -> Self {
        self.config.min_page_chars = min_page_chars;
        self
    }

    /// Replace the non-content URL patterns
    pub fn skip_patterns(mut self, skip_patterns: Vec<String>) -> Self {
        self.config.skip_patterns = skip_patterns;
        self
    }

    /// Replace the relevance keywords
    pub fn relevance_keywords(mut self, keywords: Vec<String>) -> Self {
        self.config.relevance_keywords = keywords;
        self
    }

    /// Set the relevance weight (clamped to 0.0..=1.0)
    pub fn relevance_weight(mut self, weight: f32) -> Self {
        self.config.relevance_weight = weight.clamp(0.0, 1.0);
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }
}
