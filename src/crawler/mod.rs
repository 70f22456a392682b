//! # Website Crawler Module
//!
//! This module is the crawl collaborator of the extraction pipeline. Given a
//! seed URL and depth/page limits it produces the ordered page store that the
//! aggregator consumes.
//!
//! ## Key Components
//!
//! - `Page`: One crawled unit of content, identified by URL
//! - `Crawler`: The trait the pipeline depends on
//! - `SpiderCrawler`: `spider`-backed implementation with markdown conversion
//! - `CrawlerConfig`: Politeness and filtering options for `SpiderCrawler`
//! - `storage`: JSON persistence for crawled page sets
//!
//! ## Features
//!
//! - Non-content URL denylist (feeds, robots/sitemap files, API and download paths)
//! - Minimum content length filtering
//! - Keyword relevance ordering so contact, hours and staff pages come first

mod config;
mod error;
pub mod filter;
pub mod mock;
pub mod relevance;
mod spider_integration;
pub mod storage;

pub use config::CrawlerConfig;
pub use error::CrawlError;
pub use spider_integration::SpiderCrawler;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A crawled page: its source URL and the extracted text content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// URL of the page
    pub url: String,

    /// Content of the page in Markdown format
    #[serde(default)]
    pub content: String,
}

impl Page {
    /// Create a new page
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }
}

/// Produces an ordered collection of pages for a seed URL.
///
/// Implementations are created once and shared between requests; each call
/// performs one complete crawl and returns pages in yield order.
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Crawl `seed_url` up to `max_depth` link hops, returning at most `max_pages` pages.
    async fn crawl(
        &self,
        seed_url: &str,
        max_depth: u32,
        max_pages: u32,
    ) -> Result<Vec<Page>, CrawlError>;
}
