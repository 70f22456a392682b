//! # Mock Crawler for Testing
//!
//! Provides a `MockCrawler` that implements the `Crawler` trait with a
//! predefined page set or failure, and records every call so tests can
//! assert how often (and with which limits) the crawl collaborator ran.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::crawler::{CrawlError, Crawler, Page};

/// A recorded call to [`MockCrawler::crawl`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlCall {
    pub seed_url: String,
    pub max_depth: u32,
    pub max_pages: u32,
}

#[derive(Debug, Clone)]
enum Outcome {
    Pages(Vec<Page>),
    Failure(String),
}

/// A mock crawler for testing purposes.
#[derive(Debug, Clone)]
pub struct MockCrawler {
    outcome: Arc<Mutex<Outcome>>,
    calls: Arc<Mutex<Vec<CrawlCall>>>,
}

impl MockCrawler {
    /// Creates a mock that yields the given pages.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(Outcome::Pages(pages))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock whose crawl always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(Outcome::Failure(message.into()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times `crawl` was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<CrawlCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Default for MockCrawler {
    fn default() -> Self {
        Self::with_pages(Vec::new())
    }
}

#[async_trait]
impl Crawler for MockCrawler {
    async fn crawl(
        &self,
        seed_url: &str,
        max_depth: u32,
        max_pages: u32,
    ) -> Result<Vec<Page>, CrawlError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(CrawlCall {
                seed_url: seed_url.to_string(),
                max_depth,
                max_pages,
            });
        }

        let outcome = self
            .outcome
            .lock()
            .map_err(|e| CrawlError::Other(format!("mock poisoned: {}", e)))?
            .clone();
        match outcome {
            Outcome::Pages(pages) => Ok(pages),
            Outcome::Failure(message) => Err(CrawlError::Engine(message)),
        }
    }
}
