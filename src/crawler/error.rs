//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Seed URL is not crawlable (no host, unsupported scheme)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The crawl engine could not deliver pages
    #[error("Crawl engine error: {0}")]
    Engine(String),

    /// Reading or writing a saved page set failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A saved page set could not be decoded or encoded
    #[error("Page set format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Storage(e) => CrateError::Io(e),
            CrawlError::Format(e) => CrateError::Json(e),
            CrawlError::UrlParse(e) => CrateError::InvalidRequest(format!("URL parse error: {}", e)),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}
