//! Error types for the siteprofile crate

use thiserror::Error;

/// Result type for siteprofile operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for siteprofile operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Web crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Structured extraction error
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
