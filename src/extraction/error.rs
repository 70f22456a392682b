//! Error types for the extraction module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for extraction operations
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The extraction service is not configured (e.g. missing API key)
    #[error("Extraction service is not configured: {0}")]
    Configuration(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// The prompt was blocked by the service
    #[error("Prompt was blocked: {0}")]
    Blocked(String),

    /// The service returned no usable text
    #[error("Model returned an empty response (finish reason: {0})")]
    EmptyResponse(String),

    /// The returned value does not match the profile schema
    #[error("Model output does not match the profile schema: {0}")]
    NonConforming(String),

    /// No page had enough content to send
    #[error("No page content to extract from")]
    EmptyPayload,

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<CrateError> for ExtractionError {
    fn from(err: CrateError) -> Self {
        match err {
            CrateError::Http(e) => Self::Http(e),
            CrateError::Api {
                status_code,
                message,
            } => Self::Api {
                status_code,
                message,
            },
            CrateError::Auth(message) | CrateError::Configuration(message) => {
                Self::Configuration(message)
            }
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<ExtractionError> for CrateError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Http(e) => CrateError::Http(e),
            ExtractionError::Configuration(message) => CrateError::Configuration(message),
            ExtractionError::Api {
                status_code,
                message,
            } => CrateError::Api {
                status_code,
                message,
            },
            _ => CrateError::Extraction(err.to_string()),
        }
    }
}
