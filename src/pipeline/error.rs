//! Error types for the pipeline module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Failures that prevent a result envelope from being produced
///
/// Crawl and extraction failures are not errors at this level; they are
/// reported inside the envelope.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed seed URL or out-of-range limits
    #[error("{0}")]
    InvalidInput(String),

    /// The extraction service cannot be used
    #[error("{0}")]
    Configuration(String),

    /// Unexpected fault inside the run
    #[error("{0}")]
    Internal(String),
}

impl From<PipelineError> for CrateError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(message) => CrateError::InvalidRequest(message),
            PipelineError::Configuration(message) => CrateError::Configuration(message),
            PipelineError::Internal(message) => CrateError::Other(message),
        }
    }
}
