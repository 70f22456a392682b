//! Caller-facing result of one pipeline run

use serde::{Deserialize, Serialize};

use crate::schema::BusinessProfile;

/// Outcome of a scrape request
///
/// `data` is present exactly when `success` is true; `error` is present
/// exactly when it is false. Both serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,

    /// The seed URL as requested
    pub url: String,

    /// Number of content pages handed to extraction
    pub pages_crawled: usize,

    pub data: Option<BusinessProfile>,

    pub error: Option<String>,
}

impl ResultEnvelope {
    pub fn success(url: impl Into<String>, pages_crawled: usize, data: BusinessProfile) -> Self {
        Self {
            success: true,
            url: url.into(),
            pages_crawled,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, pages_crawled: usize, error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: url.into(),
            pages_crawled,
            data: None,
            error: Some(error.into()),
        }
    }
}
