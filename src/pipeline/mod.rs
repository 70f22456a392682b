//! # Orchestration Policy
//!
//! Runs one scrape request end to end: validate, crawl once, filter, extract
//! once, and report the outcome as a [`ResultEnvelope`].
//!
//! Only invalid input, a missing extraction configuration and unexpected
//! faults are errors. A failed crawl, a site without content and a failed
//! extraction are ordinary outcomes with `success = false`; the
//! `pages_crawled` count tells the caller which stage failed.

mod envelope;
mod error;
mod request;

pub use envelope::ResultEnvelope;
pub use error::PipelineError;
pub use request::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, MAX_DEPTH_RANGE, MAX_PAGES_RANGE, ScrapeRequest,
    is_valid_url,
};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info, instrument, warn};

use crate::crawler::{Crawler, filter};
use crate::extraction::ExtractionClient;
use crate::schema::BusinessProfile;

/// Error reported when the site yields no usable page
pub const NO_CONTENT_MESSAGE: &str = "No content found on the website";

/// Detail returned for unexpected faults
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred while processing the request";

/// Sequences crawl, aggregation and extraction for one request at a time
#[derive(Clone)]
pub struct Pipeline {
    crawler: Arc<dyn Crawler>,
    extraction: ExtractionClient,
}

impl Pipeline {
    /// Create a pipeline over a shared crawler and extraction client
    pub fn new(crawler: Arc<dyn Crawler>, extraction: ExtractionClient) -> Self {
        Self {
            crawler,
            extraction,
        }
    }

    /// Run one request to completion
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn run(&self, request: &ScrapeRequest) -> Result<ResultEnvelope, PipelineError> {
        request.validate()?;
        self.extraction
            .ensure_ready()
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        info!(
            "Crawling (max_depth={}, max_pages={})",
            request.max_depth, request.max_pages
        );
        let pages = match self
            .crawler
            .crawl(&request.url, request.max_depth, request.max_pages)
            .await
        {
            Ok(pages) => filter::retain_content_pages(pages),
            Err(e) => {
                error!(error = ?e, "Crawling failed: {}", e);
                return Ok(ResultEnvelope::failure(
                    &request.url,
                    0,
                    format!("Crawling failed: {}", e),
                ));
            }
        };

        if pages.is_empty() {
            warn!("{}", NO_CONTENT_MESSAGE);
            return Ok(ResultEnvelope::failure(&request.url, 0, NO_CONTENT_MESSAGE));
        }

        let pages_crawled = pages.len();
        info!("Crawled {} pages, extracting profile", pages_crawled);

        match self.extraction.extract(&pages).await {
            Ok(profile) => {
                log_profile_summary(&profile);
                Ok(ResultEnvelope::success(&request.url, pages_crawled, profile))
            }
            Err(e) => {
                error!(error = ?e, "Data extraction failed: {}", e);
                Ok(ResultEnvelope::failure(
                    &request.url,
                    pages_crawled,
                    format!("Data extraction failed: {}", e),
                ))
            }
        }
    }

    /// [`run`](Self::run), with panics turned into [`PipelineError::Internal`]
    pub async fn run_guarded(
        &self,
        request: &ScrapeRequest,
    ) -> Result<ResultEnvelope, PipelineError> {
        match AssertUnwindSafe(self.run(request)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                error!(
                    url = %request.url,
                    "Unexpected error while processing request: {}",
                    panic_message(panic.as_ref())
                );
                Err(PipelineError::Internal(INTERNAL_ERROR_MESSAGE.to_string()))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

fn log_profile_summary(profile: &BusinessProfile) {
    if profile.is_empty() {
        warn!("Extraction succeeded but found no business information");
        return;
    }
    info!(
        name = %profile.name,
        phones = profile.phones.len(),
        emails = profile.emails.len(),
        addresses = profile.addresses.len(),
        services = profile.services.len(),
        staff = profile.staff.len(),
        faqs = profile.faqs.len(),
        policies = profile.policies.len(),
        "Extracted fields: {}",
        profile.populated_fields().join(", ")
    );
}
