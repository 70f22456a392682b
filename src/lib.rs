//! # siteprofile - Business Profiles from Websites
//!
//! This crate crawls a business's website, bounds and concatenates the page
//! content, and asks Gemini for a schema-constrained business profile (name,
//! contact details, opening hours, staff, services, FAQs, policies).
//!
//! ## Features
//!
//! - Website crawling with markdown conversion, URL denylist and relevance ordering
//! - Deterministic content aggregation under per-page and total size limits
//! - A versioned extraction contract: response schema and instructions built as one unit
//! - Single-shot, deterministic structured generation (no retries, no repair)
//! - A result envelope that reports crawl and extraction failures without faulting
//! - An HTTP API (axum) and a CLI
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use siteprofile::aggregator::AggregationLimits;
//! use siteprofile::crawler::SpiderCrawler;
//! use siteprofile::extraction::{ExtractionClient, GeminiGenerator, GeminiSettings};
//! use siteprofile::pipeline::{Pipeline, ScrapeRequest};
//! use siteprofile::schema::ExtractionContract;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = GeminiSettings::default()
//!         .with_api_key(std::env::var("GEMINI_API_KEY").ok());
//!     let extraction = ExtractionClient::new(
//!         Arc::new(GeminiGenerator::new(settings)?),
//!         ExtractionContract::current()?,
//!         AggregationLimits::default(),
//!     );
//!     let pipeline = Pipeline::new(Arc::new(SpiderCrawler::default()), extraction);
//!
//!     let envelope = pipeline.run(&ScrapeRequest::new("https://example.com")).await?;
//!     println!("{}", serde_json::to_string_pretty(&envelope)?);
//!     Ok(())
//! }
//! ```

mod error;

pub mod aggregator;
pub mod crawler;
pub mod extraction;
pub mod gemini;
pub mod pipeline;
pub mod schema;
pub mod server;

pub use error::Error;

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::aggregator::{AggregationLimits, aggregate};
    pub use crate::crawler::{Crawler, Page};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::extraction::{ExtractionClient, StructuredGenerator};
    pub use crate::pipeline::{Pipeline, ResultEnvelope, ScrapeRequest};
    pub use crate::schema::{BusinessProfile, ExtractionContract};
}
