//! # Extraction Client
//!
//! Turns crawled pages into a [`BusinessProfile`] with a single call to a
//! structured-generation service.
//!
//! ## Key Components
//!
//! - `StructuredGenerator`: The seam to the generation service (prompt + schema in, JSON out)
//! - `ExtractionClient`: Aggregates pages, issues one generation call, materializes the profile
//! - `GeminiGenerator`: `StructuredGenerator` backed by the Gemini API
//! - `RateLimitedGenerator`: Wraps any generator with a client-side rate limit
//! - `MockGenerator`: Scripted generator that records its calls, for tests
//!
//! A request is never retried and a non-conforming result is never repaired:
//! the client returns the profile or the error. [`ExtractionClient::extract_or_default`]
//! is the fail-soft entry point for callers that prefer an empty profile.

mod error;
mod gemini_generator;
pub mod mock;
mod ratelimited;

pub use error::ExtractionError;
pub use gemini_generator::{DEFAULT_MODEL, GeminiGenerator, GeminiSettings, shared_generator};
pub use ratelimited::RateLimitedGenerator;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::aggregator::{AggregationLimits, aggregate_with_stats};
use crate::crawler::Page;
use crate::schema::{BusinessProfile, ExtractionContract};

/// Generation settings for a single request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature
    pub temperature: f32,

    /// Token budget for model reasoning; 0 disables it
    pub thinking_budget: i32,
}

impl GenerationOptions {
    /// Temperature pinned to zero and reasoning disabled
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.0,
            thinking_budget: 0,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::deterministic()
    }
}

/// Everything a generator needs for one structured-generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Instruction text preceding the payload
    pub instructions: String,

    /// Aggregated website content
    pub payload: String,

    /// Response schema the output must conform to
    pub schema: Value,

    /// Generation settings
    pub options: GenerationOptions,
}

/// A service that produces JSON conforming to a schema
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Fail fast when the service cannot be used at all
    fn ensure_ready(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    /// Issue exactly one generation call
    async fn generate(&self, request: GenerationRequest) -> Result<Value, ExtractionError>;
}

/// Extracts business profiles from crawled pages
#[derive(Clone)]
pub struct ExtractionClient {
    generator: Arc<dyn StructuredGenerator>,
    contract: Arc<ExtractionContract>,
    limits: AggregationLimits,
}

impl ExtractionClient {
    /// Create a client over a shared generator
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        contract: ExtractionContract,
        limits: AggregationLimits,
    ) -> Self {
        Self {
            generator,
            contract: Arc::new(contract),
            limits,
        }
    }

    /// The contract sent with every request
    pub fn contract(&self) -> &ExtractionContract {
        &self.contract
    }

    /// Check that the generator is configured
    pub fn ensure_ready(&self) -> Result<(), ExtractionError> {
        self.generator.ensure_ready()
    }

    /// Aggregate `pages` and extract a profile with one generation call
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub async fn extract(&self, pages: &[Page]) -> Result<BusinessProfile, ExtractionError> {
        let (payload, stats) = aggregate_with_stats(pages, &self.limits);
        info!(
            included = stats.included,
            skipped_short = stats.skipped_short,
            truncated = stats.truncated,
            dropped_over_budget = stats.dropped_over_budget,
            "Aggregated {} characters of content",
            stats.total_chars
        );
        if payload.is_empty() {
            warn!("No page had enough content to extract from");
            return Err(ExtractionError::EmptyPayload);
        }

        let request = GenerationRequest {
            instructions: self.contract.instructions.clone(),
            payload,
            schema: self.contract.schema.clone(),
            options: GenerationOptions::deterministic(),
        };
        debug!(
            "Requesting extraction with schema version {}",
            self.contract.version
        );

        let value = self.generator.generate(request).await?;
        serde_json::from_value(value).map_err(|e| ExtractionError::NonConforming(e.to_string()))
    }

    /// Like [`extract`](Self::extract), but logs failures and returns an empty profile
    pub async fn extract_or_default(&self, pages: &[Page]) -> BusinessProfile {
        match self.extract(pages).await {
            Ok(profile) => profile,
            Err(e) => {
                error!(error = ?e, "Extraction failed, returning empty profile: {}", e);
                BusinessProfile::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::mock::MockGenerator;
    use serde_json::json;

    fn client_with(generator: MockGenerator) -> ExtractionClient {
        ExtractionClient::new(
            Arc::new(generator),
            ExtractionContract::current().unwrap(),
            AggregationLimits::default(),
        )
    }

    fn pages() -> Vec<Page> {
        vec![
            Page::new("https://vet.example/", "Happy Paws Veterinary Clinic"),
            Page::new("https://vet.example/contact", "Call (555) 111-2222"),
        ]
    }

    #[tokio::test]
    async fn test_extract_sends_one_deterministic_request() {
        let generator = MockGenerator::returning(json!({
            "name": "Happy Paws Veterinary Clinic",
            "phones": ["(555) 111-2222"]
        }));
        let client = client_with(generator.clone());

        let profile = client.extract(&pages()).await.unwrap();

        assert_eq!(profile.name, "Happy Paws Veterinary Clinic");
        assert_eq!(profile.phones, vec!["(555) 111-2222"]);
        assert!(profile.emails.is_empty());

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.options, GenerationOptions::deterministic());
        assert_eq!(request.options.temperature, 0.0);
        assert_eq!(request.options.thinking_budget, 0);
        assert_eq!(request.instructions, client.contract().instructions);
        assert_eq!(request.schema, client.contract().schema);
        assert!(
            request
                .payload
                .starts_with("--- PAGE: https://vet.example/ ---\n")
        );
        assert!(request.payload.contains("--- PAGE: https://vet.example/contact ---"));
    }

    #[tokio::test]
    async fn test_generator_failure_is_returned_without_retry() {
        let generator = MockGenerator::failing(|| ExtractionError::Api {
            status_code: 503,
            message: "overloaded".to_string(),
        });
        let client = client_with(generator.clone());

        let result = client.extract(&pages()).await;

        assert!(matches!(
            result,
            Err(ExtractionError::Api {
                status_code: 503,
                ..
            })
        ));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_conforming_output() {
        let generator = MockGenerator::returning(json!({"phones": "(555) 111-2222"}));
        let client = client_with(generator);

        let result = client.extract(&pages()).await;

        assert!(matches!(result, Err(ExtractionError::NonConforming(_))));
    }

    #[tokio::test]
    async fn test_empty_payload_skips_generator() {
        let generator = MockGenerator::returning(json!({}));
        let client = client_with(generator.clone());

        let result = client
            .extract(&[Page::new("https://vet.example/", "   ")])
            .await;

        assert!(matches!(result, Err(ExtractionError::EmptyPayload)));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_or_default_is_fail_soft() {
        let generator = MockGenerator::failing(|| ExtractionError::Other("boom".to_string()));
        let client = client_with(generator);

        let profile = client.extract_or_default(&pages()).await;

        assert_eq!(profile, BusinessProfile::default());
    }

    #[tokio::test]
    async fn test_extract_or_default_passes_success_through() {
        let generator = MockGenerator::returning(json!({"name": "Happy Paws"}));
        let client = client_with(generator);

        let profile = client.extract_or_default(&pages()).await;

        assert_eq!(profile.name, "Happy Paws");
    }

    #[test]
    fn test_ensure_ready_forwards_to_generator() {
        let ready = client_with(MockGenerator::returning(json!({})));
        let unconfigured = client_with(MockGenerator::unconfigured("GEMINI_API_KEY is not set"));

        assert!(ready.ensure_ready().is_ok());
        assert!(matches!(
            unconfigured.ensure_ready(),
            Err(ExtractionError::Configuration(_))
        ));
    }
}
