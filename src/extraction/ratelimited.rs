use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::Value;
use tracing::{Instrument, debug_span, info_span};

use crate::extraction::{ExtractionError, GenerationRequest, StructuredGenerator};

/// Waits for a rate-limiter slot before each generation call. Never retries.
#[derive(Clone)]
pub struct RateLimitedGenerator<G: StructuredGenerator> {
    generator: G,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl<G> RateLimitedGenerator<G>
where
    G: StructuredGenerator,
{
    pub fn new(generator: G, limiter: DefaultDirectRateLimiter) -> Self {
        Self {
            generator,
            limiter: Arc::new(limiter),
        }
    }

    /// Allow at most `requests` generation calls per minute
    pub fn per_minute(generator: G, requests: NonZeroU32) -> Self {
        Self::new(generator, RateLimiter::direct(Quota::per_minute(requests)))
    }
}

#[async_trait]
impl<G: StructuredGenerator> StructuredGenerator for RateLimitedGenerator<G> {
    fn ensure_ready(&self) -> Result<(), ExtractionError> {
        self.generator.ensure_ready()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Value, ExtractionError> {
        self.limiter
            .until_ready()
            .instrument(debug_span!("limiter"))
            .await;
        self.generator
            .generate(request)
            .instrument(info_span!("generation"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::GenerationOptions;
    use crate::extraction::mock::MockGenerator;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn request() -> GenerationRequest {
        GenerationRequest {
            instructions: "Extract".to_string(),
            payload: "--- PAGE: / ---\nhello\n\n".to_string(),
            schema: json!({"type": "OBJECT"}),
            options: GenerationOptions::deterministic(),
        }
    }

    #[tokio::test]
    async fn test_forwards_requests_and_results() {
        let mock = MockGenerator::returning(json!({"name": "Limited"}));
        let limited = RateLimitedGenerator::per_minute(mock.clone(), NonZeroU32::MIN);

        let value = assert_ok!(limited.generate(request()).await);

        assert_eq!(value, json!({"name": "Limited"}));
        assert_eq!(mock.calls(), vec![request()]);
    }

    #[tokio::test]
    async fn test_forwards_errors_once() {
        let mock = MockGenerator::failing(|| ExtractionError::Other("down".to_string()));
        let limited = RateLimitedGenerator::per_minute(mock.clone(), NonZeroU32::MIN);

        assert_err!(limited.generate(request()).await);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_forwards_readiness() {
        let limited = RateLimitedGenerator::per_minute(
            MockGenerator::unconfigured("no key"),
            NonZeroU32::MIN,
        );

        assert!(matches!(
            limited.ensure_ready(),
            Err(ExtractionError::Configuration(_))
        ));
    }
}
