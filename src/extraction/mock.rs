//! # Mock Generator for Testing
//!
//! Provides a `MockGenerator` that implements the `StructuredGenerator` trait
//! with a scripted result, and records every request it receives so tests can
//! assert how often the generation service was called and with what.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::extraction::{ExtractionError, GenerationRequest, StructuredGenerator};

type ErrorFactory = Arc<dyn Fn() -> ExtractionError + Send + Sync>;

#[derive(Clone)]
enum Outcome {
    Value(Value),
    Failure(ErrorFactory),
}

/// A mock generator for testing purposes.
#[derive(Clone)]
pub struct MockGenerator {
    outcome: Outcome,
    not_configured: Option<String>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    /// Creates a mock that returns `value` for every request.
    pub fn returning(value: Value) -> Self {
        Self {
            outcome: Outcome::Value(value),
            not_configured: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock whose requests fail with the error built by `make_error`.
    pub fn failing(make_error: impl Fn() -> ExtractionError + Send + Sync + 'static) -> Self {
        Self {
            outcome: Outcome::Failure(Arc::new(make_error)),
            not_configured: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock that reports a configuration error from `ensure_ready`.
    pub fn unconfigured(message: impl Into<String>) -> Self {
        let message = message.into();
        let for_requests = message.clone();
        Self {
            not_configured: Some(message),
            ..Self::failing(move || ExtractionError::Configuration(for_requests.clone()))
        }
    }

    /// Number of times `generate` was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    /// All recorded requests, in order.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::returning(Value::Object(Default::default()))
    }
}

#[async_trait]
impl StructuredGenerator for MockGenerator {
    fn ensure_ready(&self) -> Result<(), ExtractionError> {
        match &self.not_configured {
            Some(message) => Err(ExtractionError::Configuration(message.clone())),
            None => Ok(()),
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Value, ExtractionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        match &self.outcome {
            Outcome::Value(value) => Ok(value.clone()),
            Outcome::Failure(make_error) => Err(make_error()),
        }
    }
}
