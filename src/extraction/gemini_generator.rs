//! `StructuredGenerator` backed by the Gemini API

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::extraction::{
    ExtractionError, GenerationRequest, RateLimitedGenerator, StructuredGenerator,
};
use crate::gemini::{Client, Content, DEFAULT_BASE_URL, GenerationConfig, HttpOptions, ThinkingConfig};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for [`GeminiGenerator`]
#[derive(Clone)]
pub struct GeminiSettings {
    /// API key; requests are rejected when missing or blank
    pub api_key: Option<String>,

    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,

    /// API host
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Generation calls allowed per minute; unlimited when `None`
    pub requests_per_minute: Option<NonZeroU32>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: HttpOptions::default().timeout_secs,
            requests_per_minute: None,
        }
    }
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

impl GeminiSettings {
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_requests_per_minute(mut self, requests_per_minute: Option<NonZeroU32>) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }
}

/// Build the process-wide Gemini generator, rate limited when
/// `requests_per_minute` is set
pub fn shared_generator(
    settings: GeminiSettings,
) -> Result<Arc<dyn StructuredGenerator>, ExtractionError> {
    let requests_per_minute = settings.requests_per_minute;
    let generator = GeminiGenerator::new(settings)?;

    Ok(match requests_per_minute {
        Some(requests) => {
            info!("Limiting Gemini requests to {} per minute", requests);
            Arc::new(RateLimitedGenerator::per_minute(generator, requests))
        }
        None => Arc::new(generator),
    })
}

/// Structured generation with Gemini's JSON response mode
pub struct GeminiGenerator {
    client: Option<Client>,
    model: String,
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("model", &self.model)
            .field("configured", &self.client.is_some())
            .finish()
    }
}

impl GeminiGenerator {
    /// Build a generator. A missing key is reported by `ensure_ready`, not here.
    pub fn new(settings: GeminiSettings) -> Result<Self, ExtractionError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());

        let client = match api_key {
            Some(key) => {
                let options = HttpOptions {
                    base_url: settings.base_url.clone(),
                    timeout_secs: settings.timeout_secs,
                    ..HttpOptions::default()
                };
                Some(Client::with_options(key, options)?)
            }
            None => {
                warn!("GEMINI_API_KEY is not set; extraction requests will be rejected");
                None
            }
        };

        Ok(Self {
            client,
            model: settings.model,
        })
    }

    fn client(&self) -> Result<&Client, ExtractionError> {
        self.client.as_ref().ok_or_else(|| {
            ExtractionError::Configuration(
                "Gemini API key is required. Set the GEMINI_API_KEY environment variable."
                    .to_string(),
            )
        })
    }
}

#[async_trait]
impl StructuredGenerator for GeminiGenerator {
    fn ensure_ready(&self) -> Result<(), ExtractionError> {
        self.client().map(|_| ())
    }

    #[instrument(skip(self, request), fields(model = %self.model, payload_chars = request.payload.len()))]
    async fn generate(&self, request: GenerationRequest) -> Result<Value, ExtractionError> {
        let client = self.client()?;

        let prompt = format!("{}\n\n{}", request.instructions, request.payload);
        let config = GenerationConfig {
            temperature: Some(request.options.temperature),
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(request.schema),
            thinking_config: Some(ThinkingConfig {
                thinking_budget: Some(request.options.thinking_budget),
            }),
            ..Default::default()
        };

        let response = client
            .models()
            .generate_content_with_config(
                &self.model,
                None,
                vec![Content::new().with_role("user").with_text(prompt)],
                Some(config),
            )
            .await?;

        if let Some(usage) = response.usage_metadata {
            info!(
                prompt_tokens = usage.prompt_token_count,
                response_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini token usage"
            );
        }
        if let Some(reason) = response.block_reason() {
            return Err(ExtractionError::Blocked(reason.to_string()));
        }

        let text = response.text().ok_or_else(|| {
            ExtractionError::EmptyResponse(response.finish_reason().unwrap_or("unknown").to_string())
        })?;

        serde_json::from_str(&text)
            .map_err(|e| ExtractionError::NonConforming(format!("response is not valid JSON: {}", e)))
    }
}
