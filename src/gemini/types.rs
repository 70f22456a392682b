//! Type definitions for the Gemini REST API
//!
//! Only the subset of `generateContent` used for structured extraction is
//! modelled. Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Content represents one turn of the conversation sent to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The role of the content (e.g., "user", "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The parts that make up this content
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a new empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role for this content
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Add text to this content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part {
            text: Some(text.into()),
        });
        self
    }
}

/// A part of content. Only text parts are used here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Generation configuration for content generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature controls randomness in generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,

    /// MIME type of the response, `application/json` for structured output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// Schema the JSON response must conform to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,

    /// Reasoning configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

/// Controls the model's internal reasoning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    /// Token budget for thinking; 0 disables it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<i32>,
}

/// Response from content generation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// The generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Prompt feedback
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,

    /// Model version that served the request
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }

    /// Reason the prompt was blocked, if it was
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }

    /// Finish reason of the first candidate
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }
}

/// A candidate response from the model
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of the candidate
    #[serde(default)]
    pub content: Option<Content>,

    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback on the prompt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Token usage reported with a response
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// HTTP options for client configuration
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// API host
    pub base_url: String,

    /// API version
    pub api_version: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: "v1beta".to_string(),
            timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generation_config_uses_camel_case() {
        let config = GenerationConfig {
            temperature: Some(0.0),
            response_mime_type: Some("application/json".to_string()),
            thinking_config: Some(ThinkingConfig {
                thinking_budget: Some(0),
            }),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(config).unwrap(),
            json!({
                "temperature": 0.0,
                "responseMimeType": "application/json",
                "thinkingConfig": {"thinkingBudget": 0}
            })
        );
    }

    #[test]
    fn test_response_text_and_usage() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"name\":"}, {"text": "\"A\"}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("{\"name\":\"A\"}"));
        assert_eq!(response.finish_reason(), Some("STOP"));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 15);
    }

    #[test]
    fn test_blocked_response() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        assert_eq!(response.text(), None);
        assert_eq!(response.block_reason(), Some("SAFETY"));
    }
}
