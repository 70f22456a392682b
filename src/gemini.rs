//! Gemini API implementation
//!
//! A small client for the `generateContent` endpoint of Google's Gemini
//! Developer API, used for schema-constrained JSON generation.

mod client;
mod http;
mod models;
mod types;

pub use client::Client;
pub use models::ModelsService;
pub use types::{
    Candidate, Content, DEFAULT_BASE_URL, GenerateContentResponse, GenerationConfig, HttpOptions,
    Part, PromptFeedback, ThinkingConfig, UsageMetadata,
};
