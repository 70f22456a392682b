//! HTTP client for the Gemini API
//!
//! Handles authentication, URL building and response decoding. Every request
//! is sent exactly once; rate limiting, when wanted, is layered on top by
//! the caller.

use crate::error::{Error, Result};
use crate::gemini::types::HttpOptions;
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// HTTP client for making requests to the Gemini API
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// API key for authentication
    api_key: String,

    /// API version
    api_version: String,
}

impl HttpClient {
    /// Create a new HTTP client with an API key and custom options
    pub fn with_api_key_and_options(api_key: String, options: HttpOptions) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key,
            api_version: options.api_version,
        })
    }

    /// Build a URL for the Gemini Developer API
    fn build_url(&self, path: &str) -> Result<Url> {
        let url = format!("{}/{}/{}", self.base_url, self.api_version, path);
        Url::parse(&url).map_err(|e| Error::InvalidRequest(format!("Invalid URL: {}", e)))
    }

    /// Send a POST request with a JSON body
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.build_url(path)?;
        let request = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(body);

        debug!("Sending POST request to {}", path);
        self.execute_request(request).await
    }

    /// Execute an HTTP request and decode the response
    async fn execute_request<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&response_text).map_err(|e| {
                error!("Failed to parse response: {}", e);
                Error::UnexpectedResponse(format!("Failed to parse response: {}", e))
            });
        }

        error!("API error: {} - {}", status, response_text);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(format!(
                "Invalid API key or credentials: {}",
                response_text
            ))),
            _ => Err(Error::Api {
                status_code: status.as_u16(),
                message: response_text,
            }),
        }
    }
}
