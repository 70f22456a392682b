//! Client for the Gemini Developer API

use crate::error::Result;
use crate::gemini::http::HttpClient;
use crate::gemini::models::ModelsService;
use crate::gemini::types::HttpOptions;

/// Client for the Gemini API
///
/// Entry point for the services of the Gemini Developer API. Cloning is
/// cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key for the Gemini Developer API
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, HttpOptions::default())
    }

    /// Create a new client with custom HTTP options
    pub fn with_options(api_key: impl Into<String>, options: HttpOptions) -> Result<Self> {
        let http_client = HttpClient::with_api_key_and_options(api_key.into(), options)?;
        Ok(Self { http_client })
    }

    /// Access the models service
    pub fn models(&self) -> ModelsService {
        ModelsService::new(self.http_client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_with_api_key() {
        assert!(Client::with_api_key("test-api-key").is_ok());
    }
}
