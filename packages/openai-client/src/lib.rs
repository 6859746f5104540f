//! Minimal OpenAI REST API client.
//!
//! A clean client for the chat completions API with no domain-specific
//! logic. Failures are classified into quota-exhausted, rate-limited,
//! and other so that callers can apply per-category retry policies.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client.chat_completion(ChatRequest {
//!     model: "gpt-4o-mini".into(),
//!     messages: vec![Message::user("Hello!")],
//!     ..Default::default()
//! }).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout for completion calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OpenAIError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify API access with a one-token probe completion.
    ///
    /// Intended for startup: a bad key or an exhausted quota surfaces
    /// here as a fatal condition instead of on the first real request.
    pub async fn verify_access(&self, model: &str) -> Result<()> {
        let request = ChatRequest::new(model)
            .message(Message::system("You are a helpful assistant."))
            .message(Message::user("Hello"))
            .max_tokens(1);

        let response = self.chat_completion(request).await?;
        if response.content.is_empty() {
            warn!("OpenAI probe returned an empty completion");
        }
        debug!("OpenAI API access verified");
        Ok(())
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(OpenAIError::from_api_response(status, error_text));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test")
            .unwrap()
            .with_base_url("https://custom.api.com");

        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url, "https://custom.api.com");
    }

    #[test]
    fn test_from_env_missing_key() {
        std::env::remove_var("OPENAI_API_KEY");
        assert!(matches!(
            OpenAIClient::from_env(),
            Err(OpenAIError::Config(_))
        ));
    }
}
