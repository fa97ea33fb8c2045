//! Core `ChatClient` trait and `ApiChatClient` implementation.
//!
//! `ApiChatClient` calls an OpenAI-compatible `/v1/chat/completions`
//! endpoint.  All connection details come from [`OpenAiConfig`]; nothing is
//! hardcoded.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::OpenAiConfig;

use super::retry::RetryClass;

// ---------------------------------------------------------------------------
// ChatError
// ---------------------------------------------------------------------------

/// Errors that can occur during a chat-completion call.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("chat request timed out")]
    Timeout,

    /// The service reported a rate limit (HTTP 429).
    #[error("chat service rate limit reached")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("chat service returned HTTP {0}")]
    Status(u16),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse chat response: {0}")]
    Parse(String),

    /// The reply carried no usable text content.
    #[error("chat service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Request(e.to_string())
        }
    }
}

/// Attempts per chat call before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

/// Cooldown applied when the service reports a rate limit.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);

/// Classifier for the retry policy: rate limits wait out the cooldown,
/// everything else retries immediately.
pub fn retry_class(error: &ChatError) -> RetryClass {
    match error {
        ChatError::RateLimited => RetryClass::RetryAfter(RATE_LIMIT_COOLDOWN),
        _ => RetryClass::Retry,
    }
}

// ---------------------------------------------------------------------------
// ChatClient trait
// ---------------------------------------------------------------------------

/// Async trait for chat-completion backends.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn ChatClient>`.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send one system + user message pair, returning the assistant reply.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ChatError>;
}

// ---------------------------------------------------------------------------
// ApiChatClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiChatClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl ApiChatClient {
    /// Build a client from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &OpenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl ChatClient for ApiChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ChatError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user",   "content": user   }
            ]
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ChatError::RateLimited);
        }
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ChatError::EmptyResponse)?
            .trim()
            .to_string();

        if reply.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        Ok(reply)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_without_panic() {
        let _client = ApiChatClient::from_config(&OpenAiConfig::default());
    }

    /// Verify that `ApiChatClient` is usable as `dyn ChatClient`.
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn ChatClient> = Box::new(ApiChatClient::from_config(
            &OpenAiConfig::default(),
        ));
        drop(client);
    }

    #[test]
    fn rate_limit_maps_to_cooldown() {
        assert_eq!(
            retry_class(&ChatError::RateLimited),
            RetryClass::RetryAfter(RATE_LIMIT_COOLDOWN)
        );
    }

    #[test]
    fn other_errors_retry_immediately() {
        assert_eq!(
            retry_class(&ChatError::Request("refused".into())),
            RetryClass::Retry
        );
        assert_eq!(retry_class(&ChatError::Timeout), RetryClass::Retry);
        assert_eq!(retry_class(&ChatError::Status(500)), RetryClass::Retry);
        assert_eq!(retry_class(&ChatError::EmptyResponse), RetryClass::Retry);
    }
}
