use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::ChatOutput;

/// Default OpenAI-compatible API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model used for both scoring and rewriting
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Errors that can occur while talking to a chat model
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    #[error("Agent configuration error: {0}")]
    ConfigError(String),
}

impl AgentError {
    /// Transport failures, rate limiting and server errors are worth retrying.
    /// Other client errors (bad key, bad request) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::RequestFailed(_) => true,
            AgentError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Configuration for a chat model client.
///
/// Credentials are passed in explicitly; nothing here reads the process
/// environment.
#[derive(Clone)]
pub struct AgentConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// Base URL of the chat completions API (without `/chat/completions`)
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Optional request timeout (None = no limit)
    pub timeout: Option<Duration>,
    /// Sampling temperature, if the caller wants to pin it
    pub temperature: Option<f32>,
    /// Retries after the first attempt for retryable failures
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry
    pub initial_backoff: Duration,
    /// Upper bound for a single retry delay
    pub max_backoff: Duration,
}

impl AgentConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
            temperature: None,
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_backoff)
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// A chat-completion backend that answers a single prompt
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model identifier requests are sent with
    fn model(&self) -> &str;

    /// Send one user prompt and wait for the full reply
    async fn complete(&self, prompt: &str) -> Result<ChatOutput, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AgentConfig::new("sk-test");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_retries, 3);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AgentConfig::new("sk-secret-value");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = AgentConfig::new("k")
            .with_backoff(Duration::from_millis(100), Duration::from_millis(500));
        assert_eq!(config.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(config.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(400));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(500));
        assert_eq!(config.backoff_delay(40), Duration::from_millis(500));
    }

    #[test]
    fn test_retryable_statuses() {
        let retry = |status| AgentError::Api {
            status,
            body: String::new(),
        };
        assert!(retry(429).is_retryable());
        assert!(retry(500).is_retryable());
        assert!(retry(503).is_retryable());
        assert!(!retry(400).is_retryable());
        assert!(!retry(401).is_retryable());
        assert!(!AgentError::EmptyResponse.is_retryable());
    }
}
