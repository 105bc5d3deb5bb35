use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

use crate::{AgentConfig, AgentError, ChatModel, ChatOutput};

/// Chat model backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiChat {
    client: Client,
    config: AgentConfig,
}

impl OpenAiChat {
    pub fn new(config: AgentConfig) -> Result<Self, AgentError> {
        if config.api_key.trim().is_empty() {
            return Err(AgentError::ConfigError("API key is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Build the request body for a single user prompt
    fn build_request(&self, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }

    async fn send_request(&self, body: &Value) -> Result<Value, AgentError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    fn parse_response(&self, body: Value, started: Instant) -> Result<ChatOutput, AgentError> {
        let choices = body["choices"]
            .as_array()
            .ok_or_else(|| AgentError::InvalidResponse("missing `choices` array".to_string()))?;

        let content = choices
            .first()
            .and_then(|choice| choice["message"]["content"].as_str())
            .filter(|content| !content.trim().is_empty())
            .ok_or(AgentError::EmptyResponse)?;

        let model = body["model"]
            .as_str()
            .unwrap_or(&self.config.model)
            .to_string();

        let usage = &body["usage"];
        Ok(
            ChatOutput::new(content.to_string(), model, started.elapsed()).with_usage(
                usage["prompt_tokens"].as_u64().unwrap_or(0),
                usage["completion_tokens"].as_u64().unwrap_or(0),
            ),
        )
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<ChatOutput, AgentError> {
        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending chat completion"
        );

        let body = self.build_request(prompt);
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            match self.send_request(&body).await {
                Ok(response) => return self.parse_response(response, started),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff_delay(attempt);
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Chat completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiChat {
        OpenAiChat::new(AgentConfig::new("test-key")).unwrap()
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let result = OpenAiChat::new(AgentConfig::new("  "));
        assert!(matches!(result, Err(AgentError::ConfigError(_))));
    }

    #[test]
    fn test_build_request_basic() {
        let body = client().build_request("Rewrite this");
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Rewrite this");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_build_request_with_temperature() {
        let chat = OpenAiChat::new(AgentConfig::new("k").with_temperature(0.0)).unwrap();
        let body = chat.build_request("hi");
        assert_eq!(body["temperature"], 0.0);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let chat =
            OpenAiChat::new(AgentConfig::new("k").with_base_url("http://localhost:9000/v1/"))
                .unwrap();
        assert_eq!(chat.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_parse_response_extracts_content_and_usage() {
        let body = json!({
            "model": "gpt-4-0613",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Hello there" } }
            ],
            "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
        });

        let output = client().parse_response(body, Instant::now()).unwrap();
        assert_eq!(output.content, "Hello there");
        assert_eq!(output.model, "gpt-4-0613");
        assert_eq!(output.total_tokens(), 15);
    }

    #[test]
    fn test_parse_response_empty_content() {
        let body = json!({
            "choices": [ { "message": { "role": "assistant", "content": "   " } } ]
        });
        let result = client().parse_response(body, Instant::now());
        assert!(matches!(result, Err(AgentError::EmptyResponse)));
    }

    #[test]
    fn test_parse_response_missing_choices() {
        let result = client().parse_response(json!({ "error": "nope" }), Instant::now());
        assert!(matches!(result, Err(AgentError::InvalidResponse(_))));
    }
}
