use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply captured from a chat model call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutput {
    /// Text of the first choice
    pub content: String,
    /// Model that produced the reply, as reported by the API
    pub model: String,
    /// Prompt tokens billed for the call
    pub prompt_tokens: u64,
    /// Completion tokens billed for the call
    pub completion_tokens: u64,
    /// Wall time including retries
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl ChatOutput {
    pub fn new(content: String, model: String, duration: Duration) -> Self {
        Self {
            content,
            model,
            prompt_tokens: 0,
            completion_tokens: 0,
            duration,
        }
    }

    pub fn with_usage(mut self, prompt_tokens: u64, completion_tokens: u64) -> Self {
        self.prompt_tokens = prompt_tokens;
        self.completion_tokens = completion_tokens;
        self
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Count lines in the reply
    pub fn lines(&self) -> usize {
        self.content.lines().count()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
