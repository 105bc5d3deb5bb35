use doceval_agent::{AgentError, ChatModel};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::CriticPrompts;

/// One generated question with its ideal answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub input: String,
    pub ideal: String,
}

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Chat model error: {0}")]
    AgentError(#[from] AgentError),

    #[error("No JSON array found in model output")]
    NoArrayFound,

    #[error("Failed to parse QA JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Parse QA pairs from model output, ignoring any text around the JSON array
pub fn parse_qa_pairs(output: &str) -> Result<Vec<QaPair>, QaError> {
    let start = output.find('[');
    let end = output.rfind(']');

    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            Ok(serde_json::from_str(&output[start..=end])?)
        }
        _ => Err(QaError::NoArrayFound),
    }
}

/// Render QA pairs as JSON lines, one object per line
pub fn to_jsonl(pairs: &[QaPair]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&serde_json::to_string(pair)?);
        out.push('\n');
    }
    Ok(out)
}

/// Generates question/answer pairs about a document for evaluation datasets
pub struct QaGenerator<'a> {
    model: &'a dyn ChatModel,
}

impl<'a> QaGenerator<'a> {
    pub fn new(model: &'a dyn ChatModel) -> Self {
        Self { model }
    }

    pub async fn generate(&self, document: &str, count: usize) -> Result<Vec<QaPair>, QaError> {
        let prompt = CriticPrompts::build_qa_prompt(document, count);
        debug!(prompt_len = prompt.len(), count, "Generating QA pairs");

        let output = self.model.complete(&prompt).await?;
        let pairs = parse_qa_pairs(&output.content)?;

        info!(pairs = pairs.len(), "QA generation completed");
        Ok(pairs)
    }
}
