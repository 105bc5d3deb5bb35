use async_trait::async_trait;
use doceval_agent::{AgentError, ChatModel};
use tracing::{debug, info};

use crate::{CriticPrompts, Evaluation, EvaluationParseError};

/// Scores a document for clarity
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn evaluate(&self, document: &str) -> Result<Evaluation, EvaluationError>;
}

/// Scorer that asks a chat model to grade clarity
pub struct ClarityScorer<'a> {
    model: &'a dyn ChatModel,
}

impl<'a> ClarityScorer<'a> {
    pub fn new(model: &'a dyn ChatModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Scorer for ClarityScorer<'_> {
    async fn evaluate(&self, document: &str) -> Result<Evaluation, EvaluationError> {
        let prompt = CriticPrompts::build_evaluation_prompt(document);

        debug!(
            prompt_len = prompt.len(),
            model = self.model.model(),
            "Running clarity evaluation"
        );

        let output = self.model.complete(&prompt).await?;

        info!(
            duration_secs = output.duration.as_secs_f64(),
            tokens = output.total_tokens(),
            "Scorer completed"
        );

        Ok(Evaluation::parse(&output.content)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Chat model error: {0}")]
    AgentError(#[from] AgentError),

    #[error("Failed to parse evaluation: {0}")]
    ParseError(#[from] EvaluationParseError),
}
