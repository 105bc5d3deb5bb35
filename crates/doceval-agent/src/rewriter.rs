use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::{AgentError, ChatModel};

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Chat model error: {0}")]
    Agent(#[from] AgentError),

    #[error("Rewriter returned an empty document")]
    EmptyDocument,
}

/// Produces a revised document from the current text and reviewer feedback
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, document: &str, feedback: &str) -> Result<String, RewriteError>;
}

/// Build the prompt asking the model to revise a document against feedback
pub fn build_rewrite_prompt(document: &str, feedback: &str) -> String {
    format!(
        r#"You are a senior technical writer.

The markdown documentation below was reviewed for clarity and received the feedback shown.
Rewrite the documentation so it is clearer, more complete and more coherent, addressing
every point of the feedback directly. Keep the original intent, facts and structure unless
the feedback asks for a change.

Respond with the revised documentation only: no preamble, no commentary, no surrounding
code fence.

## Feedback
{feedback}

## Original Documentation
{document}

## Revised Documentation
"#
    )
}

/// Rewriter that asks a chat model to revise the document
pub struct DocumentRewriter<'a> {
    model: &'a dyn ChatModel,
}

impl<'a> DocumentRewriter<'a> {
    pub fn new(model: &'a dyn ChatModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Rewriter for DocumentRewriter<'_> {
    async fn rewrite(&self, document: &str, feedback: &str) -> Result<String, RewriteError> {
        let prompt = build_rewrite_prompt(document, feedback);

        debug!(
            prompt_len = prompt.len(),
            model = self.model.model(),
            "Requesting rewrite"
        );

        let output = self.model.complete(&prompt).await?;

        info!(
            duration_secs = output.duration.as_secs_f64(),
            lines = output.lines(),
            "Rewrite completed"
        );

        let revised = output.content.trim();
        if revised.is_empty() {
            return Err(RewriteError::EmptyDocument);
        }

        Ok(format!("{}\n", revised))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatOutput;
    use std::time::Duration;

    struct CannedModel(&'static str);

    #[async_trait]
    impl ChatModel for CannedModel {
        fn model(&self) -> &str {
            "canned-1"
        }

        async fn complete(&self, _prompt: &str) -> Result<ChatOutput, AgentError> {
            Ok(ChatOutput::new(
                self.0.to_string(),
                "canned-1".to_string(),
                Duration::ZERO,
            ))
        }
    }

    #[test]
    fn test_prompt_contains_feedback_and_document() {
        let prompt = build_rewrite_prompt("# Title\nBody", "Explain the acronyms");
        assert!(prompt.contains("Explain the acronyms"));
        assert!(prompt.contains("# Title\nBody"));
        let feedback_pos = prompt.find("## Feedback").unwrap();
        let doc_pos = prompt.find("## Original Documentation").unwrap();
        assert!(feedback_pos < doc_pos);
    }

    #[tokio::test]
    async fn test_rewrite_trims_reply() {
        let model = CannedModel("\n\n# Better Title\n\nClear body.\n\n");
        let rewriter = DocumentRewriter::new(&model);
        let revised = rewriter.rewrite("# Title", "be clearer").await.unwrap();
        assert_eq!(revised, "# Better Title\n\nClear body.\n");
    }

    #[tokio::test]
    async fn test_rewrite_rejects_blank_reply() {
        let model = CannedModel("   \n");
        let rewriter = DocumentRewriter::new(&model);
        let result = rewriter.rewrite("# Title", "be clearer").await;
        assert!(matches!(result, Err(RewriteError::EmptyDocument)));
    }
}
