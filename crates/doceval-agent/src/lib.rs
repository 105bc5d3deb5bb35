mod openai;
mod output;
mod rewriter;
mod traits;

pub use openai::OpenAiChat;
pub use output::ChatOutput;
pub use rewriter::{build_rewrite_prompt, DocumentRewriter, RewriteError, Rewriter};
pub use traits::{AgentConfig, AgentError, ChatModel, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Create the default chat model for a configuration
pub fn create_chat_model(config: AgentConfig) -> Result<Box<dyn ChatModel>, AgentError> {
    Ok(Box::new(OpenAiChat::new(config)?))
}
