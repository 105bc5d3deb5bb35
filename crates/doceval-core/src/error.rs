use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoopError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scorer error: {0}")]
    ScorerError(#[from] doceval_critic::EvaluationError),

    #[error("Rewriter error: {0}")]
    RewriterError(#[from] doceval_agent::RewriteError),
}

impl LoopError {
    /// True when a remote collaborator (scorer or rewriter) failed
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::ScorerError(_) | Self::RewriterError(_))
    }
}
