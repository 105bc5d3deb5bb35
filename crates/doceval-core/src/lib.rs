mod context;
mod error;
mod loop_runner;
mod outcome;
pub mod paths;
pub mod score;
pub mod store;

pub use context::{IterationRecord, RunState};
pub use error::LoopError;
pub use loop_runner::{LoopRunner, RunRequest, DEFAULT_MAX_ITERATIONS, DEFAULT_TARGET_SCORE};
pub use outcome::{RunStatus, RunSummary, VersionScore};
pub use paths::{improved_path, iteration_path, questions_path};
pub use score::{compare, format_percentage, interpret, ClarityBand, Comparison, Verdict};
