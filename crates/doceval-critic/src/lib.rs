mod evaluation;
pub mod evaluator;
mod prompts;
mod qa;

pub use evaluation::{normalize_score, Evaluation, EvaluationParseError, RAW_SCORE_MAX};
pub use evaluator::{ClarityScorer, EvaluationError, Scorer};
pub use prompts::CriticPrompts;
pub use qa::{parse_qa_pairs, to_jsonl, QaError, QaGenerator, QaPair};
