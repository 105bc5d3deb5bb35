use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Highest raw score the model is asked to give
pub const RAW_SCORE_MAX: f64 = 10.0;

/// The scorer's verdict on a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Clarity score in [0, 1]
    pub score: f64,
    /// Explanation of the score, used as rewrite feedback
    pub feedback: String,
}

/// Shape of the JSON block the model is asked to return
#[derive(Debug, Deserialize)]
struct RawEvaluation {
    score: f64,
    #[serde(alias = "feedback", alias = "reasoning", default)]
    reason: String,
}

#[derive(Error, Debug)]
pub enum EvaluationParseError {
    #[error("No evaluation found in scorer output")]
    NoEvaluationFound,

    #[error("Failed to parse evaluation JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Invalid evaluation format: {0}")]
    InvalidFormat(String),
}

impl Evaluation {
    pub fn new(score: f64, feedback: impl Into<String>) -> Self {
        Self {
            score,
            feedback: feedback.into(),
        }
    }

    /// Parse an evaluation from the scorer's output text
    ///
    /// Expected format:
    /// ```text
    /// <evaluation>
    /// {"score": 7, "reason": "..."}
    /// </evaluation>
    /// ```
    /// A bare JSON object anywhere in the output is accepted as a fallback.
    /// The raw 0-10 score is normalised to [0, 1].
    pub fn parse(output: &str) -> Result<Self, EvaluationParseError> {
        debug!(output_len = output.len(), "Parsing scorer output");

        let raw = match Self::parse_evaluation_block(output)? {
            Some(raw) => raw,
            None => Self::parse_bare_object(output)?,
        };

        Ok(Self {
            score: normalize_score(raw.score),
            feedback: raw.reason.trim().to_string(),
        })
    }

    fn parse_evaluation_block(output: &str) -> Result<Option<RawEvaluation>, EvaluationParseError> {
        let start = output.find("<evaluation>");
        let end = output.find("</evaluation>");

        match (start, end) {
            (Some(start), Some(end)) if start < end => {
                let json_str = output[start + "<evaluation>".len()..end].trim();
                debug!(json = json_str, "Found evaluation block");
                Ok(Some(serde_json::from_str(json_str)?))
            }
            (Some(_), Some(_)) => Err(EvaluationParseError::InvalidFormat(
                "Malformed evaluation block".to_string(),
            )),
            _ => Ok(None),
        }
    }

    fn parse_bare_object(output: &str) -> Result<RawEvaluation, EvaluationParseError> {
        let start = output.find('{');
        let end = output.rfind('}');

        match (start, end) {
            (Some(start), Some(end)) if start < end => {
                debug!("Parsing bare JSON object from scorer output");
                Ok(serde_json::from_str(&output[start..=end])?)
            }
            _ => Err(EvaluationParseError::NoEvaluationFound),
        }
    }
}

/// Map a raw 0-10 score onto [0, 1]
pub fn normalize_score(raw: f64) -> f64 {
    (raw / RAW_SCORE_MAX).clamp(0.0, 1.0)
}
