//! Score interpretation, comparison and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clarity band a score falls into, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarityBand {
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ClarityBand {
    /// Sentence fragment completing "This document has ..."
    pub fn description(&self) -> &'static str {
        match self {
            ClarityBand::VeryPoor => "very poor clarity and requires a thorough rewrite.",
            ClarityBand::Poor => "poor clarity and needs significant improvements.",
            ClarityBand::Fair => "fair clarity but can be improved.",
            ClarityBand::Good => "good clarity with minor improvements needed.",
            ClarityBand::Excellent => "excellent clarity with very minor or no changes needed.",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClarityBand::VeryPoor => "very poor",
            ClarityBand::Poor => "poor",
            ClarityBand::Fair => "fair",
            ClarityBand::Good => "good",
            ClarityBand::Excellent => "excellent",
        }
    }
}

impl fmt::Display for ClarityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Map a score in [0, 1] to its clarity band. Boundaries belong to the lower band.
pub fn interpret(score: f64) -> ClarityBand {
    if score <= 0.2 {
        ClarityBand::VeryPoor
    } else if score <= 0.4 {
        ClarityBand::Poor
    } else if score <= 0.6 {
        ClarityBand::Fair
    } else if score <= 0.8 {
        ClarityBand::Good
    } else {
        ClarityBand::Excellent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Improved,
    Regressed,
    Unchanged,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Improved => "The document has been improved.",
            Verdict::Regressed => "The document has gotten worse.",
            Verdict::Unchanged => "The document has not changed in clarity.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// `after - before`
    pub delta: f64,
    pub verdict: Verdict,
}

/// Compare two scores. Equality is exact; there is no tolerance.
pub fn compare(before: f64, after: f64) -> Comparison {
    let delta = after - before;
    let verdict = if delta > 0.0 {
        Verdict::Improved
    } else if delta < 0.0 {
        Verdict::Regressed
    } else {
        Verdict::Unchanged
    };
    Comparison { delta, verdict }
}

/// Render a score (or a score delta) as a percentage with one decimal place
pub fn format_percentage(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_bands() {
        assert_eq!(interpret(0.0), ClarityBand::VeryPoor);
        assert_eq!(interpret(0.35), ClarityBand::Poor);
        assert_eq!(interpret(0.5), ClarityBand::Fair);
        assert_eq!(interpret(0.75), ClarityBand::Good);
        assert_eq!(interpret(0.95), ClarityBand::Excellent);
        assert_eq!(interpret(1.0), ClarityBand::Excellent);
    }

    #[test]
    fn test_interpret_boundaries_belong_to_lower_band() {
        assert_eq!(interpret(0.2), ClarityBand::VeryPoor);
        assert_eq!(interpret(0.4), ClarityBand::Poor);
        assert_eq!(interpret(0.6), ClarityBand::Fair);
        assert_eq!(interpret(0.8), ClarityBand::Good);
        assert_eq!(interpret(0.8000001), ClarityBand::Excellent);
    }

    #[test]
    fn test_band_descriptions() {
        assert_eq!(
            interpret(0.1).description(),
            "very poor clarity and requires a thorough rewrite."
        );
        assert_eq!(interpret(0.9).to_string(), "excellent");
    }

    #[test]
    fn test_compare_verdicts() {
        let up = compare(0.5, 0.75);
        assert_eq!(up.verdict, Verdict::Improved);
        assert!((up.delta - 0.25).abs() < 1e-12);

        assert_eq!(compare(0.7, 0.6).verdict, Verdict::Regressed);
        assert_eq!(compare(0.6, 0.6).verdict, Verdict::Unchanged);
    }

    #[test]
    fn test_compare_has_no_tolerance() {
        let tiny = compare(0.5, 0.5 + f64::EPSILON);
        assert_eq!(tiny.verdict, Verdict::Improved);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.7), "70.0%");
        assert_eq!(format_percentage(0.755), "75.5%");
        assert_eq!(format_percentage(1.0), "100.0%");
        assert_eq!(format_percentage(-0.05), "-5.0%");
    }
}
