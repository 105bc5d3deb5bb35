use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::{IterationRecord, RunState};

/// How an improvement run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// The original document already met the target; nothing was rewritten
    AlreadyMet,
    /// An iteration reached the target
    TargetReached { iteration: usize },
    /// The iteration budget ran out below the target
    BudgetExhausted,
}

/// Score of one saved version, re-evaluated from disk after the loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionScore {
    pub iteration: usize,
    pub path: PathBuf,
    pub score: f64,
}

/// Final report of an improvement run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub original_path: PathBuf,
    pub original_score: f64,
    pub target_score: f64,
    pub max_iterations: usize,
    pub iterations: usize,
    #[serde(flatten)]
    pub status: RunStatus,
    pub versions: Vec<VersionScore>,
    /// Score of the last completed iteration (original score when none ran)
    pub final_score: f64,
    /// `final_score - original_score`
    pub total_improvement: f64,
    pub total_duration_secs: f64,
    #[serde(skip)]
    pub history: Vec<IterationRecord>,
}

impl RunSummary {
    /// Summary for a run whose original document already met the target
    pub fn already_met(state: RunState, target_score: f64) -> Self {
        let duration = state.total_duration();
        Self::build(state, target_score, RunStatus::AlreadyMet, Vec::new(), duration)
    }

    /// Summary for a run that entered the loop
    pub fn completed(
        state: RunState,
        target_score: f64,
        status: RunStatus,
        versions: Vec<VersionScore>,
    ) -> Self {
        let duration = state.total_duration();
        Self::build(state, target_score, status, versions, duration)
    }

    fn build(
        state: RunState,
        target_score: f64,
        status: RunStatus,
        versions: Vec<VersionScore>,
        duration: Duration,
    ) -> Self {
        let final_score = state.latest_score();
        Self {
            original_path: state.original_path,
            original_score: state.original_score,
            target_score,
            max_iterations: state.max_iterations,
            iterations: state.history.len(),
            status,
            versions,
            final_score,
            total_improvement: final_score - state.original_score,
            total_duration_secs: duration.as_secs_f64(),
            history: state.history,
        }
    }

    /// True when the final version meets the target
    pub fn target_reached(&self) -> bool {
        matches!(
            self.status,
            RunStatus::AlreadyMet | RunStatus::TargetReached { .. }
        )
    }

    /// Path of the final version (the original when no iteration ran)
    pub fn final_path(&self) -> &PathBuf {
        self.history
            .last()
            .map(|record| &record.path)
            .unwrap_or(&self.original_path)
    }

    /// Highest-scoring version, with the original counted as iteration 0.
    ///
    /// Saved versions are ranked by their re-evaluated scores; on a tie the
    /// earlier version wins.
    pub fn best_version(&self) -> VersionScore {
        let original = VersionScore {
            iteration: 0,
            path: self.original_path.clone(),
            score: self.original_score,
        };

        self.versions.iter().fold(original, |best, version| {
            if version.score > best.score {
                version.clone()
            } else {
                best
            }
        })
    }
}
