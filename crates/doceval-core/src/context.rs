use chrono::{DateTime, Utc};
use doceval_critic::Evaluation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// State of one improvement run, owned by the loop runner
#[derive(Debug, Clone)]
pub struct RunState {
    /// Document the run started from
    pub original_path: PathBuf,
    pub original_score: f64,
    /// Document fed to the next rewrite
    pub current_document: String,
    /// Feedback fed to the next rewrite
    pub current_feedback: String,
    /// Score of the current document
    pub last_score: f64,
    /// Completed-or-started iteration count (0 before the loop)
    pub iteration: usize,
    pub max_iterations: usize,
    /// One record per completed iteration
    pub history: Vec<IterationRecord>,
    started_at: Instant,
}

/// Record of a single iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration index
    pub iteration: usize,
    /// Where the rewritten document was saved
    pub path: PathBuf,
    pub document: String,
    pub score: f64,
    pub feedback: String,
    /// Score change relative to the previous version
    pub delta: f64,
    pub timestamp: DateTime<Utc>,
}

impl RunState {
    pub fn new(
        original_path: PathBuf,
        original_document: String,
        evaluation: Evaluation,
        max_iterations: usize,
    ) -> Self {
        Self {
            original_path,
            current_document: original_document,
            original_score: evaluation.score,
            current_feedback: evaluation.feedback,
            last_score: evaluation.score,
            iteration: 0,
            max_iterations,
            history: Vec::new(),
            started_at: Instant::now(),
        }
    }

    pub fn should_continue(&self) -> bool {
        self.iteration < self.max_iterations
    }

    /// Advance the counter and return the new 1-based iteration index
    pub fn begin_iteration(&mut self) -> usize {
        self.iteration += 1;
        self.iteration
    }

    pub fn push_record(&mut self, record: IterationRecord) {
        self.history.push(record);
    }

    /// Make the record's document the input of the next iteration
    pub fn adopt(&mut self, record: IterationRecord) {
        self.current_document = record.document.clone();
        self.current_feedback = record.feedback.clone();
        self.last_score = record.score;
        self.push_record(record);
    }

    /// Score of the most recent completed iteration, or the original score
    pub fn latest_score(&self) -> f64 {
        self.history
            .last()
            .map(|record| record.score)
            .unwrap_or(self.original_score)
    }

    pub fn total_duration(&self) -> Duration {
        self.started_at.elapsed()
    }
}
