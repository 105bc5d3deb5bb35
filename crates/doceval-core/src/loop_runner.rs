use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use doceval_agent::Rewriter;
use doceval_critic::Scorer;
use doceval_logging::{LogEvent, Logger};

use crate::context::IterationRecord;
use crate::error::LoopError;
use crate::outcome::{RunStatus, RunSummary, VersionScore};
use crate::paths::iteration_path;
use crate::store::{read_document, write_document};
use crate::RunState;

pub const DEFAULT_MAX_ITERATIONS: usize = 3;
pub const DEFAULT_TARGET_SCORE: f64 = 0.7;

/// Parameters of one improvement run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub path: PathBuf,
    pub max_iterations: usize,
    pub target_score: f64,
}

impl RunRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            target_score: DEFAULT_TARGET_SCORE,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_target_score(mut self, target: f64) -> Self {
        self.target_score = target;
        self
    }
}

/// Orchestrates the evaluate-rewrite loop
pub struct LoopRunner<'a> {
    scorer: &'a dyn Scorer,
    rewriter: &'a dyn Rewriter,
    logger: Arc<Logger>,
}

impl<'a> LoopRunner<'a> {
    pub fn new(scorer: &'a dyn Scorer, rewriter: &'a dyn Rewriter, logger: Arc<Logger>) -> Self {
        Self {
            scorer,
            rewriter,
            logger,
        }
    }

    /// Run the loop until the target is met or the budget is spent.
    ///
    /// Any scorer, rewriter or file failure aborts the run; iteration files
    /// already written stay on disk.
    pub async fn run(&self, request: RunRequest) -> Result<RunSummary, LoopError> {
        self.logger.log(&LogEvent::RunStarted {
            path: request.path.clone(),
            target: request.target_score,
            max_iterations: request.max_iterations,
        });

        let original = read_document(&request.path)?;
        let evaluation = self.scorer.evaluate(&original).await?;

        self.logger.log(&LogEvent::OriginalScored {
            score: evaluation.score,
        });

        let mut state = RunState::new(
            request.path.clone(),
            original,
            evaluation,
            request.max_iterations,
        );

        if state.original_score >= request.target_score {
            self.logger.log(&LogEvent::TargetAlreadyMet {
                score: state.original_score,
                target: request.target_score,
            });
            return Ok(RunSummary::already_met(state, request.target_score));
        }

        let mut status = RunStatus::BudgetExhausted;

        while state.should_continue() {
            let iteration = state.begin_iteration();

            let record = self
                .run_iteration(&state, iteration)
                .await
                .inspect_err(|e| {
                    warn!(error = %e, iteration, "Error during iteration");
                    self.logger.log(&LogEvent::ErrorEncountered {
                        iteration,
                        error: e.to_string(),
                    });
                })?;

            if record.score >= request.target_score {
                self.logger.log(&LogEvent::TargetReached {
                    iteration,
                    score: record.score,
                    target: request.target_score,
                });
                state.push_record(record);
                status = RunStatus::TargetReached { iteration };
                break;
            }

            debug!(iteration, score = record.score, "Continuing to next iteration");
            state.adopt(record);
        }

        if status == RunStatus::BudgetExhausted {
            self.logger.log(&LogEvent::MaxIterationsReached {
                iterations: state.iteration,
                target: request.target_score,
            });
        }

        let versions = self.rescore_versions(&state).await?;
        let summary = RunSummary::completed(state, request.target_score, status, versions);

        self.logger.log(&LogEvent::RunCompleted {
            iterations: summary.iterations,
            final_score: summary.final_score,
            total_improvement: summary.total_improvement,
            duration_secs: summary.total_duration_secs,
        });

        Ok(summary)
    }

    /// Rewrite, save and score one candidate
    async fn run_iteration(
        &self,
        state: &RunState,
        iteration: usize,
    ) -> Result<IterationRecord, LoopError> {
        self.logger.log(&LogEvent::IterationStarted {
            iteration,
            max_iterations: state.max_iterations,
        });

        let candidate = self
            .rewriter
            .rewrite(&state.current_document, &state.current_feedback)
            .await?;

        let path = iteration_path(&state.original_path, iteration);
        write_document(&path, &candidate)?;

        self.logger.log(&LogEvent::DocumentRewritten {
            iteration,
            path: path.clone(),
            lines: candidate.lines().count(),
        });

        let evaluation = self.scorer.evaluate(&candidate).await?;
        let delta = evaluation.score - state.last_score;

        self.logger.log(&LogEvent::IterationScored {
            iteration,
            score: evaluation.score,
            delta,
        });

        Ok(IterationRecord {
            iteration,
            path,
            document: candidate,
            score: evaluation.score,
            feedback: evaluation.feedback,
            delta,
            timestamp: Utc::now(),
        })
    }

    /// Re-read every saved version and score it again.
    ///
    /// The reported version scores come from this pass, not from the scores
    /// captured inside the loop; with a non-deterministic scorer they may differ.
    async fn rescore_versions(&self, state: &RunState) -> Result<Vec<VersionScore>, LoopError> {
        let mut versions = Vec::with_capacity(state.iteration);

        for iteration in 1..=state.iteration {
            let path = iteration_path(&state.original_path, iteration);
            if !path.exists() {
                warn!(path = %path.display(), "Iteration file disappeared, skipping");
                continue;
            }

            let document = read_document(&path)?;
            let evaluation = self.scorer.evaluate(&document).await?;

            self.logger.log(&LogEvent::VersionRescored {
                iteration,
                path: path.clone(),
                score: evaluation.score,
            });

            versions.push(VersionScore {
                iteration,
                path,
                score: evaluation.score,
            });
        }

        info!(versions = versions.len(), "Re-evaluated saved versions");
        Ok(versions)
    }
}
