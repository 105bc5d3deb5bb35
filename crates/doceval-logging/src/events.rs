use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Structured log events for the improvement loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    RunStarted {
        path: PathBuf,
        target: f64,
        max_iterations: usize,
    },
    OriginalScored {
        score: f64,
    },
    TargetAlreadyMet {
        score: f64,
        target: f64,
    },
    IterationStarted {
        iteration: usize,
        max_iterations: usize,
    },
    DocumentRewritten {
        iteration: usize,
        path: PathBuf,
        lines: usize,
    },
    IterationScored {
        iteration: usize,
        score: f64,
        delta: f64,
    },
    TargetReached {
        iteration: usize,
        score: f64,
        target: f64,
    },
    MaxIterationsReached {
        iterations: usize,
        target: f64,
    },
    VersionRescored {
        iteration: usize,
        path: PathBuf,
        score: f64,
    },
    RunCompleted {
        iterations: usize,
        final_score: f64,
        total_improvement: f64,
        duration_secs: f64,
    },
    ErrorEncountered {
        iteration: usize,
        error: String,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors and visual structure
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

fn pct(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

fn signed_pct(delta: f64) -> String {
    format!("{:+.1}%", delta * 100.0)
}

/// Logger for doceval events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::RunStarted {
                path,
                target,
                max_iterations,
            } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{}",
                    "╭─────────────────────────────────────────────────────────────────────╮"
                        .bright_blue()
                );
                let _ = writeln!(
                    stderr,
                    "{}  {}{}",
                    "│".bright_blue(),
                    "doceval auto-improve".bold().bright_white(),
                    " ".repeat(47) + &"│".bright_blue().to_string()
                );
                let _ = writeln!(
                    stderr,
                    "{}  {} {}",
                    "│".bright_blue(),
                    "File:".dimmed(),
                    Self::truncate_with_padding(&path.display().to_string(), 60, 67).dimmed()
                );
                let _ = writeln!(
                    stderr,
                    "{}  {} {}",
                    "│".bright_blue(),
                    "Target:".dimmed(),
                    Self::truncate_with_padding(
                        &format!("{} within {} iteration(s)", pct(*target), max_iterations),
                        58,
                        65
                    )
                    .dimmed()
                );
                let _ = writeln!(
                    stderr,
                    "{}",
                    "╰─────────────────────────────────────────────────────────────────────╯"
                        .bright_blue()
                );
                let _ = writeln!(stderr);
            }
            LogEvent::OriginalScored { score } => {
                let _ = writeln!(
                    stderr,
                    "  {} Original score: {}",
                    "▶".bright_cyan(),
                    pct(*score).bold()
                );
                let _ = writeln!(stderr);
            }
            LogEvent::TargetAlreadyMet { target, .. } => {
                let _ = writeln!(
                    stderr,
                    "{} Original document already meets the target of {}",
                    "✓".bright_green(),
                    pct(*target)
                );
            }
            LogEvent::IterationStarted {
                iteration,
                max_iterations,
            } => {
                let iter_text = format!("─ Iteration {}/{} ", iteration, max_iterations);
                let padding = "─".repeat(67usize.saturating_sub(iter_text.chars().count()));
                let _ = writeln!(
                    stderr,
                    "{}{}{}",
                    "┌".bright_blue(),
                    iter_text.bright_blue().bold(),
                    padding.bright_blue()
                );
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "▶".bright_cyan(),
                    "REWRITE".bright_cyan().bold()
                );
            }
            LogEvent::DocumentRewritten { path, lines, .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} Saved {} ({} {})",
                    "✓".bright_green(),
                    path.display(),
                    lines,
                    if *lines == 1 { "line" } else { "lines" }
                );
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "▶".bright_magenta(),
                    "SCORE".bright_magenta().bold()
                );
            }
            LogEvent::IterationScored { score, delta, .. } => {
                let styled_delta = if *delta > 0.0 {
                    signed_pct(*delta).bright_green().to_string()
                } else if *delta < 0.0 {
                    signed_pct(*delta).bright_red().to_string()
                } else {
                    signed_pct(*delta).dimmed().to_string()
                };
                let _ = writeln!(
                    stderr,
                    "    → Score: {} ({} from previous version)",
                    pct(*score).bold(),
                    styled_delta
                );
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{}",
                    "└─────────────────────────────────────────────────────────────────────┘"
                        .bright_blue()
                );
                let _ = writeln!(stderr);
            }
            LogEvent::TargetReached { iteration, target, .. } => {
                let _ = writeln!(
                    stderr,
                    "{} Target score of {} reached in iteration {}",
                    "✓".bright_green(),
                    pct(*target),
                    iteration
                );
            }
            LogEvent::MaxIterationsReached { iterations, target } => {
                let _ = writeln!(
                    stderr,
                    "{} Maximum iterations ({}) reached without achieving the target ({})",
                    "⚠".bright_yellow(),
                    iterations,
                    pct(*target)
                );
            }
            LogEvent::VersionRescored { .. } | LogEvent::RunCompleted { .. } => {
                // The final summary printed by the binary covers these
            }
            LogEvent::ErrorEncountered { iteration, error } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} Error in iteration {}: {}",
                    "✗".bright_red(),
                    iteration,
                    error.bright_red()
                );
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::RunStarted {
                target,
                max_iterations,
                ..
            } => format!(
                "[{}] run:start target={} max={}",
                timestamp,
                pct(*target),
                max_iterations
            ),
            LogEvent::OriginalScored { score } => {
                format!("[{}] original:score {}", timestamp, pct(*score))
            }
            LogEvent::TargetAlreadyMet { score, .. } => {
                format!("[{}] run:met {}", timestamp, pct(*score))
            }
            LogEvent::IterationStarted { iteration, .. } => {
                format!("[{}] iter:start:{}", timestamp, iteration)
            }
            LogEvent::DocumentRewritten {
                iteration, path, ..
            } => format!(
                "[{}] iter:write:{} {}",
                timestamp,
                iteration,
                path.display()
            ),
            LogEvent::IterationScored {
                iteration,
                score,
                delta,
            } => format!(
                "[{}] iter:score:{} {} ({})",
                timestamp,
                iteration,
                pct(*score),
                signed_pct(*delta)
            ),
            LogEvent::TargetReached { iteration, .. } => {
                format!("[{}] run:target:{}", timestamp, iteration)
            }
            LogEvent::MaxIterationsReached { iterations, .. } => {
                format!("[{}] run:limit:{}", timestamp, iterations)
            }
            LogEvent::VersionRescored {
                iteration, score, ..
            } => format!("[{}] version:{} {}", timestamp, iteration, pct(*score)),
            LogEvent::RunCompleted {
                iterations,
                total_improvement,
                duration_secs,
                ..
            } => format!(
                "[{}] run:done:{} {} {:.1}s",
                timestamp,
                iterations,
                signed_pct(*total_improvement),
                duration_secs
            ),
            LogEvent::ErrorEncountered { iteration, error } => {
                format!("[{}] error:{}:{}", timestamp, iteration, error)
            }
        };
        let _ = writeln!(stderr, "{}", msg);
    }

    /// Truncate a string and pad to exact width
    fn truncate_with_padding(s: &str, max_len: usize, total_width: usize) -> String {
        let char_count = s.chars().count();
        let truncated = if char_count > max_len {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{}...", head)
        } else {
            s.to_string()
        };

        let padding_needed = total_width.saturating_sub(truncated.chars().count() + 1);
        format!("{}{}│", truncated, " ".repeat(padding_needed))
    }
}
