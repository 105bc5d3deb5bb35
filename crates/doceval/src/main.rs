mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use doceval_agent::{create_chat_model, DocumentRewriter};
use doceval_core::{RunRequest, DEFAULT_MAX_ITERATIONS, DEFAULT_TARGET_SCORE};
use doceval_critic::{ClarityScorer, QaGenerator};
use doceval_logging::{init_tracing, LogFormat, Logger};

use config::{ProjectConfig, Role};

const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Parser, Debug)]
#[command(
    name = "doceval",
    about = "Evaluate and improve documentation in a closed loop",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Working directory (default: current directory)
    #[arg(short = 'd', long, global = true)]
    working_dir: Option<PathBuf>,

    /// Model to use for both scoring and rewriting
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatChoice,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Also append structured events to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate documentation clarity
    Grade {
        /// Path to the documentation file
        file: PathBuf,

        /// Path to save the evaluation feedback
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate an improved version of a document
    Improve {
        /// Path to the documentation file
        file: PathBuf,

        /// Feedback file from the grade command (default: evaluate now)
        #[arg(short, long)]
        feedback: Option<PathBuf>,

        /// Path to save the improved document (default: <name>_improved.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare original and improved documents
    Compare {
        /// Path to the original document
        original: PathBuf,

        /// Path to the improved document
        improved: PathBuf,
    },

    /// Run the evaluate-rewrite loop until the target score is reached
    AutoImprove {
        /// Path to the documentation file
        file: PathBuf,

        /// Maximum number of improvement iterations
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Target clarity score, normally between 0 and 1
        #[arg(short, long, allow_negative_numbers = true)]
        target: Option<f64>,

        /// Output final result as JSON
        #[arg(long)]
        json_output: bool,
    },

    /// Generate question/answer pairs about a document as JSON lines
    GenerateQa {
        /// Path to the documentation file
        file: PathBuf,

        /// Path to save the pairs (default: <name>_questions.jsonl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of pairs to request
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    init_tracing(&cli.log_level, log_format);

    let api_key = match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!(
                "{} {} environment variable not set",
                "Error:".red().bold(),
                API_KEY_VAR
            );
            std::process::exit(1);
        }
    };

    // Determine working directory
    let working_dir = match cli.working_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let project_config = ProjectConfig::load(&working_dir)?.unwrap_or_default();

    let scorer_model = create_chat_model(project_config.agent_config(
        &api_key,
        Role::Scorer,
        cli.model.as_deref(),
    ))
    .context("Failed to create scorer client")?;
    let rewriter_model = create_chat_model(project_config.agent_config(
        &api_key,
        Role::Rewriter,
        cli.model.as_deref(),
    ))
    .context("Failed to create rewriter client")?;

    let scorer = ClarityScorer::new(scorer_model.as_ref());
    let rewriter = DocumentRewriter::new(rewriter_model.as_ref());

    let resolve = |path: &Path| resolve_path(&working_dir, path);

    match cli.command {
        Command::Grade { file, output } => {
            let output = output.as_deref().map(resolve);
            commands::grade(&scorer, &resolve(&file), output.as_deref()).await?;
        }
        Command::Improve {
            file,
            feedback,
            output,
        } => {
            let feedback = feedback.as_deref().map(resolve);
            let output = output.as_deref().map(resolve);
            commands::improve(
                &scorer,
                &rewriter,
                &resolve(&file),
                feedback.as_deref(),
                output.as_deref(),
            )
            .await?;
        }
        Command::Compare { original, improved } => {
            commands::compare_documents(&scorer, &resolve(&original), &resolve(&improved))
                .await?;
        }
        Command::AutoImprove {
            file,
            iterations,
            target,
            json_output,
        } => {
            let max_iterations = iterations
                .or(project_config.auto_improve.iterations)
                .unwrap_or(DEFAULT_MAX_ITERATIONS);
            let target_score = target
                .or(project_config.auto_improve.target)
                .unwrap_or(DEFAULT_TARGET_SCORE);

            let request = RunRequest::new(resolve(&file))
                .with_max_iterations(max_iterations)
                .with_target_score(target_score);

            let logger = match cli.log_file {
                Some(ref path) => Logger::with_file(log_format, &resolve(path))
                    .with_context(|| format!("Failed to open log file {}", path.display()))?,
                None => Logger::new(log_format),
            };

            commands::auto_improve(&scorer, &rewriter, Arc::new(logger), request, json_output)
                .await?;
        }
        Command::GenerateQa {
            file,
            output,
            count,
        } => {
            let generator = QaGenerator::new(scorer_model.as_ref());
            let output = output.as_deref().map(resolve);
            commands::generate_qa(&generator, &resolve(&file), output.as_deref(), count).await?;
        }
    }

    Ok(())
}

fn resolve_path(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
