use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use doceval_agent::Rewriter;
use doceval_core::store::{read_document, write_document};
use doceval_core::{
    compare, format_percentage, improved_path, interpret, questions_path, LoopRunner, RunRequest,
    RunStatus, RunSummary, Verdict,
};
use doceval_critic::{to_jsonl, Evaluation, QaGenerator, Scorer};
use doceval_logging::Logger;

/// Evaluate a document and print its score, band and reasoning
pub async fn grade(scorer: &dyn Scorer, file: &Path, output: Option<&Path>) -> Result<()> {
    let document = read_document(file)?;
    let evaluation = evaluate(scorer, file, &document).await?;

    println!("Score: {}", format_percentage(evaluation.score));
    println!(
        "This document has {}",
        interpret(evaluation.score).description()
    );
    println!("Reasoning: {}", evaluation.feedback);

    if let Some(output) = output {
        write_document(output, &evaluation.feedback)?;
        println!("Feedback saved to: {}", output.display());
    }

    Ok(())
}

/// Rewrite a document once, using saved feedback or a fresh evaluation
pub async fn improve(
    scorer: &dyn Scorer,
    rewriter: &dyn Rewriter,
    file: &Path,
    feedback: Option<&Path>,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let document = read_document(file)?;

    let feedback = match feedback {
        Some(path) => read_document(path)?,
        None => evaluate(scorer, file, &document).await?.feedback,
    };

    let improved = rewriter
        .rewrite(&document, &feedback)
        .await
        .with_context(|| format!("Failed to rewrite {}", file.display()))?;

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| improved_path(file));
    write_document(&output_path, &improved)?;

    println!(
        "{} Improved document saved to: {}",
        "✓".green(),
        output_path.display()
    );
    Ok(output_path)
}

/// Score two versions of a document side by side
pub async fn compare_documents(scorer: &dyn Scorer, original: &Path, improved: &Path) -> Result<()> {
    let original_doc = read_document(original)?;
    let improved_doc = read_document(improved)?;

    let before = evaluate(scorer, original, &original_doc).await?;
    println!("Original document: {}", original.display());
    print_score(&before);

    let after = evaluate(scorer, improved, &improved_doc).await?;
    println!();
    println!("Improved document: {}", improved.display());
    print_score(&after);

    let comparison = compare(before.score, after.score);
    println!();
    println!("{}", "Comparison:".bold());
    println!("Original score: {}", format_percentage(before.score));
    println!("Improved score: {}", format_percentage(after.score));
    println!("Difference: {}", format_percentage(comparison.delta));

    let message = comparison.verdict.message();
    match comparison.verdict {
        Verdict::Improved => println!("{}", message.green()),
        Verdict::Regressed => println!("{}", message.red()),
        Verdict::Unchanged => println!("{}", message.yellow()),
    }

    Ok(())
}

/// Generate question/answer pairs about a document as JSON lines
pub async fn generate_qa(
    generator: &QaGenerator<'_>,
    file: &Path,
    output: Option<&Path>,
    count: usize,
) -> Result<PathBuf> {
    let document = read_document(file)?;

    let pairs = generator
        .generate(&document, count)
        .await
        .with_context(|| format!("Failed to generate questions for {}", file.display()))?;

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| questions_path(file));
    let jsonl = to_jsonl(&pairs).context("Failed to serialize question pairs")?;
    write_document(&output_path, &jsonl)?;

    info!(pairs = pairs.len(), path = %output_path.display(), "Wrote question pairs");
    println!(
        "{} Generated {} question(s) at: {}",
        "✓".green(),
        pairs.len(),
        output_path.display()
    );
    Ok(output_path)
}

/// Run the convergence loop and report the summary
pub async fn auto_improve(
    scorer: &dyn Scorer,
    rewriter: &dyn Rewriter,
    logger: Arc<Logger>,
    request: RunRequest,
    json_output: bool,
) -> Result<RunSummary> {
    let runner = LoopRunner::new(scorer, rewriter, logger);
    let path = request.path.clone();

    let summary = runner
        .run(request)
        .await
        .with_context(|| format!("Auto-improvement failed for {}", path.display()))?;

    if json_output {
        let json = serde_json::to_string_pretty(&summary)?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }

    Ok(summary)
}

async fn evaluate(scorer: &dyn Scorer, path: &Path, document: &str) -> Result<Evaluation> {
    scorer
        .evaluate(document)
        .await
        .with_context(|| format!("Failed to evaluate {}", path.display()))
}

fn print_score(evaluation: &Evaluation) {
    println!("Score: {}", format_percentage(evaluation.score));
    println!(
        "This document has {}",
        interpret(evaluation.score).description()
    );
}

fn print_summary(summary: &RunSummary) {
    eprintln!();
    match summary.status {
        RunStatus::AlreadyMet => {
            eprintln!("{}", "=== TARGET ALREADY MET ===".green().bold());
        }
        RunStatus::TargetReached { iteration } => {
            eprintln!("{}", "=== TARGET REACHED ===".green().bold());
            eprintln!("Reached at iteration {}", iteration);
        }
        RunStatus::BudgetExhausted => {
            eprintln!("{}", "=== BUDGET EXHAUSTED ===".yellow().bold());
        }
    }

    eprintln!(
        "Original ({}): {}",
        summary.original_path.display(),
        format_percentage(summary.original_score)
    );
    for version in &summary.versions {
        eprintln!(
            "Iteration {} ({}): {}",
            version.iteration,
            version.path.display(),
            format_percentage(version.score)
        );
    }

    eprintln!(
        "Total improvement: {}",
        format_percentage(summary.total_improvement)
    );
    let best = summary.best_version();
    eprintln!(
        "Best version: {} ({})",
        best.path.display(),
        format_percentage(best.score)
    );
    eprintln!("Final version: {}", summary.final_path().display());
    eprintln!("Duration: {:.1}s", summary.total_duration_secs);

    if summary.status == RunStatus::BudgetExhausted {
        eprintln!(
            "{}",
            format!(
                "Target score of {} not reached after {} iteration(s).",
                format_percentage(summary.target_score),
                summary.iterations
            )
            .yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use doceval_agent::{AgentError, ChatModel, ChatOutput, RewriteError};
    use doceval_critic::EvaluationError;
    use doceval_logging::LogFormat;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FixedScorer {
        score: f64,
    }

    #[async_trait]
    impl Scorer for FixedScorer {
        async fn evaluate(&self, _document: &str) -> Result<Evaluation, EvaluationError> {
            Ok(Evaluation::new(self.score, "Split the long paragraphs."))
        }
    }

    #[derive(Default)]
    struct EchoRewriter {
        feedback: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Rewriter for EchoRewriter {
        async fn rewrite(&self, document: &str, feedback: &str) -> Result<String, RewriteError> {
            self.feedback.lock().unwrap().push(feedback.to_string());
            Ok(format!("{}(revised)\n", document))
        }
    }

    struct CannedModel(&'static str);

    #[async_trait]
    impl ChatModel for CannedModel {
        fn model(&self) -> &str {
            "canned-1"
        }

        async fn complete(&self, _prompt: &str) -> Result<ChatOutput, AgentError> {
            Ok(ChatOutput::new(
                self.0.to_string(),
                "canned-1".to_string(),
                Duration::from_millis(1),
            ))
        }
    }

    fn doc(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("guide.md");
        std::fs::write(&path, "# Guide\n").unwrap();
        path
    }

    #[tokio::test]
    async fn test_grade_writes_feedback() {
        let dir = TempDir::new().unwrap();
        let file = doc(&dir);
        let output = dir.path().join("out/feedback.txt");

        grade(&FixedScorer { score: 0.5 }, &file, Some(&output))
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "Split the long paragraphs."
        );
    }

    #[tokio::test]
    async fn test_grade_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = grade(&FixedScorer { score: 0.5 }, &dir.path().join("nope.md"), None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("File not found"));
    }

    #[tokio::test]
    async fn test_improve_defaults_to_improved_path() {
        let dir = TempDir::new().unwrap();
        let file = doc(&dir);
        let rewriter = EchoRewriter::default();

        let saved = improve(&FixedScorer { score: 0.4 }, &rewriter, &file, None, None)
            .await
            .unwrap();

        assert_eq!(saved, dir.path().join("guide_improved.md"));
        assert_eq!(
            std::fs::read_to_string(&saved).unwrap(),
            "# Guide\n(revised)\n"
        );
        assert_eq!(
            rewriter.feedback.lock().unwrap().as_slice(),
            ["Split the long paragraphs."]
        );
    }

    #[tokio::test]
    async fn test_improve_uses_feedback_file() {
        let dir = TempDir::new().unwrap();
        let file = doc(&dir);
        let feedback = dir.path().join("feedback.txt");
        std::fs::write(&feedback, "Add an example.").unwrap();
        let output = dir.path().join("final.md");
        let rewriter = EchoRewriter::default();

        let saved = improve(
            &FixedScorer { score: 0.4 },
            &rewriter,
            &file,
            Some(&feedback),
            Some(&output),
        )
        .await
        .unwrap();

        assert_eq!(saved, output);
        assert_eq!(
            rewriter.feedback.lock().unwrap().as_slice(),
            ["Add an example."]
        );
    }

    #[tokio::test]
    async fn test_improve_missing_feedback_file() {
        let dir = TempDir::new().unwrap();
        let file = doc(&dir);
        let rewriter = EchoRewriter::default();

        let result = improve(
            &FixedScorer { score: 0.4 },
            &rewriter,
            &file,
            Some(&dir.path().join("missing.txt")),
            None,
        )
        .await;

        assert!(result.is_err());
        assert!(rewriter.feedback.lock().unwrap().is_empty());
        assert!(!dir.path().join("guide_improved.md").exists());
    }

    #[tokio::test]
    async fn test_compare_requires_both_documents() {
        let dir = TempDir::new().unwrap();
        let file = doc(&dir);

        let result = compare_documents(
            &FixedScorer { score: 0.5 },
            &file,
            &dir.path().join("guide_improved.md"),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_generate_qa_writes_jsonl() {
        let dir = TempDir::new().unwrap();
        let file = doc(&dir);
        let model = CannedModel(
            r#"Here you go: [{"input": "What is it?", "ideal": "A guide."}, {"input": "Who reads it?", "ideal": "Users."}]"#,
        );
        let generator = QaGenerator::new(&model);

        let saved = generate_qa(&generator, &file, None, 2).await.unwrap();

        assert_eq!(saved, dir.path().join("guide_questions.jsonl"));
        let content = std::fs::read_to_string(saved).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"input":"What is it?","ideal":"A guide."}"#);
    }

    #[tokio::test]
    async fn test_auto_improve_already_met() {
        let dir = TempDir::new().unwrap();
        let file = doc(&dir);
        let rewriter = EchoRewriter::default();
        let logger = Arc::new(Logger::new(LogFormat::Compact));

        let summary = auto_improve(
            &FixedScorer { score: 0.9 },
            &rewriter,
            logger,
            RunRequest::new(&file),
            true,
        )
        .await
        .unwrap();

        assert_eq!(summary.status, RunStatus::AlreadyMet);
        assert!(rewriter.feedback.lock().unwrap().is_empty());
    }
}
