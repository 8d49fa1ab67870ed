//! Shared helper functions for CLI commands.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use lexishield::models::{AnalysisMode, ConversationHistory, ConversationTurn, DocumentCandidate};
use lexishield::utils::truncate;
use lexishield::{AnalysisSession, Config, SessionError};

use super::icons::{dim_arrow, error, success};

/// Await `fut` behind a spinner showing `message`.
pub async fn with_spinner<F: Future>(message: impl Into<String>, fut: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    let message: String = message.into();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    pb.finish_and_clear();
    output
}

/// Print a session error, with its cause underneath when there is one.
pub fn report(err: &SessionError) {
    eprintln!("{} {}", error(), err);
    let detail = err.detail();
    if detail != err.to_string() {
        eprintln!("  {} {}", dim_arrow(), style(detail).dim());
    }
}

/// Build a session for `config`, stage the file at `path` and extract its text.
pub async fn open_document(config: &Config, path: &Path) -> anyhow::Result<AnalysisSession> {
    let session =
        AnalysisSession::from_config(&config.backend).context("Failed to build HTTP client")?;

    let candidate = DocumentCandidate::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = candidate.name.clone();

    session.select_document(candidate)?;
    with_spinner(format!("Extracting text from {}...", name), session.upload()).await?;

    if let Some(text) = session.extracted_text() {
        eprintln!(
            "{} Extracted {} characters from {}",
            success(),
            text.chars().count(),
            name
        );
        eprintln!("  {} {}", dim_arrow(), style(preview(&text)).dim());
    }

    Ok(session)
}

/// Print a single-shot result under its heading.
pub fn print_result(mode: AnalysisMode, text: &str) {
    println!("\n{}", style(mode.display_name()).bold().cyan());
    println!("{}", "-".repeat(50));
    println!("{}", text);
}

/// Print one conversation turn with its speaker label.
pub fn print_turn(turn: &ConversationTurn) {
    let label = format!("{}:", turn.role.display_name());
    println!("{} {}", style(label).bold(), turn.text);
}

/// Print the whole conversation, oldest turn first.
pub fn print_transcript(history: &ConversationHistory) {
    if history.is_empty() {
        println!("{}", style("No questions asked yet.").dim());
        return;
    }
    for turn in history {
        print_turn(turn);
    }
}

/// One-line preview of extracted text for status output.
pub fn preview(text: &str) -> String {
    truncate(&text.split_whitespace().collect::<Vec<_>>().join(" "), 80)
}
