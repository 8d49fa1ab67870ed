//! Single-shot analysis command.

use std::path::Path;

use lexishield::{AnalysisMode, Config};

use crate::cli::helpers::{open_document, print_result, with_spinner};

/// Extract a PDF and run each requested analysis in order.
pub async fn cmd_analyze(config: &Config, file: &Path, modes: &[AnalysisMode]) -> anyhow::Result<()> {
    let modes = requested_modes(modes)?;
    let session = open_document(config, file).await?;

    for mode in modes {
        let message = format!("{}...", mode.display_name());
        with_spinner(message, session.run_analysis(mode, None)).await?;

        if let Some(text) = session.analysis_result() {
            print_result(mode, &text);
        }
    }

    Ok(())
}

/// Deduplicate the requested modes, defaulting to a summary.
fn requested_modes(modes: &[AnalysisMode]) -> anyhow::Result<Vec<AnalysisMode>> {
    if modes.iter().any(AnalysisMode::is_chatbot) {
        anyhow::bail!("The chatbot is interactive; use `lexishield chat <file>` instead");
    }
    if modes.is_empty() {
        return Ok(vec![AnalysisMode::Summary]);
    }

    let mut unique = Vec::with_capacity(modes.len());
    for mode in modes {
        if !unique.contains(mode) {
            unique.push(*mode);
        }
    }
    Ok(unique)
}
