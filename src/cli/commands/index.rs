//! Index command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;

/// Run the index command.
pub async fn run_index(
    input: &str,
    title: &str,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index) {
        Output::error(&format!("{}", e));
        Output::info("Run 'wikirag doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let output = output
        .map(|p| Settings::expand_path(&p))
        .unwrap_or_else(|| settings.corpus_path());
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Indexing {}...", title));
    let result = orchestrator
        .index_wikitext(Path::new(input), title, &output)
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            Output::success(&format!(
                "Indexed {} chunks from {} sections",
                result.chunks, result.sections
            ));
            if result.truncated > 0 {
                Output::warning(&format!("{} chunk(s) were truncated", result.truncated));
            }
            Output::kv("Corpus", &output.display().to_string());
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
