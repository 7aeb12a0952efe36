//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    limit: usize,
    corpus: Option<String>,
    settings: Settings,
) -> Result<()> {
    let corpus_path = corpus
        .map(|p| Settings::expand_path(&p))
        .unwrap_or_else(|| settings.corpus_path());

    if let Err(e) = preflight::check(Operation::Search {
        corpus: &corpus_path,
    }) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let entries = orchestrator.load_corpus(Some(&corpus_path))?;
    let engine = orchestrator.rag_engine(entries, None)?.with_top_n(limit);

    let spinner = Output::spinner("Searching...");
    let results = engine.search(query).await;
    spinner.finish_and_clear();

    match results {
        Ok(ranked) => {
            if ranked.is_empty() {
                Output::warning("No results found. Is the corpus embedded?");
            } else {
                Output::success(&format!("Found {} results", ranked.len()));
                for (i, (text, relatedness)) in ranked.iter().enumerate() {
                    Output::search_result(i + 1, relatedness, text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
