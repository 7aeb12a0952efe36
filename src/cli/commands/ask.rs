//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    corpus: Option<String>,
    show_message: bool,
    settings: Settings,
) -> Result<()> {
    let corpus_path = corpus
        .map(|p| Settings::expand_path(&p))
        .unwrap_or_else(|| settings.corpus_path());

    if let Err(e) = preflight::check(Operation::Ask {
        corpus: &corpus_path,
    }) {
        Output::error(&format!("{}", e));
        Output::info("Run 'wikirag doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let entries = orchestrator.load_corpus(Some(&corpus_path))?;
    let engine = orchestrator.rag_engine(entries, model.as_deref())?;

    let spinner = Output::spinner("Searching corpus...");

    match engine.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            if show_message {
                Output::header("Message");
                println!("{}", response.message);
                Output::header("Answer");
            }

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for (i, source) in response.sources.iter().enumerate() {
                    Output::search_result(i + 1, source.relatedness, &source.text);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
