//! Sections command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};

/// Run the sections command.
pub fn run_sections(
    input: &str,
    title: &str,
    show_chunks: bool,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let wikitext = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input))?;

    let orchestrator = Orchestrator::new(settings)?;
    let sections = orchestrator.extract_sections(title, &wikitext)?;

    if show_chunks {
        let chunked = orchestrator.chunk_sections(&sections)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&chunked.chunks)?);
            return Ok(());
        }

        Output::header(&format!("{} chunks", chunked.chunks.len()));
        for (i, chunk) in chunked.chunks.iter().enumerate() {
            println!("\n--- chunk {} ---\n{}", i + 1, chunk);
        }
        if chunked.truncated > 0 {
            Output::warning(&format!("{} chunk(s) were truncated", chunked.truncated));
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    if sections.is_empty() {
        Output::warning("No sections left after filtering.");
        return Ok(());
    }

    Output::header(&format!("{} sections", sections.len()));
    for section in &sections {
        Output::section(section.titles(), section.text().chars().count());
    }

    Ok(())
}
