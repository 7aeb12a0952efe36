//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, WikiragError};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Indexing embeds every chunk, so it needs an API key.
    Index,
    /// Searching embeds the query and reads the corpus.
    Search { corpus: &'a Path },
    /// Asking embeds, reads the corpus and calls the chat model.
    Ask { corpus: &'a Path },
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation<'_>) -> Result<()> {
    match operation {
        Operation::Index => {
            check_api_key()?;
        }
        Operation::Search { corpus } | Operation::Ask { corpus } => {
            check_corpus(corpus)?;
            check_api_key()?;
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(WikiragError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(WikiragError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that a corpus file exists.
fn check_corpus(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(WikiragError::Corpus(format!(
            "No corpus at {}. Run 'wikirag index' first.",
            path.display()
        )))
    }
}
