//! Error types for wikirag.

use thiserror::Error;

/// Library-level error type for wikirag operations.
#[derive(Error, Debug)]
pub enum WikiragError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Embedding response out of order: expected index {expected}, got {actual}")]
    EmbeddingOrder { expected: usize, actual: usize },

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for wikirag operations.
pub type Result<T> = std::result::Result<T, WikiragError>;
