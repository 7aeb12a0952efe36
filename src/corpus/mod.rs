//! Embedded chunk corpus and its CSV storage.
//!
//! A corpus is a table of chunk texts with their embedding vectors. On disk
//! it is a CSV file with `text` and `embedding` columns, the embedding
//! serialized as a numeric list such as `[0.1, -0.2]`.

mod csv_store;

pub use csv_store::{load_csv, read_csv, save_csv, write_csv};

use tracing::warn;

/// A chunk of text and its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    /// Chunk text, heading path included.
    pub text: String,
    /// Embedding vector; `None` when missing or malformed in storage.
    pub embedding: Option<Vec<f32>>,
}

impl CorpusEntry {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding: Some(embedding),
        }
    }

    /// Entry with no usable embedding.
    pub fn without_embedding(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embedding: None,
        }
    }
}

/// Parse a serialized embedding field.
///
/// Only a flat list of numbers is accepted; empty fields, nested lists and
/// anything else that is not a numeric list yield `None`.
pub fn parse_embedding(field: &str) -> Option<Vec<f32>> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    serde_json::from_str::<Vec<f32>>(field).ok()
}

/// Serialize an embedding for storage.
pub fn format_embedding(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(", "))
}

/// Common vector length of a corpus, if every embedded entry agrees.
pub fn embedding_dimensions(entries: &[CorpusEntry]) -> Option<usize> {
    let mut lengths = entries.iter().filter_map(|e| e.embedding.as_ref().map(Vec::len));
    let first = lengths.next()?;
    if lengths.all(|len| len == first) {
        Some(first)
    } else {
        warn!("Corpus embeddings have inconsistent lengths");
        None
    }
}
