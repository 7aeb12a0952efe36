//! CSV persistence for corpus entries.

use super::{format_embedding, parse_embedding, CorpusEntry};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    text: String,
    #[serde(default)]
    embedding: String,
}

/// Read corpus entries from CSV.
///
/// Rows whose embedding cannot be parsed are kept without an embedding so
/// the ranker can report and skip them.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<CorpusEntry>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for (row_index, row) in csv_reader.deserialize::<Row>().enumerate() {
        let row = row?;
        let embedding = parse_embedding(&row.embedding);
        if embedding.is_none() {
            warn!(
                "Row {} has an unreadable embedding: {:?}",
                row_index,
                preview(&row.embedding, 80)
            );
        }
        entries.push(CorpusEntry {
            text: row.text,
            embedding,
        });
    }

    debug!("Read {} corpus entries", entries.len());
    Ok(entries)
}

/// Write corpus entries as CSV with `text` and `embedding` columns.
pub fn write_csv<W: Write>(writer: W, entries: &[CorpusEntry]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for entry in entries {
        csv_writer.serialize(Row {
            text: entry.text.clone(),
            embedding: entry
                .embedding
                .as_deref()
                .map(format_embedding)
                .unwrap_or_default(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Load a corpus from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<CorpusEntry>> {
    let file = std::fs::File::open(path)?;
    let entries = read_csv(std::io::BufReader::new(file))?;
    info!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Save a corpus to a CSV file, creating parent directories.
pub fn save_csv(path: &Path, entries: &[CorpusEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), entries)?;
    info!("Saved {} entries to {}", entries.len(), path.display());
    Ok(())
}

fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
