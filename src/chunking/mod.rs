//! Token-bounded chunking of article sections.
//!
//! Each section is split recursively in halves on natural text boundaries
//! until every piece, prefixed with its heading path, fits the token budget.

mod splitter;

pub use splitter::{halved_by_delimiter, SectionChunks};

use crate::error::Result;
use crate::section::Section;
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Separator between heading titles and the section text in a chunk.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Split delimiters, coarsest first.
pub const DELIMITERS: [&str; 3] = ["\n\n", "\n", ". "];

/// Configuration for chunking, read from the `[chunking]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum tokens per chunk, heading prefix included.
    pub max_tokens: usize,
    /// Maximum halving depth before falling back to truncation.
    pub max_recursion: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            max_recursion: 5,
        }
    }
}

/// Chunks produced from a batch of sections.
#[derive(Debug, Clone, Default)]
pub struct ChunkedSections {
    /// Chunks in section order.
    pub chunks: Vec<String>,
    /// How many chunks hit the truncation fallback.
    pub truncated: usize,
}

/// Splits sections into chunks with a fixed tokenizer and budget.
pub struct SectionChunker {
    tokenizer: Arc<dyn Tokenizer>,
    config: ChunkingConfig,
}

impl SectionChunker {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, config: ChunkingConfig) -> Self {
        Self { tokenizer, config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Lazily chunk a single section.
    pub fn chunks<'a>(&'a self, section: &'a Section) -> SectionChunks<'a> {
        SectionChunks::new(section, self.tokenizer.as_ref(), self.config)
    }

    /// Chunk every section, in order.
    pub fn chunk_all(&self, sections: &[Section]) -> Result<ChunkedSections> {
        let mut result = ChunkedSections::default();

        for section in sections {
            let mut chunks = self.chunks(section);
            for chunk in chunks.by_ref() {
                result.chunks.push(chunk?);
            }
            result.truncated += chunks.truncated();
        }

        debug!(
            "Split {} sections into {} chunks",
            sections.len(),
            result.chunks.len()
        );
        if result.truncated > 0 {
            info!("{} chunks were truncated to fit the token budget", result.truncated);
        }

        Ok(result)
    }
}

/// Split one section into chunks.
pub fn split_section(
    section: &Section,
    tokenizer: &dyn Tokenizer,
    config: ChunkingConfig,
) -> Result<Vec<String>> {
    SectionChunks::new(section, tokenizer, config).collect()
}
