//! Recursive halving splitter.

use super::{ChunkingConfig, CHUNK_SEPARATOR, DELIMITERS};
use crate::error::Result;
use crate::section::Section;
use crate::tokenizer::Tokenizer;
use tracing::warn;

/// Split text in two on a delimiter, balancing tokens on each side.
///
/// Text without the delimiter comes back as `(text, "")`. With exactly one
/// occurrence the two sides are returned as-is. Otherwise prefixes of the
/// delimited pieces are grown left to right until their token count stops
/// getting closer to half of the total; the last improving prefix becomes
/// the left side.
pub fn halved_by_delimiter(
    text: &str,
    delimiter: &str,
    tokenizer: &dyn Tokenizer,
) -> (String, String) {
    let pieces: Vec<&str> = text.split(delimiter).collect();

    match pieces.len() {
        1 => (text.to_string(), String::new()),
        2 => (pieces[0].to_string(), pieces[1].to_string()),
        n => {
            let halfway = tokenizer.count(text) / 2;
            let mut best_diff = halfway;
            let mut split_at = n - 1;

            for i in 0..n {
                let left = pieces[..=i].join(delimiter);
                let diff = halfway.abs_diff(tokenizer.count(&left));
                if diff >= best_diff {
                    split_at = i;
                    break;
                }
                best_diff = diff;
            }

            (
                pieces[..split_at].join(delimiter),
                pieces[split_at..].join(delimiter),
            )
        }
    }
}

/// Split on the coarsest delimiter that leaves both halves non-empty.
fn halve(text: &str, tokenizer: &dyn Tokenizer) -> Option<(String, String)> {
    DELIMITERS.iter().find_map(|delimiter| {
        let (left, right) = halved_by_delimiter(text, delimiter, tokenizer);
        (!left.is_empty() && !right.is_empty()).then_some((left, right))
    })
}

/// Lazy sequence of chunks for one section.
///
/// Pending fragments sit on a stack with their remaining split depth, so
/// chunks come out left to right. The sequence is consumed once.
pub struct SectionChunks<'a> {
    prefix: String,
    tokenizer: &'a dyn Tokenizer,
    max_tokens: usize,
    pending: Vec<(String, usize)>,
    truncated: usize,
}

impl<'a> SectionChunks<'a> {
    pub fn new(section: &Section, tokenizer: &'a dyn Tokenizer, config: ChunkingConfig) -> Self {
        let mut prefix = section.titles().join(CHUNK_SEPARATOR);
        prefix.push_str(CHUNK_SEPARATOR);

        Self {
            prefix,
            tokenizer,
            max_tokens: config.max_tokens,
            pending: vec![(section.text().to_string(), config.max_recursion)],
            truncated: 0,
        }
    }

    /// Number of chunks emitted so far through the truncation fallback.
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    fn truncate(&mut self, chunk: &str) -> Result<String> {
        let (truncated, original) = self.tokenizer.truncate(chunk, self.max_tokens)?;
        if original > self.max_tokens {
            warn!(
                "Truncated string from {} tokens to {} tokens",
                original, self.max_tokens
            );
            self.truncated += 1;
        }
        Ok(truncated)
    }
}

impl Iterator for SectionChunks<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (text, depth) = self.pending.pop()?;
            let chunk = format!("{}{}", self.prefix, text);

            if self.tokenizer.count(&chunk) <= self.max_tokens {
                return Some(Ok(chunk));
            }
            if depth == 0 {
                return Some(self.truncate(&chunk));
            }

            match halve(&text, self.tokenizer) {
                Some((left, right)) => {
                    self.pending.push((right, depth - 1));
                    self.pending.push((left, depth - 1));
                }
                None => return Some(self.truncate(&chunk)),
            }
        }
    }
}
