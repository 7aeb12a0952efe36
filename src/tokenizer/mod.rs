//! Token counting for budget checks and truncation.
//!
//! Tokenizers are keyed by model name; unknown models are a configuration error.

mod tiktoken;

pub use tiktoken::TiktokenTokenizer;

use crate::error::{Result, WikiragError};

/// Model used for token counting when none is configured.
pub const DEFAULT_TOKENIZER_MODEL: &str = "gpt-3.5-turbo";

/// Trait for model-specific tokenizers.
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode token ids back into text.
    fn decode(&self, tokens: &[u32]) -> Result<String>;

    /// Number of tokens in the text.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Truncate text to at most `max_tokens` tokens.
    ///
    /// Returns the truncated text and the token count of the original.
    /// A cut that lands inside a multi-byte character drops the partial
    /// tokens instead of failing.
    fn truncate(&self, text: &str, max_tokens: usize) -> Result<(String, usize)> {
        let tokens = self.encode(text);
        let original = tokens.len();
        if original <= max_tokens {
            return Ok((text.to_string(), original));
        }

        let mut end = max_tokens;
        loop {
            match self.decode(&tokens[..end]) {
                Ok(truncated) => return Ok((truncated, original)),
                Err(e) if end == 0 => return Err(e),
                Err(_) => end -= 1,
            }
        }
    }
}

/// Create a tokenizer for a named model.
pub fn create_tokenizer(model: &str) -> Result<Box<dyn Tokenizer>> {
    let tokenizer = TiktokenTokenizer::for_model(model)?;
    Ok(Box::new(tokenizer))
}

/// Character-level tokenizer: one token per `char`.
///
/// Deterministic and model-free, used as a test double.
#[cfg(test)]
pub(crate) struct CharTokenizer;

#[cfg(test)]
impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.chars().map(|c| c as u32).collect()
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        tokens
            .iter()
            .map(|&t| {
                char::from_u32(t)
                    .ok_or_else(|| WikiragError::Tokenizer(format!("invalid token {}", t)))
            })
            .collect()
    }
}
