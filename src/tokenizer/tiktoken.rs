//! tiktoken-backed tokenizer for OpenAI models.

use super::Tokenizer;
use crate::error::{Result, WikiragError};
use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Tokenizer using the BPE encoding of an OpenAI model.
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
    model: String,
}

impl TiktokenTokenizer {
    /// Look up the encoding for a model name.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            WikiragError::Config(format!("No tokenizer for model '{}': {}", model, e))
        })?;
        debug!("Loaded tokenizer for {}", model);

        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }

    /// The model this tokenizer was created for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe
            .encode_ordinary(text)
            .into_iter()
            .map(|t| t as u32)
            .collect()
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        self.bpe
            .decode(tokens.iter().map(|&t| t as _).collect())
            .map_err(|e| WikiragError::Tokenizer(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let tokenizer = TiktokenTokenizer::for_model("gpt-3.5-turbo").unwrap();
        let tokens = tokenizer.encode("The 96th Academy Awards ceremony");
        assert!(!tokens.is_empty());
        assert_eq!(
            tokenizer.decode(&tokens).unwrap(),
            "The 96th Academy Awards ceremony"
        );
        assert_eq!(tokenizer.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_truncate_within_budget() {
        let tokenizer = TiktokenTokenizer::for_model("gpt-4o").unwrap();
        let text = "Oppenheimer won Best Picture. ".repeat(20);
        let (truncated, original) = tokenizer.truncate(&text, 10).unwrap();
        assert!(original > 10);
        assert!(tokenizer.count(&truncated) <= 10);
        assert!(text.starts_with(&truncated));
    }

    #[test]
    fn test_truncate_backs_off_inside_multibyte_characters() {
        let tokenizer = TiktokenTokenizer::for_model("gpt-3.5-turbo").unwrap();
        let text = "Best Picture 🎬🏆 ".repeat(4);
        let tokens = tokenizer.encode(&text);

        let mut backed_off = 0;
        for max_tokens in 1..tokens.len() {
            let (truncated, original) = tokenizer.truncate(&text, max_tokens).unwrap();
            assert_eq!(original, tokens.len());
            assert!(text.starts_with(&truncated));

            if tokenizer.decode(&tokens[..max_tokens]).is_err() {
                backed_off += 1;
                let kept = (0..max_tokens)
                    .rev()
                    .find(|&end| tokenizer.decode(&tokens[..end]).is_ok())
                    .unwrap();
                assert_eq!(truncated, tokenizer.decode(&tokens[..kept]).unwrap());
            } else {
                assert_eq!(truncated, tokenizer.decode(&tokens[..max_tokens]).unwrap());
            }
        }
        assert!(backed_off > 0, "emoji should span several tokens");
    }
}
