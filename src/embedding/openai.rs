//! OpenAI embeddings implementation.

use super::{embed_in_batches, Embedder};
use crate::error::{Result, WikiragError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::instrument;

/// Inputs per embeddings request.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config("text-embedding-3-small", 1536, DEFAULT_BATCH_SIZE)
    }

    /// Create a new OpenAI embedder with custom model, dimensions and batch size.
    pub fn with_config(model: &str, dimensions: usize, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(WikiragError::Config(
                "embedding batch_size must be positive".to_string(),
            ));
        }
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            dimensions,
            batch_size,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| WikiragError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        embed_in_batches(texts, self.batch_size, |batch| async move {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(batch))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| WikiragError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self.client.embeddings().create(request).await.map_err(|e| {
                WikiragError::OpenAI(format!("Embedding API error: {}", e))
            })?;

            let items: Vec<(usize, Vec<f32>)> = response
                .data
                .into_iter()
                .map(|e| (e.index as usize, e.embedding))
                .collect();
            Ok::<_, WikiragError>(items)
        })
        .await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAIEmbedder::new().unwrap();
        assert_eq!(embedder.dimensions(), 1536);
        assert_eq!(embedder.model(), "text-embedding-3-small");

        let embedder = OpenAIEmbedder::with_config("text-embedding-3-large", 3072, 100).unwrap();
        assert_eq!(embedder.dimensions(), 3072);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(OpenAIEmbedder::with_config("text-embedding-3-small", 1536, 0).is_err());
    }
}
