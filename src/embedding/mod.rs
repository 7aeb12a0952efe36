//! Embedding generation for chunks and queries.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::{Result, WikiragError};
use async_trait::async_trait;
use std::future::Future;
use tracing::debug;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Check that a batch response lists its items in request order.
///
/// `indices` are the index fields of the response items as returned.
/// Any gap, reordering or count mismatch is fatal.
pub fn verify_response_order<I>(indices: I, requested: usize) -> Result<()>
where
    I: IntoIterator<Item = usize>,
{
    let mut received = 0;
    for (expected, actual) in indices.into_iter().enumerate() {
        if expected != actual {
            return Err(WikiragError::EmbeddingOrder { expected, actual });
        }
        received += 1;
    }

    if received == 0 && requested > 0 {
        return Err(WikiragError::Embedding("Empty embedding response".to_string()));
    }
    if received != requested {
        return Err(WikiragError::Embedding(format!(
            "Requested {} embeddings, received {}",
            requested, received
        )));
    }
    Ok(())
}

/// Embed `texts` in consecutive batches of at most `batch_size`.
///
/// `embed_one` receives each batch in input order and returns the response
/// items as `(index, vector)`. Every response is checked with
/// [`verify_response_order`] before its vectors are appended.
pub async fn embed_in_batches<F, Fut>(
    texts: &[String],
    batch_size: usize,
    mut embed_one: F,
) -> Result<Vec<Vec<f32>>>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<(usize, Vec<f32>)>>>,
{
    if batch_size == 0 {
        return Err(WikiragError::Config(
            "embedding batch_size must be positive".to_string(),
        ));
    }

    let mut all_embeddings = Vec::with_capacity(texts.len());

    for (batch_number, batch) in texts.chunks(batch_size).enumerate() {
        debug!(
            "Embedding batch {} ({} texts, starting at {})",
            batch_number,
            batch.len(),
            batch_number * batch_size
        );

        let items = embed_one(batch.to_vec()).await?;
        verify_response_order(items.iter().map(|(index, _)| *index), batch.len())?;
        all_embeddings.extend(items.into_iter().map(|(_, embedding)| embedding));
    }

    debug!("Generated {} embeddings", all_embeddings.len());
    Ok(all_embeddings)
}

/// Embedder that hashes characters into a small fixed-size vector.
#[cfg(test)]
pub(crate) struct FakeEmbedder {
    pub dimensions: usize,
}

#[cfg(test)]
#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; self.dimensions];
        for (i, c) in text.chars().enumerate() {
            vector[i % self.dimensions] += (c as u32 % 97) as f32;
        }
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_verified() {
        assert!(verify_response_order(vec![0, 1, 2], 3).is_ok());
    }

    #[test]
    fn test_out_of_order_is_fatal() {
        let err = verify_response_order(vec![0, 2, 1], 3).unwrap_err();
        assert!(matches!(
            err,
            WikiragError::EmbeddingOrder {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_empty_response_is_fatal() {
        let err = verify_response_order(Vec::new(), 2).unwrap_err();
        assert!(matches!(err, WikiragError::Embedding(_)));
    }

    #[test]
    fn test_short_response_is_fatal() {
        assert!(verify_response_order(vec![0, 1], 3).is_err());
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chunk {}", i)).collect()
    }

    /// Encodes each text's number as a one-element vector.
    fn numbered(batch: &[String]) -> Vec<(usize, Vec<f32>)> {
        batch
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let n: f32 = text.trim_start_matches("chunk ").parse().unwrap();
                (i, vec![n])
            })
            .collect()
    }

    #[tokio::test]
    async fn test_batches_keep_input_order() {
        let mut batch_sizes = Vec::new();
        let embeddings = embed_in_batches(&texts(5), 2, |batch| {
            batch_sizes.push(batch.len());
            let items = numbered(&batch);
            async move { Ok::<_, WikiragError>(items) }
        })
        .await
        .unwrap();

        assert_eq!(batch_sizes, vec![2, 2, 1]);
        assert_eq!(
            embeddings,
            vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0], vec![4.0]]
        );
    }

    #[tokio::test]
    async fn test_reordered_later_batch_is_fatal() {
        let mut calls = 0;
        let err = embed_in_batches(&texts(4), 2, |batch| {
            calls += 1;
            let mut items = numbered(&batch);
            if calls == 2 {
                items.reverse();
            }
            async move { Ok::<_, WikiragError>(items) }
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            WikiragError::EmbeddingOrder {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_no_texts_makes_no_requests() {
        let mut calls = 0;
        let embeddings = embed_in_batches(&[], 2, |_batch| {
            calls += 1;
            async { Ok::<_, WikiragError>(Vec::new()) }
        })
        .await
        .unwrap();

        assert!(embeddings.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_fake_embedder_is_deterministic() {
        let embedder = FakeEmbedder { dimensions: 4 };
        let a = embedder.embed("Oppenheimer").await.unwrap();
        let b = embedder.embed("Oppenheimer").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }
}
