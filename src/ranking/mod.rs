//! Brute-force relevance ranking of corpus entries against a query vector.

use crate::corpus::CorpusEntry;
use tracing::{debug, warn};

/// Default number of ranked results.
pub const DEFAULT_TOP_N: usize = 100;

/// Texts and their relatedness scores, most related first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranked {
    pub texts: Vec<String>,
    pub relatednesses: Vec<f64>,
}

impl Ranked {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Iterate over `(text, relatedness)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.texts
            .iter()
            .map(String::as_str)
            .zip(self.relatednesses.iter().copied())
    }

    /// Split into the two parallel sequences.
    pub fn into_parts(self) -> (Vec<String>, Vec<f64>) {
        (self.texts, self.relatednesses)
    }
}

/// Cosine distance: one minus the cosine of the angle between the vectors.
///
/// A zero-length vector has distance 1.0 from everything.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Relatedness: one minus cosine distance.
pub fn relatedness(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_distance(a, b)
}

/// Rank entries by [`relatedness`] to the query.
pub fn ranked_by_relatedness(query: &[f32], entries: &[CorpusEntry], top_n: usize) -> Ranked {
    ranked_by(query, entries, relatedness, top_n)
}

/// Rank entries with a custom relatedness function.
///
/// Entries whose embedding is missing, empty, or of a different length than
/// the query are skipped with a warning. Equal scores keep corpus order.
pub fn ranked_by<F>(query: &[f32], entries: &[CorpusEntry], relatedness_fn: F, top_n: usize) -> Ranked
where
    F: Fn(&[f32], &[f32]) -> f64,
{
    debug!("Ranking {} entries against a {}-d query", entries.len(), query.len());

    let mut scored: Vec<(&str, f64)> = Vec::with_capacity(entries.len());
    for (row, entry) in entries.iter().enumerate() {
        let embedding = match entry.embedding.as_deref() {
            Some(e) if !e.is_empty() && e.len() == query.len() => e,
            Some(e) => {
                warn!(
                    "Skipping row {} due to invalid embedding shape: length {}, expected {}",
                    row,
                    e.len(),
                    query.len()
                );
                continue;
            }
            None => {
                warn!("Skipping row {} due to missing embedding", row);
                continue;
            }
        };
        scored.push((entry.text.as_str(), relatedness_fn(query, embedding)));
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_n);

    let (texts, relatednesses) = scored
        .into_iter()
        .map(|(text, score)| (text.to_string(), score))
        .unzip();

    Ranked {
        texts,
        relatednesses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit vector at `cos` similarity to the x axis.
    fn at_similarity(cos: f32) -> Vec<f32> {
        vec![cos, (1.0 - cos * cos).sqrt()]
    }

    #[test]
    fn test_relatedness_convention() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((relatedness(&a, &[2.0, 0.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(relatedness(&a, &[0.0, 1.0, 0.0]).abs() < 1e-12);
        assert!((relatedness(&a, &[-1.0, 0.0, 0.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_relatedness() {
        assert_eq!(relatedness(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_ranks_descending() {
        let entries = vec![
            CorpusEntry::new("high", at_similarity(0.9)),
            CorpusEntry::new("low", at_similarity(0.1)),
            CorpusEntry::new("mid", at_similarity(0.5)),
        ];

        let ranked = ranked_by_relatedness(&[1.0, 0.0], &entries, DEFAULT_TOP_N);
        assert_eq!(ranked.texts, vec!["high", "mid", "low"]);

        let expected = [0.9, 0.5, 0.1];
        for (score, want) in ranked.relatednesses.iter().zip(expected) {
            assert!((score - want).abs() < 1e-6, "{} != {}", score, want);
        }
    }

    #[test]
    fn test_wrong_length_entry_skipped() {
        let query = vec![1.0, 0.0, 0.0, 0.0, 0.0];
        let entries = vec![
            CorpusEntry::new("a", vec![1.0, 0.0, 0.0, 0.0, 0.0]),
            CorpusEntry::new("b", vec![0.0, 1.0, 0.0, 0.0, 0.0]),
            CorpusEntry::new("short", vec![1.0, 0.0, 0.0]),
            CorpusEntry::new("c", vec![1.0, 1.0, 0.0, 0.0, 0.0]),
        ];

        let ranked = ranked_by_relatedness(&query, &entries, DEFAULT_TOP_N);
        assert_eq!(ranked.texts, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_missing_and_empty_embeddings_skipped() {
        let entries = vec![
            CorpusEntry::without_embedding("missing"),
            CorpusEntry::new("empty", Vec::new()),
            CorpusEntry::new("ok", vec![1.0, 0.0]),
        ];

        let ranked = ranked_by_relatedness(&[1.0, 0.0], &entries, DEFAULT_TOP_N);
        assert_eq!(ranked.texts, vec!["ok"]);
    }

    #[test]
    fn test_top_n_caps_results() {
        let entries: Vec<CorpusEntry> = [0.2, 0.8, 0.4, 0.95, 0.6]
            .iter()
            .enumerate()
            .map(|(i, &cos)| CorpusEntry::new(format!("e{}", i), at_similarity(cos)))
            .collect();

        let ranked = ranked_by_relatedness(&[1.0, 0.0], &entries, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked.texts, vec!["e3", "e1"]);
        assert_eq!(ranked.relatednesses.len(), 2);
    }

    #[test]
    fn test_empty_corpus() {
        let ranked = ranked_by_relatedness(&[1.0, 0.0], &[], DEFAULT_TOP_N);
        assert!(ranked.is_empty());
        let (texts, scores) = ranked.into_parts();
        assert!(texts.is_empty());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let entries = vec![
            CorpusEntry::new("first", vec![1.0, 0.0]),
            CorpusEntry::new("other", vec![0.0, 1.0]),
            CorpusEntry::new("second", vec![2.0, 0.0]),
            CorpusEntry::new("third", vec![3.0, 0.0]),
        ];

        let ranked = ranked_by(&[1.0, 0.0], &entries, |_, e| if e[0] > 0.0 { 1.0 } else { 0.0 }, 10);
        assert_eq!(ranked.texts, vec!["first", "second", "third", "other"]);
    }

    #[test]
    fn test_custom_relatedness_function() {
        let entries = vec![
            CorpusEntry::new("near", vec![1.0, 1.0]),
            CorpusEntry::new("far", vec![5.0, 5.0]),
        ];
        let negative_euclidean = |a: &[f32], b: &[f32]| {
            -a.iter()
                .zip(b)
                .map(|(x, y)| f64::from(x - y).powi(2))
                .sum::<f64>()
                .sqrt()
        };

        let ranked = ranked_by(&[0.0, 0.0], &entries, negative_euclidean, 10);
        assert_eq!(ranked.texts, vec!["near", "far"]);
        let iterated: Vec<&str> = ranked.iter().map(|(t, _)| t).collect();
        assert_eq!(iterated, vec!["near", "far"]);
    }
}
