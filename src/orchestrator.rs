//! Pipeline orchestrator for wikirag.
//!
//! Coordinates the process from raw wikitext to an embedded corpus on disk,
//! and wires the corpus into a RAG engine for answering.

use crate::chunking::{ChunkedSections, SectionChunker};
use crate::config::{Prompts, Settings};
use crate::corpus::{load_csv, save_csv, CorpusEntry};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, WikiragError};
use crate::rag::RagEngine;
use crate::section::{clean_section, keep_section, sections_from_wikitext, Section};
use crate::tokenizer::{create_tokenizer, Tokenizer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the wikirag pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    tokenizer: Arc<dyn Tokenizer>,
    embedder: Arc<dyn Embedder>,
}

impl Orchestrator {
    /// Create a new orchestrator from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let tokenizer: Arc<dyn Tokenizer> = Arc::from(create_tokenizer(&settings.tokenizer.model)?);

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
            settings.embedding.batch_size,
        )?);

        Ok(Self {
            settings,
            prompts,
            tokenizer,
            embedder,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        tokenizer: Arc<dyn Tokenizer>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            settings,
            prompts,
            tokenizer,
            embedder,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Extract cleaned, non-trivial sections from an article's wikitext.
    pub fn extract_sections(&self, title: &str, wikitext: &str) -> Result<Vec<Section>> {
        let sections = sections_from_wikitext(title, wikitext, &self.settings.sections.ignored)?;
        let found = sections.len();

        let kept: Vec<Section> = sections
            .into_iter()
            .map(clean_section)
            .filter(|s| keep_section(s, self.settings.sections.min_chars))
            .collect();

        info!(
            "Found {} sections in '{}', kept {} after filtering",
            found,
            title,
            kept.len()
        );
        Ok(kept)
    }

    /// Split sections into token-bounded chunks.
    pub fn chunk_sections(&self, sections: &[Section]) -> Result<ChunkedSections> {
        let chunker = SectionChunker::new(self.tokenizer.clone(), self.settings.chunking);
        let chunked = chunker.chunk_all(sections)?;
        info!(
            "{} sections split into {} chunks",
            sections.len(),
            chunked.chunks.len()
        );
        Ok(chunked)
    }

    /// Chunk and embed sections into corpus entries.
    #[instrument(skip(self, sections), fields(sections = sections.len()))]
    pub async fn build_corpus(&self, sections: &[Section]) -> Result<(Vec<CorpusEntry>, IndexResult)> {
        let chunked = self.chunk_sections(sections)?;

        let embeddings = self.embedder.embed_batch(&chunked.chunks).await?;
        if embeddings.len() != chunked.chunks.len() {
            return Err(WikiragError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunked.chunks.len(),
                embeddings.len()
            )));
        }

        let result = IndexResult {
            sections: sections.len(),
            chunks: chunked.chunks.len(),
            truncated: chunked.truncated,
        };

        let entries = chunked
            .chunks
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| CorpusEntry::new(text, embedding))
            .collect();

        Ok((entries, result))
    }

    /// Index a wikitext file: extract, chunk, embed, and save the corpus CSV.
    #[instrument(skip(self))]
    pub async fn index_wikitext(&self, path: &Path, title: &str, output: &Path) -> Result<IndexResult> {
        let wikitext = std::fs::read_to_string(path)?;
        let sections = self.extract_sections(title, &wikitext)?;
        if sections.is_empty() {
            return Err(WikiragError::InvalidInput(format!(
                "No usable sections in {}",
                path.display()
            )));
        }

        let (entries, result) = self.build_corpus(&sections).await?;
        save_csv(output, &entries)?;
        Ok(result)
    }

    /// Path of the configured corpus CSV.
    pub fn corpus_path(&self) -> PathBuf {
        self.settings.corpus_path()
    }

    /// Load the corpus from a path, or the configured one.
    pub fn load_corpus(&self, path: Option<&Path>) -> Result<Vec<CorpusEntry>> {
        let path = path.map_or_else(|| self.corpus_path(), Path::to_path_buf);
        if !path.exists() {
            return Err(WikiragError::Corpus(format!(
                "No corpus at {}. Run 'wikirag index' first.",
                path.display()
            )));
        }
        load_csv(&path)
    }

    /// Build a RAG engine over a corpus.
    ///
    /// The prompt budget is counted with the chat model's tokenizer.
    pub fn rag_engine(&self, corpus: Vec<CorpusEntry>, model: Option<&str>) -> Result<RagEngine> {
        let model = model.unwrap_or(self.settings.rag.model.as_str());
        let tokenizer: Arc<dyn Tokenizer> = Arc::from(create_tokenizer(model)?);

        self.rag_engine_with_tokenizer(corpus, model, tokenizer)
    }

    fn rag_engine_with_tokenizer(
        &self,
        corpus: Vec<CorpusEntry>,
        model: &str,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<RagEngine> {
        let engine = RagEngine::new(Arc::new(corpus), self.embedder.clone(), tokenizer, model)?
            .with_prompts(self.prompts.clone())
            .with_top_n(self.settings.rag.top_n)
            .with_token_budget(self.settings.rag.token_budget)
            .with_temperature(self.settings.rag.temperature);
        Ok(engine)
    }
}

/// Result of indexing sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexResult {
    /// Number of sections chunked.
    pub sections: usize,
    /// Number of chunks embedded.
    pub chunks: usize,
    /// Chunks that had to be truncated.
    pub truncated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::FakeEmbedder;
    use crate::tokenizer::CharTokenizer;

    const ARTICLE: &str = "The 96th Academy Awards honored films released in 2023.

== Ceremony ==
The ceremony was held on March 10, 2024.<ref>Variety</ref>

Jimmy Kimmel hosted for the fourth time.

== Winners ==
Oppenheimer won seven awards. Poor Things won four awards. The Zone of Interest won two.

== Notes ==
Short.

== See also ==
List of Academy Awards ceremonies and related material.
";

    fn orchestrator(max_tokens: usize) -> Orchestrator {
        let mut settings = Settings::default();
        settings.chunking.max_tokens = max_tokens;
        Orchestrator::with_components(
            settings,
            Prompts::default(),
            Arc::new(CharTokenizer),
            Arc::new(FakeEmbedder { dimensions: 6 }),
        )
    }

    #[test]
    fn test_extract_sections_cleans_and_filters() {
        let sections = orchestrator(1000)
            .extract_sections("96th Academy Awards", ARTICLE)
            .unwrap();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].titles()[1], "== Ceremony ==");
        assert_eq!(
            sections[1].text(),
            "The ceremony was held on March 10, 2024.\n\nJimmy Kimmel hosted for the fourth time."
        );
        assert!(sections.iter().all(|s| !s.text().contains("List of Academy Awards")));
    }

    #[tokio::test]
    async fn test_index_wikitext_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("oscars.wiki");
        let output = dir.path().join("out").join("corpus.csv");
        std::fs::write(&input, ARTICLE).unwrap();

        let orchestrator = orchestrator(80);
        let result = orchestrator
            .index_wikitext(&input, "96th Academy Awards", &output)
            .await
            .unwrap();

        assert_eq!(result.sections, 3);
        assert!(result.chunks > 3);

        let corpus = orchestrator.load_corpus(Some(&output)).unwrap();
        assert_eq!(corpus.len(), result.chunks);
        for entry in &corpus {
            assert!(entry.text.starts_with("96th Academy Awards\n\n"));
            assert_eq!(entry.embedding.as_ref().map(Vec::len), Some(6));
            if result.truncated == 0 {
                assert!(CharTokenizer.count(&entry.text) <= 80);
            }
        }
    }

    #[tokio::test]
    async fn test_search_over_built_corpus() {
        let orchestrator = orchestrator(1000);
        let sections = orchestrator
            .extract_sections("96th Academy Awards", ARTICLE)
            .unwrap();
        let (corpus, _) = orchestrator.build_corpus(&sections).await.unwrap();
        let target = corpus[2].text.clone();

        let engine = orchestrator
            .rag_engine_with_tokenizer(corpus, "gpt-4o", Arc::new(CharTokenizer))
            .unwrap();
        let ranked = engine.search(&target).await.unwrap();
        assert_eq!(ranked.texts[0], target);
    }

    #[test]
    fn test_missing_corpus_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = orchestrator(1000)
            .load_corpus(Some(&dir.path().join("none.csv")))
            .unwrap_err();
        assert!(matches!(err, WikiragError::Corpus(_)));
    }
}
