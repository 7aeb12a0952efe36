//! wikirag - Question answering over Wikipedia articles
//!
//! A local-first CLI tool and library for retrieval-augmented answers from
//! Wikipedia text.
//!
//! # Overview
//!
//! wikirag allows you to:
//! - Split wikitext into sections that keep their heading path
//! - Chunk sections recursively so every chunk fits a token budget
//! - Embed chunks and store them as a CSV corpus
//! - Rank the corpus by relatedness to a query and answer questions from it
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `section` - Wikitext section extraction and cleanup
//! - `tokenizer` - Model-keyed token counting
//! - `chunking` - Token-bounded recursive chunking
//! - `embedding` - Embedding generation
//! - `corpus` - CSV corpus storage
//! - `ranking` - Relatedness ranking
//! - `rag` - Prompt construction and answering
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wikirag::config::Settings;
//! use wikirag::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let corpus = settings.corpus_path();
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator
//!         .index_wikitext(Path::new("oscars.wiki"), "2024 Academy Awards", &corpus)
//!         .await?;
//!     println!("Indexed {} chunks", result.chunks);
//!
//!     let engine = orchestrator.rag_engine(orchestrator.load_corpus(None)?, None)?;
//!     println!("{}", engine.ask("Which film won Best Picture?").await?.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod ranking;
pub mod section;
pub mod tokenizer;

pub use error::{Result, WikiragError};
