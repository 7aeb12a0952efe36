//! RAG (Retrieval-Augmented Generation) question answering over the corpus.
//!
//! Ranked chunks are packed into a token-budgeted message and sent to a chat model.

mod engine;
mod prompt;

pub use engine::{RagEngine, RagResponse, Source};
pub use prompt::{query_message, QueryMessage};
