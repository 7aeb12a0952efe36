//! RAG answer generation.

use super::prompt::{query_message, QueryMessage};
use crate::config::Prompts;
use crate::corpus::CorpusEntry;
use crate::embedding::Embedder;
use crate::error::{Result, WikiragError};
use crate::openai::create_client;
use crate::ranking::{ranked_by_relatedness, Ranked};
use crate::tokenizer::Tokenizer;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// RAG engine for question answering over an embedded corpus.
pub struct RagEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    embedder: Arc<dyn Embedder>,
    tokenizer: Arc<dyn Tokenizer>,
    corpus: Arc<Vec<CorpusEntry>>,
    prompts: Prompts,
    top_n: usize,
    token_budget: usize,
}

impl RagEngine {
    /// Create a new RAG engine.
    ///
    /// `tokenizer` should match `model`, since it enforces the prompt budget.
    pub fn new(
        corpus: Arc<Vec<CorpusEntry>>,
        embedder: Arc<dyn Embedder>,
        tokenizer: Arc<dyn Tokenizer>,
        model: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            temperature: 0.0,
            embedder,
            tokenizer,
            corpus,
            prompts: Prompts::default(),
            top_n: crate::ranking::DEFAULT_TOP_N,
            token_budget: 4096 - 500,
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the number of ranked chunks considered.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the token budget of the user message.
    pub fn with_token_budget(mut self, token_budget: usize) -> Self {
        self.token_budget = token_budget;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Rank the corpus against a query.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Ranked> {
        let query_embedding = self.embedder.embed(query).await?;
        debug!("Query embedding has {} dimensions", query_embedding.len());
        Ok(ranked_by_relatedness(&query_embedding, &self.corpus, self.top_n))
    }

    /// Build the user message for a question without calling the chat model.
    pub async fn prepare(&self, question: &str) -> Result<(QueryMessage, Ranked)> {
        let ranked = self.search(question).await?;
        let message = query_message(
            question,
            ranked.texts.iter().map(String::as_str),
            self.tokenizer.as_ref(),
            self.token_budget,
            &self.prompts,
        );
        debug!(
            "Prompt uses {} of {} ranked chunks",
            message.sections_used,
            ranked.len()
        );
        Ok((message, ranked))
    }

    /// Ask a question and get an answer grounded in the corpus.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question: {}", question);

        let (message, ranked) = self.prepare(question).await?;
        let system_prompt = self
            .prompts
            .render_with_custom(&self.prompts.rag.system, &HashMap::new());

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| WikiragError::Rag(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(message.text.clone())
                .build()
                .map_err(|e| WikiragError::Rag(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| WikiragError::Rag(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            WikiragError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| WikiragError::Rag("Empty response from LLM".to_string()))?
            .clone();

        let sources = ranked
            .iter()
            .take(message.sections_used)
            .map(|(text, score)| Source {
                text: text.to_string(),
                relatedness: score,
            })
            .collect();

        Ok(RagResponse {
            answer,
            message: message.text,
            sources,
        })
    }
}

/// A chunk that was included in the prompt.
#[derive(Debug, Clone)]
pub struct Source {
    pub text: String,
    pub relatedness: f64,
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// The user message sent to the model.
    pub message: String,
    /// Chunks included in the message, most related first.
    pub sources: Vec<Source>,
}
