//! Configuration settings for wikirag.

use crate::chunking::ChunkingConfig;
use crate::ranking::DEFAULT_TOP_N;
use crate::section::{DEFAULT_IGNORED_SECTIONS, DEFAULT_MIN_SECTION_CHARS};
use crate::tokenizer::DEFAULT_TOKENIZER_MODEL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub tokenizer: TokenizerSettings,
    pub sections: SectionSettings,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingSettings,
    pub corpus: CorpusSettings,
    pub rag: RagSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.wikirag".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Tokenizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerSettings {
    /// Model whose tokenizer is used for chunk budgets.
    pub model: String,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_TOKENIZER_MODEL.to_string(),
        }
    }
}

/// Section extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSettings {
    /// Headings whose sections are dropped, with their subsections.
    pub ignored: Vec<String>,
    /// Sections with fewer characters are dropped.
    pub min_chars: usize,
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self {
            ignored: DEFAULT_IGNORED_SECTIONS.iter().map(|s| s.to_string()).collect(),
            min_chars: DEFAULT_MIN_SECTION_CHARS,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Inputs per embeddings request.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            batch_size: 1000,
        }
    }
}

/// Corpus storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// Path to the corpus CSV file.
    pub csv_path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            csv_path: "~/.wikirag/corpus.csv".to_string(),
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Chat model for answers. Also selects the tokenizer for the prompt budget.
    pub model: String,
    /// Maximum number of ranked chunks considered.
    pub top_n: usize,
    /// Token budget for the user message.
    pub token_budget: usize,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            top_n: DEFAULT_TOP_N,
            token_budget: 4096 - 500,
            temperature: 0.0,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::WikiragError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wikirag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded corpus CSV path.
    pub fn corpus_path(&self) -> PathBuf {
        Self::expand_path(&self.corpus.csv_path)
    }
}
