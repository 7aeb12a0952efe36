//! Prompt templates for wikirag.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for RAG question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// System message for the chat model.
    pub system: String,
    /// Opening line of the user message.
    pub introduction: String,
    /// Wrapper for each retrieved chunk. Variables: `{{chunk}}`.
    pub section: String,
    /// Closing question. Variables: `{{question}}`.
    pub question: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: "You answer questions about {{topic}}.".to_string(),
            introduction: "Use the below articles on {{topic}} to answer the subsequent question. \
                           If the answer cannot be found in the articles, write \"I could not find an answer.\""
                .to_string(),
            section: "\n\nWikipedia article section:\n\"\"\"\n{{chunk}}\n\"\"\"".to_string(),
            question: "\n\nQuestion: {{question}}".to_string(),
        }
    }
}

impl Default for Prompts {
    fn default() -> Self {
        let mut variables = HashMap::new();
        variables.insert("topic".to_string(), "the 2024 Oscars".to_string());
        Self {
            rag: RagPrompts::default(),
            variables,
        }
    }
}

impl Prompts {
    /// Load prompts, overriding defaults with files from a custom directory.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts
                .variables
                .extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::load(None, None).unwrap();
        assert!(!prompts.rag.system.is_empty());
        assert_eq!(
            prompts.render_with_custom(&prompts.rag.system, &HashMap::new()),
            "You answer questions about the 2024 Oscars."
        );
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_custom_variables_override_topic() {
        let mut vars = HashMap::new();
        vars.insert("topic".to_string(), "the 2022 Winter Olympics".to_string());

        let prompts = Prompts::load(None, Some(&vars)).unwrap();
        let system = prompts.render_with_custom(&prompts.rag.system, &HashMap::new());
        assert_eq!(system, "You answer questions about the 2022 Winter Olympics.");
    }

    #[test]
    fn test_custom_dir_overrides_rag_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "system = \"Answer tersely.\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.rag.system, "Answer tersely.");
        assert!(prompts.rag.question.contains("{{question}}"));
    }
}
