//! Doctor command - verify configuration, tokenizers and the corpus.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::{embedding_dimensions, load_csv};
use crate::tokenizer::create_tokenizer;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
///
/// `config_path` is the file given with `--config`, if any.
pub fn run_doctor(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    Output::header("wikirag doctor");
    println!();
    println!("Checking configuration and corpus...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key();
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Tokenizers").bold());
    let tokenizer_checks = [
        check_tokenizer("Chunking tokenizer", &settings.tokenizer.model),
        check_tokenizer("Chat tokenizer", &settings.rag.model),
    ];
    for check in tokenizer_checks {
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Corpus").bold());
    let corpus_check = check_corpus(&settings.corpus_path(), settings.embedding.dimensions as usize);
    corpus_check.print();
    checks.push(corpus_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = match config_path {
        Some(path) => check_config_file(path),
        None => check_config_file(&Settings::default_config_path()),
    };
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using wikirag.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! wikirag is ready to use.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check that a tokenizer exists for a model name.
fn check_tokenizer(name: &str, model: &str) -> CheckResult {
    match create_tokenizer(model) {
        Ok(_) => CheckResult::ok(name, model),
        Err(e) => CheckResult::error(
            name,
            &e.to_string(),
            "Use a model name known to tiktoken, e.g. gpt-3.5-turbo or gpt-4o",
        ),
    }
}

/// Check the corpus file and its vector length.
fn check_corpus(path: &Path, expected_dimensions: usize) -> CheckResult {
    if !path.exists() {
        return CheckResult::warning(
            "Corpus",
            &format!("{} (not created yet)", path.display()),
            "Create with: wikirag index <file> --title <title>",
        );
    }

    let entries = match load_csv(path) {
        Ok(entries) => entries,
        Err(e) => {
            return CheckResult::error(
                "Corpus",
                &format!("{}: {}", path.display(), e),
                "Rebuild with: wikirag index <file> --title <title>",
            )
        }
    };

    let missing = entries.iter().filter(|e| e.embedding.is_none()).count();
    match embedding_dimensions(&entries) {
        Some(dims) if dims != expected_dimensions => CheckResult::warning(
            "Corpus",
            &format!("{} entries with {}-dim vectors", entries.len(), dims),
            &format!("embedding.dimensions is {}; rebuild the corpus", expected_dimensions),
        ),
        _ if missing > 0 => CheckResult::warning(
            "Corpus",
            &format!("{} entries, {} without a usable vector", entries.len(), missing),
            "Those entries are skipped when ranking",
        ),
        _ => CheckResult::ok(
            "Corpus",
            &format!("{} ({} entries)", path.display(), entries.len()),
        ),
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: wikirag config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{save_csv, CorpusEntry};

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_config_file_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(check_config_file(&path).status, CheckStatus::Warning);

        Settings::default().save_to(&path).unwrap();
        let check = check_config_file(&path);
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(check.message.contains("custom.toml"));
    }

    #[test]
    fn test_check_tokenizer() {
        assert_eq!(check_tokenizer("t", "gpt-3.5-turbo").status, CheckStatus::Ok);
        assert_eq!(check_tokenizer("t", "not-a-model").status, CheckStatus::Error);
    }

    #[test]
    fn test_check_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        assert_eq!(check_corpus(&path, 3).status, CheckStatus::Warning);

        save_csv(&path, &[CorpusEntry::new("a", vec![0.1, 0.2, 0.3])]).unwrap();
        assert_eq!(check_corpus(&path, 3).status, CheckStatus::Ok);
        assert_eq!(check_corpus(&path, 4).status, CheckStatus::Warning);

        save_csv(
            &path,
            &[
                CorpusEntry::new("a", vec![0.1, 0.2, 0.3]),
                CorpusEntry::without_embedding("b"),
            ],
        )
        .unwrap();
        assert_eq!(check_corpus(&path, 3).status, CheckStatus::Warning);
    }
}
