//! Titled text sections extracted from Wikipedia articles.
//!
//! A section pairs its heading path (article title first) with the text
//! directly under its heading, not including nested subsections.

mod wikitext;

pub use wikitext::{sections_from_wikitext, DEFAULT_IGNORED_SECTIONS};

use crate::error::{Result, WikiragError};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Sections with less text than this are dropped by [`keep_section`].
pub const DEFAULT_MIN_SECTION_CHARS: usize = 16;

/// A section of an article: heading path plus body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    titles: Vec<String>,
    text: String,
}

impl Section {
    /// Create a section. The heading path must not be empty.
    pub fn new(titles: Vec<String>, text: impl Into<String>) -> Result<Self> {
        if titles.is_empty() {
            return Err(WikiragError::InvalidInput(
                "section must have at least one title".to_string(),
            ));
        }
        Ok(Self {
            titles,
            text: text.into(),
        })
    }

    /// Heading path, outermost first. Never empty.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Document title (first heading).
    pub fn title(&self) -> &str {
        &self.titles[0]
    }

    /// Body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Same heading path, different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            titles: self.titles.clone(),
            text: text.into(),
        }
    }
}

fn ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<ref.*?</ref>").expect("valid ref regex"))
}

/// Strip `<ref>...</ref>` citations and surrounding whitespace.
pub fn clean_section(section: Section) -> Section {
    let cleaned = ref_pattern().replace_all(&section.text, "");
    let text = cleaned.trim().to_string();
    Section {
        titles: section.titles,
        text,
    }
}

/// Whether a section has enough text to be worth embedding.
pub fn keep_section(section: &Section, min_chars: usize) -> bool {
    section.text.chars().count() >= min_chars
}
