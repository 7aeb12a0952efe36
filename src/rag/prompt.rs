//! Token-budgeted prompt construction.

use crate::config::Prompts;
use crate::tokenizer::Tokenizer;
use std::collections::HashMap;

/// A user message built from ranked chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMessage {
    /// Full message text.
    pub text: String,
    /// How many of the ranked chunks fit in the budget.
    pub sections_used: usize,
}

/// Build the user message for a question from ranked chunks.
///
/// Chunks are appended in rank order until the next one would push the
/// message, question included, over `token_budget`. Later chunks are not
/// tried once one fails to fit.
pub fn query_message<'a, I>(
    question: &str,
    ranked_chunks: I,
    tokenizer: &dyn Tokenizer,
    token_budget: usize,
    prompts: &Prompts,
) -> QueryMessage
where
    I: IntoIterator<Item = &'a str>,
{
    let no_vars = HashMap::new();

    // User text is substituted last so it is never rendered as a template.
    let mut text = prompts.render_with_custom(&prompts.rag.introduction, &no_vars);
    let section_template = prompts.render_with_custom(&prompts.rag.section, &no_vars);
    let question_text = prompts
        .render_with_custom(&prompts.rag.question, &no_vars)
        .replace("{{question}}", question);

    let mut sections_used = 0;
    for chunk in ranked_chunks {
        let next_section = section_template.replace("{{chunk}}", chunk);
        let candidate = format!("{}{}{}", text, next_section, question_text);
        if tokenizer.count(&candidate) > token_budget {
            break;
        }
        text.push_str(&next_section);
        sections_used += 1;
    }

    text.push_str(&question_text);
    QueryMessage {
        text,
        sections_used,
    }
}
