//! Section extraction from raw MediaWiki markup.

use super::Section;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Headings whose sections (and subsections) carry no article content.
pub const DEFAULT_IGNORED_SECTIONS: &[&str] = &[
    "See also",
    "References",
    "External links",
    "Further reading",
    "Footnotes",
    "Bibliography",
    "Sources",
    "Citations",
    "Literature",
    "Notes and references",
    "Photo gallery",
    "Works cited",
    "Photos",
    "Gallery",
    "Notes",
    "References and sources",
    "References and notes",
];

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^(={2,6})[ \t]*(.+?)[ \t]*(={2,6})[ \t]*$").expect("valid heading regex")
    })
}

struct Heading {
    level: usize,
    markup: String,
    start: usize,
    end: usize,
}

fn find_headings(wikitext: &str) -> Vec<Heading> {
    heading_pattern()
        .captures_iter(wikitext)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let level = caps[1].len().min(caps[3].len());
            Some(Heading {
                level,
                markup: whole.as_str().trim_end().to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Heading text without the surrounding `=` markers.
fn heading_name(markup: &str) -> &str {
    markup.trim_matches(|c| c == '=' || c == ' ')
}

/// Flatten an article's wikitext into sections.
///
/// The first section is the lead text under the article title. Every
/// heading then yields a section holding only the text up to the next
/// heading of any level; its heading path is the article title followed by
/// the enclosing headings. Ignored headings drop their whole subtree.
pub fn sections_from_wikitext(title: &str, wikitext: &str, ignore: &[String]) -> Result<Vec<Section>> {
    let wikitext = wikitext.replace("\r\n", "\n");
    let headings = find_headings(&wikitext);

    let summary_end = headings.first().map_or(wikitext.len(), |h| h.start);
    let mut sections = vec![Section::new(
        vec![title.to_string()],
        &wikitext[..summary_end],
    )?];

    let mut path: Vec<&Heading> = Vec::new();
    let mut ignored_level: Option<usize> = None;

    for (i, heading) in headings.iter().enumerate() {
        if let Some(level) = ignored_level {
            if heading.level > level {
                continue;
            }
            ignored_level = None;
        }

        while path.last().is_some_and(|h| h.level >= heading.level) {
            path.pop();
        }

        let name = heading_name(&heading.markup);
        if ignore.iter().any(|ignored| ignored == name) {
            debug!("Skipping ignored section '{}' in {}", name, title);
            ignored_level = Some(heading.level);
            continue;
        }

        path.push(heading);

        let body_end = headings.get(i + 1).map_or(wikitext.len(), |next| next.start);
        let titles = std::iter::once(title.to_string())
            .chain(path.iter().map(|h| h.markup.clone()))
            .collect();
        sections.push(Section::new(titles, &wikitext[heading.end..body_end])?);
    }

    debug!("Extracted {} sections from {}", sections.len(), title);
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_ignore() -> Vec<String> {
        DEFAULT_IGNORED_SECTIONS.iter().map(|s| s.to_string()).collect()
    }

    const ARTICLE: &str = "Lead paragraph about the ceremony.

== Winners ==
Winners intro.

=== Best Picture ===
Oppenheimer.

=== Best Director ===
Christopher Nolan.

== References ==
Ref list.

=== Archived ===
Old refs.

== Reception ==
Positive reviews.
";

    #[test]
    fn test_lead_section_first() {
        let sections = sections_from_wikitext("96th Academy Awards", ARTICLE, &default_ignore()).unwrap();
        assert_eq!(sections[0].titles(), &["96th Academy Awards".to_string()]);
        assert_eq!(sections[0].text(), "Lead paragraph about the ceremony.\n\n");
    }

    #[test]
    fn test_nested_heading_paths() {
        let sections = sections_from_wikitext("96th Academy Awards", ARTICLE, &default_ignore()).unwrap();
        let paths: Vec<Vec<String>> = sections.iter().map(|s| s.titles().to_vec()).collect();

        assert_eq!(
            paths[1],
            vec!["96th Academy Awards".to_string(), "== Winners ==".to_string()]
        );
        assert_eq!(
            paths[2],
            vec![
                "96th Academy Awards".to_string(),
                "== Winners ==".to_string(),
                "=== Best Picture ===".to_string(),
            ]
        );
        assert_eq!(
            paths[3],
            vec![
                "96th Academy Awards".to_string(),
                "== Winners ==".to_string(),
                "=== Best Director ===".to_string(),
            ]
        );
        assert_eq!(sections[1].text().trim(), "Winners intro.");
        assert_eq!(sections[2].text().trim(), "Oppenheimer.");
    }

    #[test]
    fn test_ignored_sections_drop_subtree() {
        let sections = sections_from_wikitext("96th Academy Awards", ARTICLE, &default_ignore()).unwrap();
        assert_eq!(sections.len(), 5);
        assert!(sections.iter().all(|s| !s.text().contains("Ref list")));
        assert!(sections.iter().all(|s| !s.text().contains("Old refs")));

        let last = sections.last().unwrap();
        assert_eq!(last.titles()[1], "== Reception ==");
        assert_eq!(last.text().trim(), "Positive reviews.");
    }

    #[test]
    fn test_crlf_line_endings() {
        let wikitext = "Lead text here.\r\n\r\n== Winners ==\r\nOppenheimer.\r\n\r\n== Notes ==\r\nSkipped.\r\n";
        let sections = sections_from_wikitext("Oscars", wikitext, &default_ignore()).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].text(), "Lead text here.\n\n");
        assert_eq!(sections[1].titles()[1], "== Winners ==");
        assert_eq!(sections[1].text().trim(), "Oppenheimer.");
    }

    #[test]
    fn test_article_without_headings() {
        let sections = sections_from_wikitext("Stub", "Just a stub.", &[]).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text(), "Just a stub.");
    }
}
