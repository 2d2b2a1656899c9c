//! Commit message parsers
//!
//! Every parser classifies a single commit into a [`ParseResult`] without
//! looking at any other repository state. Parsers are built by name through
//! the [`ParserRegistry`], each validating its own options table.
//!
//! Built-in parsers:
//!
//! - [conventional::ConventionalCommitParser]: `type(scope)!: subject` headers
//! - [emoji::EmojiCommitParser]: gitmoji-style leading emoji codes
//! - [scipy::ScipyCommitParser]: numpy/scipy `ENH:`/`BUG:` prefixes
//! - [tag::TagCommitParser]: legacy `:sparkles:`/`:nut_and_bolt:` markers

pub mod conventional;
pub mod emoji;
pub mod registry;
pub mod scipy;
pub mod tag;

pub use conventional::{ConventionalCommitParser, ConventionalOptions};
pub use emoji::{EmojiCommitParser, EmojiOptions};
pub use registry::{ParserConstructor, ParserRegistry};
pub use scipy::{ScipyCommitParser, ScipyOptions};
pub use tag::{TagCommitParser, TagOptions};

use crate::domain::{CommitRef, ParseResult};
use crate::error::{Result, SemrelError};
use serde::de::DeserializeOwned;

/// Classifies commits for version computation and release history
///
/// Implementations must be pure and deterministic in the commit message.
pub trait CommitParser: Send + Sync {
    /// Identifier the parser was registered under
    fn name(&self) -> &str;

    /// Parse one commit
    fn parse(&self, commit: &CommitRef) -> ParseResult;
}

/// Deserialize a parser's options table, rejecting unknown keys
///
/// Option structs are expected to carry `#[serde(default, deny_unknown_fields)]`.
pub fn parse_options<T: DeserializeOwned>(parser: &str, options: &toml::Table) -> Result<T> {
    toml::Value::Table(options.clone())
        .try_into::<T>()
        .map_err(|e| {
            SemrelError::parser(format!(
                "Invalid options for commit parser '{}': {}",
                parser, e
            ))
        })
}

/// Split a commit body into trimmed, non-empty paragraphs
pub(crate) fn paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

/// Commit body sorted into prose and the trailers the parsers act on
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Body {
    pub descriptions: Vec<String>,
    pub breaking: Vec<String>,
    pub notices: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Trailer {
    Breaking,
    Notice,
}

/// A `BREAKING CHANGE:`, `BREAKING-CHANGE:` or `NOTICE:` line and its text
fn recognised_trailer(line: &str) -> Option<(Trailer, &str)> {
    if let Some(rest) = line
        .strip_prefix("BREAKING CHANGE:")
        .or_else(|| line.strip_prefix("BREAKING-CHANGE:"))
    {
        return Some((Trailer::Breaking, rest));
    }
    line.strip_prefix("NOTICE:").map(|rest| (Trailer::Notice, rest))
}

/// Any git trailer line, `Token: value` or `Token #value`
fn is_trailer_line(line: &str) -> bool {
    let token_end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(line.len());
    token_end > 0 && (line[token_end..].starts_with(": ") || line[token_end..].starts_with(" #"))
}

impl Body {
    fn push(&mut self, trailer: Option<(Trailer, String)>) {
        match trailer {
            Some((Trailer::Breaking, text)) => self.breaking.push(text),
            Some((Trailer::Notice, text)) => self.notices.push(text),
            None => {}
        }
    }
}

/// Split a commit body into description paragraphs, breaking changes and notices
///
/// Trailers are recognised on any line, so a footer block such as
/// `Refs: #1` followed by `BREAKING CHANGE: ...` still counts as breaking.
/// Lines after a recognised trailer continue it until the next trailer line.
pub(crate) fn split_body(text: &str) -> Body {
    let mut body = Body::default();

    for paragraph in paragraphs(text) {
        let mut prose: Vec<&str> = Vec::new();
        let mut current: Option<(Trailer, String)> = None;

        for line in paragraph.lines() {
            if let Some((kind, rest)) = recognised_trailer(line) {
                body.push(current.take());
                current = Some((kind, rest.trim().to_string()));
            } else if current.is_some() && !is_trailer_line(line) {
                if let Some((_, text)) = current.as_mut() {
                    text.push('\n');
                    text.push_str(line.trim());
                }
            } else {
                body.push(current.take());
                prose.push(line);
            }
        }
        body.push(current);

        let prose = prose.join("\n");
        if !prose.trim().is_empty() {
            body.descriptions.push(prose.trim().to_string());
        }
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs() {
        let text = "first line\ncontinued\n\n\n  second  \r\n\r\nthird";
        assert_eq!(
            paragraphs(text),
            vec!["first line\ncontinued", "second", "third"]
        );
    }

    #[test]
    fn test_split_body_footer_paragraph() {
        let body = split_body("Some context.\n\nBREAKING CHANGE: api removed\nuse v2 instead");
        assert_eq!(body.descriptions, vec!["Some context."]);
        assert_eq!(body.breaking, vec!["api removed\nuse v2 instead"]);
        assert!(body.notices.is_empty());
    }

    #[test]
    fn test_split_body_mixed_trailer_block() {
        let body = split_body(
            "The flag was unused.\n\nRefs: #123\nBREAKING-CHANGE: --legacy is gone\nNOTICE: update scripts\nReviewed-by: Someone",
        );
        assert_eq!(body.breaking, vec!["--legacy is gone"]);
        assert_eq!(body.notices, vec!["update scripts"]);
        assert_eq!(
            body.descriptions,
            vec!["The flag was unused.", "Refs: #123\nReviewed-by: Someone"]
        );
    }

    #[test]
    fn test_split_body_without_trailers() {
        let body = split_body("just prose\nover two lines");
        assert_eq!(body.descriptions, vec!["just prose\nover two lines"]);
        assert!(body.breaking.is_empty());
        assert_eq!(split_body(""), Body::default());
    }

    #[test]
    fn test_trailer_lines() {
        assert!(is_trailer_line("Refs: #123"));
        assert!(is_trailer_line("Fixes #42"));
        assert!(is_trailer_line("Co-authored-by: A <a@example.com>"));
        assert!(!is_trailer_line("plain text: with colon later"));
        assert!(!is_trailer_line(": nothing"));
    }
}
