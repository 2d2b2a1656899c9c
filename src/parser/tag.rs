use crate::domain::{CommitRef, LevelBump, ParseError, ParseResult, ParsedCommit};
use crate::error::{Result, SemrelError};
use crate::parser::{parse_options, split_body, CommitParser};
use serde::Deserialize;

/// Options for the tag-marker parser
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagOptions {
    pub minor_tag: String,
    pub patch_tag: String,
}

impl Default for TagOptions {
    fn default() -> Self {
        TagOptions {
            minor_tag: ":sparkles:".to_string(),
            patch_tag: ":nut_and_bolt:".to_string(),
        }
    }
}

/// Legacy parser keyed on a minor or patch marker anywhere in the subject
///
/// A subject carrying neither marker is a hard parse error. A
/// `BREAKING CHANGE:` footer raises a tagged commit to a major bump.
#[derive(Debug)]
pub struct TagCommitParser {
    name: String,
    options: TagOptions,
}

impl TagCommitParser {
    pub const NAME: &'static str = "tag";

    pub fn new(options: TagOptions) -> Result<Self> {
        Self::with_name(Self::NAME, options)
    }

    pub fn with_name(name: impl Into<String>, options: TagOptions) -> Result<Self> {
        let name = name.into();
        if options.minor_tag.is_empty() || options.patch_tag.is_empty() {
            return Err(SemrelError::parser(format!(
                "Commit parser '{}' requires non-empty minor_tag and patch_tag",
                name
            )));
        }
        Ok(TagCommitParser { name, options })
    }

    pub fn from_table(name: &str, options: &toml::Table) -> Result<Self> {
        Self::with_name(name, parse_options(name, options)?)
    }
}

impl CommitParser for TagCommitParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, commit: &CommitRef) -> ParseResult {
        let subject = commit.subject();

        let (marker, level, r#type) = if subject.contains(&self.options.minor_tag) {
            (&self.options.minor_tag, LevelBump::Minor, "feature")
        } else if subject.contains(&self.options.patch_tag) {
            (&self.options.patch_tag, LevelBump::Patch, "fix")
        } else {
            return ParseResult::Error(ParseError {
                commit: commit.clone(),
                error: format!("Unable to parse the given commit message: {}", subject),
            });
        };

        let body = split_body(commit.message.splitn(2, '\n').nth(1).unwrap_or(""));
        let mut descriptions = vec![subject.replace(marker.as_str(), "").trim().to_string()];
        descriptions.extend(body.descriptions);
        let breaking_descriptions = body.breaking;

        let bump = if breaking_descriptions.is_empty() {
            level
        } else {
            LevelBump::Major
        };

        ParseResult::Parsed(ParsedCommit {
            bump,
            r#type: r#type.to_string(),
            scope: String::new(),
            descriptions,
            breaking_descriptions,
            release_notices: body.notices,
            commit: commit.clone(),
        })
    }
}
