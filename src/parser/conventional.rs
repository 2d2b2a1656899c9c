use crate::domain::{CommitRef, LevelBump, ParseError, ParseResult, ParsedCommit};
use crate::error::{Result, SemrelError};
use crate::parser::{parse_options, split_body, CommitParser};
use regex::Regex;
use serde::Deserialize;

fn default_allowed_tags() -> Vec<String> {
    [
        "build", "chore", "ci", "docs", "feat", "fix", "perf", "style", "refactor", "test",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

/// Options for the conventional commit parser
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConventionalOptions {
    /// Commit types recognised in the header
    pub allowed_tags: Vec<String>,
    /// Types that trigger a major bump
    pub major_tags: Vec<String>,
    /// Types that trigger a minor bump
    pub minor_tags: Vec<String>,
    /// Types that trigger a patch bump
    pub patch_tags: Vec<String>,
    /// Bump for recognised types listed in neither table
    pub default_bump_level: LevelBump,
}

impl Default for ConventionalOptions {
    fn default() -> Self {
        ConventionalOptions {
            allowed_tags: default_allowed_tags(),
            major_tags: Vec::new(),
            minor_tags: vec!["feat".to_string()],
            patch_tags: vec!["fix".to_string(), "perf".to_string()],
            default_bump_level: LevelBump::NoRelease,
        }
    }
}

/// Long section names for the standard commit types
fn long_type_name(commit_type: &str) -> String {
    match commit_type {
        "feat" => "feature",
        "fix" => "fix",
        "perf" => "performance",
        "docs" => "documentation",
        "style" => "style",
        "refactor" => "refactor",
        "test" => "test",
        "build" => "build",
        "ci" => "ci",
        "chore" => "chore",
        other => other,
    }
    .to_string()
}

/// Parser for `type(scope)!: subject` commit headers
///
/// Breaking changes come from the `!` marker or a `BREAKING CHANGE:` footer;
/// `NOTICE:` footers become release notices. Headers that do not match are a
/// [`ParseResult::Error`].
#[derive(Debug)]
pub struct ConventionalCommitParser {
    name: String,
    options: ConventionalOptions,
    header: Regex,
}

impl ConventionalCommitParser {
    pub const NAME: &'static str = "conventional";

    pub fn new(options: ConventionalOptions) -> Result<Self> {
        Self::with_name(Self::NAME, options)
    }

    pub fn with_name(name: impl Into<String>, options: ConventionalOptions) -> Result<Self> {
        let name = name.into();
        if options.allowed_tags.is_empty() {
            return Err(SemrelError::parser(format!(
                "Commit parser '{}' needs at least one allowed tag",
                name
            )));
        }

        let types = options
            .allowed_tags
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let header = Regex::new(&format!(
            r"(?s)^(?P<type>{})(?:\((?P<scope>[^\n]+)\))?(?P<break>!)?: (?P<subject>[^\n]+)(?:\n\n(?P<text>.+))?",
            types
        ))
        .map_err(|e| SemrelError::parser(format!("Invalid allowed tags: {}", e)))?;

        Ok(ConventionalCommitParser {
            name,
            options,
            header,
        })
    }

    /// Build from a raw options table
    pub fn from_table(name: &str, options: &toml::Table) -> Result<Self> {
        Self::with_name(name, parse_options(name, options)?)
    }

    pub fn options(&self) -> &ConventionalOptions {
        &self.options
    }
}

impl CommitParser for ConventionalCommitParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, commit: &CommitRef) -> ParseResult {
        let message = commit.message.replace("\r\n", "\n");
        let captures = match self.header.captures(message.trim()) {
            Some(captures) => captures,
            None => {
                return ParseResult::Error(ParseError {
                    commit: commit.clone(),
                    error: format!("Unable to parse commit message: {}", commit.subject()),
                });
            }
        };

        let commit_type = captures.name("type").map_or("", |m| m.as_str());
        let scope = captures
            .name("scope")
            .map_or(String::new(), |m| m.as_str().to_string());
        let subject = captures.name("subject").map_or("", |m| m.as_str()).trim();
        let break_marker = captures.name("break").is_some();

        let body = split_body(captures.name("text").map_or("", |m| m.as_str()));
        let mut descriptions = vec![subject.to_string()];
        descriptions.extend(body.descriptions);
        let mut breaking_descriptions = body.breaking;
        let release_notices = body.notices;

        if break_marker && breaking_descriptions.is_empty() {
            breaking_descriptions.push(subject.to_string());
        }

        let has = |tags: &[String]| tags.iter().any(|t| t == commit_type);
        let bump = if !breaking_descriptions.is_empty() || has(&self.options.major_tags) {
            LevelBump::Major
        } else if has(&self.options.minor_tags) {
            LevelBump::Minor
        } else if has(&self.options.patch_tags) {
            LevelBump::Patch
        } else {
            self.options.default_bump_level
        };

        ParseResult::Parsed(ParsedCommit {
            bump,
            r#type: long_type_name(commit_type),
            scope,
            descriptions,
            breaking_descriptions,
            release_notices,
            commit: commit.clone(),
        })
    }
}
