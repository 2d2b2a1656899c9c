use crate::domain::{CommitRef, LevelBump, ParseError, ParseResult, ParsedCommit};
use crate::error::{Result, SemrelError};
use crate::parser::{parse_options, split_body, CommitParser};
use regex::Regex;
use serde::Deserialize;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Options for the scipy-style parser
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScipyOptions {
    pub allowed_tags: Vec<String>,
    pub major_tags: Vec<String>,
    pub minor_tags: Vec<String>,
    pub patch_tags: Vec<String>,
    pub default_bump_level: LevelBump,
}

impl Default for ScipyOptions {
    fn default() -> Self {
        ScipyOptions {
            allowed_tags: strings(&[
                "API", "BENCH", "BLD", "BUG", "DEP", "DEV", "DOC", "ENH", "MAINT", "REV", "STY",
                "TST", "REL", "FEAT", "TEST",
            ]),
            major_tags: strings(&["API"]),
            minor_tags: strings(&["DEP", "DEV", "ENH", "REV", "FEAT"]),
            patch_tags: strings(&["BLD", "BUG", "MAINT"]),
            default_bump_level: LevelBump::NoRelease,
        }
    }
}

fn section_for(tag: &str) -> String {
    match tag {
        "API" => "breaking",
        "BENCH" => "benchmark",
        "BLD" => "build",
        "BUG" | "MAINT" => "fix",
        "DEP" => "deprecation",
        "DEV" => "development",
        "DOC" => "documentation",
        "ENH" | "FEAT" => "feature",
        "REV" => "other",
        "STY" => "style",
        "TST" | "TEST" => "test",
        "REL" => "release",
        other => return other.to_lowercase(),
    }
    .to_string()
}

/// Parser for numpy/scipy commit prefixes such as `ENH: add solver`
#[derive(Debug)]
pub struct ScipyCommitParser {
    name: String,
    options: ScipyOptions,
    header: Regex,
}

impl ScipyCommitParser {
    pub const NAME: &'static str = "scipy";

    pub fn new(options: ScipyOptions) -> Result<Self> {
        Self::with_name(Self::NAME, options)
    }

    pub fn with_name(name: impl Into<String>, options: ScipyOptions) -> Result<Self> {
        let name = name.into();
        if options.allowed_tags.is_empty() {
            return Err(SemrelError::parser(format!(
                "Commit parser '{}' needs at least one allowed tag",
                name
            )));
        }

        let tags = options
            .allowed_tags
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let header = Regex::new(&format!(
            r"(?s)^(?P<tag>{})(?:\((?P<scope>[^\n]+)\))?:? (?P<subject>[^\n]+)(?:\n\n(?P<text>.+))?",
            tags
        ))
        .map_err(|e| SemrelError::parser(format!("Invalid allowed tags: {}", e)))?;

        Ok(ScipyCommitParser {
            name,
            options,
            header,
        })
    }

    pub fn from_table(name: &str, options: &toml::Table) -> Result<Self> {
        Self::with_name(name, parse_options(name, options)?)
    }
}

impl CommitParser for ScipyCommitParser {
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

        let tag = captures.name("tag").map_or("", |m| m.as_str());
        let scope = captures
            .name("scope")
            .map_or(String::new(), |m| m.as_str().to_string());
        let subject = captures
            .name("subject")
            .map_or("", |m| m.as_str())
            .trim()
            .trim_end_matches(':');

        let body = split_body(captures.name("text").map_or("", |m| m.as_str()));
        let mut descriptions = vec![subject.to_string()];
        descriptions.extend(body.descriptions);
        let mut breaking_descriptions = body.breaking;

        let has = |tags: &[String]| tags.iter().any(|t| t == tag);
        let bump = if !breaking_descriptions.is_empty() || has(&self.options.major_tags) {
            LevelBump::Major
        } else if has(&self.options.minor_tags) {
            LevelBump::Minor
        } else if has(&self.options.patch_tags) {
            LevelBump::Patch
        } else {
            self.options.default_bump_level
        };

        if bump == LevelBump::Major && breaking_descriptions.is_empty() {
            breaking_descriptions.push(subject.to_string());
        }

        ParseResult::Parsed(ParsedCommit {
            bump,
            r#type: section_for(tag),
            scope,
            descriptions,
            breaking_descriptions,
            release_notices: body.notices,
            commit: commit.clone(),
        })
    }
}
