use crate::domain::{CommitRef, LevelBump, ParseResult, ParsedCommit};
use crate::error::{Result, SemrelError};
use crate::parser::{paragraphs, parse_options, CommitParser};
use regex::Regex;
use serde::Deserialize;

/// Type label for commits without a configured emoji
pub const OTHER_TYPE: &str = "Other";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Options for the emoji parser
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmojiOptions {
    pub major_tags: Vec<String>,
    pub minor_tags: Vec<String>,
    pub patch_tags: Vec<String>,
    pub default_bump_level: LevelBump,
}

impl Default for EmojiOptions {
    fn default() -> Self {
        EmojiOptions {
            major_tags: strings(&[":boom:"]),
            minor_tags: strings(&[
                ":sparkles:",
                ":children_crossing:",
                ":lipstick:",
                ":iphone:",
                ":egg:",
                ":chart_with_upwards_trend:",
            ]),
            patch_tags: strings(&[
                ":ambulance:",
                ":lock:",
                ":bug:",
                ":zap:",
                ":goal_net:",
                ":alien:",
                ":wheelchair:",
                ":speech_balloon:",
                ":mag:",
                ":apple:",
                ":penguin:",
                ":checkered_flag:",
                ":robot:",
                ":green_apple:",
            ]),
            default_bump_level: LevelBump::NoRelease,
        }
    }
}

/// Parser keyed on the first configured emoji code in the subject line
///
/// Messages without a configured emoji are filed as [`OTHER_TYPE`] at the
/// default level; this parser never produces a parse error.
#[derive(Debug)]
pub struct EmojiCommitParser {
    name: String,
    options: EmojiOptions,
    matcher: Option<Regex>,
}

impl EmojiCommitParser {
    pub const NAME: &'static str = "emoji";

    pub fn new(options: EmojiOptions) -> Result<Self> {
        Self::with_name(Self::NAME, options)
    }

    pub fn with_name(name: impl Into<String>, options: EmojiOptions) -> Result<Self> {
        let mut all: Vec<&String> = options
            .major_tags
            .iter()
            .chain(&options.minor_tags)
            .chain(&options.patch_tags)
            .collect();
        // longest first so overlapping codes resolve to the most specific one
        all.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let matcher = if all.is_empty() {
            None
        } else {
            let alternation = all
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                Regex::new(&format!("(?P<emoji>{})", alternation))
                    .map_err(|e| SemrelError::parser(format!("Invalid emoji tags: {}", e)))?,
            )
        };

        Ok(EmojiCommitParser {
            name: name.into(),
            options,
            matcher,
        })
    }

    pub fn from_table(name: &str, options: &toml::Table) -> Result<Self> {
        Self::with_name(name, parse_options(name, options)?)
    }

    fn level_for(&self, emoji: &str) -> LevelBump {
        let has = |tags: &[String]| tags.iter().any(|t| t == emoji);
        if has(&self.options.major_tags) {
            LevelBump::Major
        } else if has(&self.options.minor_tags) {
            LevelBump::Minor
        } else if has(&self.options.patch_tags) {
            LevelBump::Patch
        } else {
            self.options.default_bump_level
        }
    }
}

impl CommitParser for EmojiCommitParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, commit: &CommitRef) -> ParseResult {
        let subject = commit.subject();
        let emoji = self
            .matcher
            .as_ref()
            .and_then(|re| re.find(subject))
            .map(|m| m.as_str().to_string());

        let (r#type, bump) = match emoji {
            Some(emoji) => {
                let level = self.level_for(&emoji);
                (emoji, level)
            }
            None => (OTHER_TYPE.to_string(), self.options.default_bump_level),
        };

        let descriptions = paragraphs(&commit.message);
        let breaking_descriptions = if bump == LevelBump::Major {
            descriptions.iter().skip(1).cloned().collect()
        } else {
            Vec::new()
        };

        ParseResult::Parsed(ParsedCommit {
            bump,
            r#type,
            scope: String::new(),
            descriptions,
            breaking_descriptions,
            release_notices: Vec::new(),
            commit: commit.clone(),
        })
    }
}
