//! Release history reconstruction
//!
//! Commits reachable from HEAD are walked once, newest first. Each tagged
//! commit opens the bucket of the release it introduces and every commit
//! walked after it lands in that bucket until an older tag is reached.
//! Commits seen before the first tag are unreleased.

use crate::analyzer::resolver::tags_and_versions;
use crate::domain::{CommitRef, LevelBump, ParseResult, Tag, TagFormat, Version};
use crate::error::Result;
use crate::git::Repository;
use crate::parser::CommitParser;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Classified commits grouped by type label, in walk order within each label
pub type CommitsByType = BTreeMap<String, Vec<ParseResult>>;

/// Commits introduced by one release
#[derive(Debug, Clone, Serialize)]
pub struct Release {
    pub version: Version,
    /// Tag name the release was resolved from
    pub tag: String,
    /// Commit the release tag points at
    pub tagged_commit: String,
    pub elements: CommitsByType,
}

impl Release {
    /// Number of commits filed under this release
    pub fn len(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest bump level among this release's commits
    pub fn level(&self) -> LevelBump {
        max_level(&self.elements)
    }
}

/// Every commit reachable from HEAD, filed as unreleased or under one release
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReleaseHistory {
    pub unreleased: CommitsByType,
    /// Releases in the order their tags were met during the walk, newest first
    pub released: Vec<Release>,
}

fn max_level(elements: &CommitsByType) -> LevelBump {
    elements
        .values()
        .flatten()
        .map(ParseResult::bump)
        .max()
        .unwrap_or(LevelBump::NoRelease)
}

impl ReleaseHistory {
    /// Build the history of the repository's current HEAD
    ///
    /// Tags not following `tag_format` are ignored. Commits whose message
    /// matches any of `exclude_patterns` are skipped entirely.
    pub fn from_git_history<R: Repository + ?Sized>(
        repo: &R,
        tag_format: &TagFormat,
        parser: &dyn CommitParser,
        exclude_patterns: &[Regex],
    ) -> Result<Self> {
        let tags = repo.tags()?;
        let releases = tags_and_versions(&tags, tag_format);
        let commits = repo.commits_from_head()?;

        let history = Self::from_commits(&commits, &releases, parser, exclude_patterns);
        info!(
            commits = commits.len(),
            unreleased = history.unreleased_count(),
            releases = history.released.len(),
            "release history built"
        );
        Ok(history)
    }

    /// Build a history from a walk (newest first) and resolved release tags
    pub fn from_commits(
        commits: &[CommitRef],
        releases: &[(Tag, Version)],
        parser: &dyn CommitParser,
        exclude_patterns: &[Regex],
    ) -> Self {
        // releases are newest first, so a commit carrying several release
        // tags resolves to the highest of them
        let mut by_commit: HashMap<&str, (&str, &Version)> = HashMap::new();
        for (tag, version) in releases {
            by_commit
                .entry(tag.commit.as_str())
                .or_insert((tag.name.as_str(), version));
        }

        let mut history = ReleaseHistory::default();
        let mut cursor: Option<usize> = None;

        for commit in commits {
            if let Some(&(tag, version)) = by_commit.get(commit.hash.as_str()) {
                let index = match history.released.iter().position(|r| &r.version == version) {
                    Some(index) => index,
                    None => {
                        history.released.push(Release {
                            version: version.clone(),
                            tag: tag.to_string(),
                            tagged_commit: commit.hash.clone(),
                            elements: CommitsByType::new(),
                        });
                        history.released.len() - 1
                    }
                };
                debug!(commit = commit.short_hash(), %version, "entering release");
                cursor = Some(index);
            }

            if exclude_patterns.iter().any(|p| p.is_match(&commit.message)) {
                debug!(commit = commit.short_hash(), "commit excluded");
                continue;
            }

            let result = parser.parse(commit);
            let bucket = match cursor {
                Some(index) => &mut history.released[index].elements,
                None => &mut history.unreleased,
            };
            bucket
                .entry(result.type_label().to_string())
                .or_default()
                .push(result);
        }

        history
    }

    /// Highest bump level among unreleased commits
    pub fn unreleased_level(&self) -> LevelBump {
        max_level(&self.unreleased)
    }

    pub fn unreleased_count(&self) -> usize {
        self.unreleased.values().map(Vec::len).sum()
    }

    /// Release entry for `version`, if its tag was met during the walk
    pub fn release_for(&self, version: &Version) -> Option<&Release> {
        self.released.iter().find(|r| &r.version == version)
    }

    /// Every filed commit, unreleased first, then release by release
    pub fn commits(&self) -> impl Iterator<Item = &CommitRef> {
        self.unreleased
            .values()
            .chain(self.released.iter().flat_map(|r| r.elements.values()))
            .flatten()
            .map(ParseResult::commit)
    }

    /// File the unreleased commits under a new release, placed first
    ///
    /// Used to describe a release that is about to be tagged at `tagged_commit`.
    pub fn release(&mut self, version: Version, tagged_commit: impl Into<String>) {
        let elements = std::mem::take(&mut self.unreleased);
        self.released.insert(
            0,
            Release {
                tag: version.as_tag(),
                version,
                tagged_commit: tagged_commit.into(),
                elements,
            },
        );
    }
}
