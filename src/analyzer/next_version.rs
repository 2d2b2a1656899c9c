use crate::analyzer::history::ReleaseHistory;
use crate::analyzer::resolver::tags_and_versions;
use crate::domain::{LevelBump, Tag, TagFormat, Version};
use crate::error::Result;
use crate::git::Repository;
use crate::parser::CommitParser;
use regex::Regex;
use std::fmt;
use tracing::{debug, info};

/// Release policy for the active branch plus any command-line overrides
#[derive(Debug, Clone, PartialEq)]
pub struct VersionPolicy {
    /// Produce a prerelease version
    pub prerelease: bool,
    /// Token used for prerelease versions
    pub prerelease_token: String,
    /// Allow breaking changes to bump the major version while it is 0
    pub major_on_zero: bool,
    /// Allow releasing versions below 1.0.0
    pub allow_zero_version: bool,
    /// Level to apply regardless of the commits
    pub force_level: Option<LevelBump>,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        VersionPolicy {
            prerelease: false,
            prerelease_token: "rc".to_string(),
            major_on_zero: true,
            allow_zero_version: true,
            force_level: None,
        }
    }
}

/// Result of a release decision
///
/// Only [`ReleaseOutcome::Release`] is a success; the others are expected,
/// non-fatal states the caller maps to exit codes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// A new version is ready to be tagged
    Release(Version),
    /// Nothing since the last release calls for a new version
    NoChanges { latest: Option<Version> },
    /// The computed version already has a tag
    AlreadyReleased(Version),
    /// No branch group matches the active branch
    NotAReleaseBranch(String),
}

impl ReleaseOutcome {
    pub fn is_release(&self) -> bool {
        matches!(self, ReleaseOutcome::Release(_))
    }

    pub fn version(&self) -> Option<&Version> {
        match self {
            ReleaseOutcome::Release(version) => Some(version),
            _ => None,
        }
    }
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseOutcome::Release(version) => {
                write!(f, "The next version is {} ({})", version, version.as_tag())
            }
            ReleaseOutcome::NoChanges { latest: Some(latest) } => {
                write!(f, "No release will be made, {} has already been released", latest)
            }
            ReleaseOutcome::NoChanges { latest: None } => {
                write!(f, "No release will be made, no commits call for a release")
            }
            ReleaseOutcome::AlreadyReleased(version) => {
                write!(f, "Version {} has already been released", version)
            }
            ReleaseOutcome::NotAReleaseBranch(branch) => {
                write!(f, "Branch '{}' is not a release branch", branch)
            }
        }
    }
}

/// Compute the next version for the repository's HEAD
pub fn next_version<R: Repository + ?Sized>(
    repo: &R,
    tag_format: &TagFormat,
    parser: &dyn CommitParser,
    exclude_patterns: &[Regex],
    policy: &VersionPolicy,
) -> Result<ReleaseOutcome> {
    let tags: Vec<Tag> = repo.tags()?;
    let releases = tags_and_versions(&tags, tag_format);
    let commits = repo.commits_from_head()?;
    let history = ReleaseHistory::from_commits(&commits, &releases, parser, exclude_patterns);

    Ok(next_version_from_history(
        &history, &releases, tag_format, policy,
    ))
}

/// Compute the next version from an already built history
///
/// `releases` must be every resolved release tag, newest first, as returned
/// by [`tags_and_versions`].
pub fn next_version_from_history(
    history: &ReleaseHistory,
    releases: &[(Tag, Version)],
    tag_format: &TagFormat,
    policy: &VersionPolicy,
) -> ReleaseOutcome {
    let versions: Vec<&Version> = releases.iter().map(|(_, v)| v).collect();
    let latest_version = versions.first().copied();
    let latest_full = versions
        .iter()
        .find(|v| !v.is_prerelease())
        .map(|v| (*v).clone())
        .unwrap_or_else(|| Version::new(0, 0, 0).with_tag_format(tag_format.template()));

    let unreleased_level = history.unreleased_level();
    if policy.force_level.is_none() && unreleased_level == LevelBump::NoRelease {
        info!("no unreleased commits call for a release");
        return ReleaseOutcome::NoChanges {
            latest: latest_version.cloned(),
        };
    }

    // A pending prerelease newer than the last full release, e.g. 1.2.0-rc.1 over 1.1.0
    let pending = latest_version.filter(|v| v.is_prerelease() && **v > latest_full);

    let mut level = match policy.force_level {
        Some(forced) => {
            debug!(level = %forced, "bump level forced");
            forced
        }
        None => {
            // commits already shipped in prereleases of the pending target still count
            let prereleased = history
                .released
                .iter()
                .filter(|r| r.version.is_prerelease() && r.version > latest_full)
                .map(|r| r.level())
                .max()
                .unwrap_or(LevelBump::NoRelease);
            unreleased_level.max(prereleased)
        }
    };

    let current_major = latest_version.map_or(0, |v| v.major);
    if current_major == 0 {
        if !policy.allow_zero_version {
            debug!("zero versions disallowed, releasing 1.0.0");
            level = LevelBump::Major;
        } else if level == LevelBump::Major && (versions.is_empty() || !policy.major_on_zero) {
            debug!("breaking change kept below 1.0.0");
            level = LevelBump::Minor;
        }
    }
    debug!(%level, latest = ?latest_version.map(|v| v.to_string()), "bump level decided");

    let token = policy.prerelease_token.as_str();
    let next = match pending {
        Some(pending) => {
            let diff = pending.difference(&latest_full);
            let same_target = level <= diff;
            match (policy.prerelease, same_target) {
                (true, true) => next_revision(&versions, &pending.finalize_version(), token),
                (true, false) => next_revision(&versions, &latest_full.bump(level), token),
                (false, true) => pending.finalize_version(),
                (false, false) => latest_full.bump(level),
            }
        }
        None => {
            let level = match level {
                // a revision needs a prerelease to advance; start a new target instead
                LevelBump::PrereleaseRevision => LevelBump::Patch,
                other => other,
            };
            let target = latest_full.bump(level);
            if policy.prerelease {
                next_revision(&versions, &target, token)
            } else {
                target
            }
        }
    }
    .with_tag_format(tag_format.template());

    if versions.iter().any(|v| **v == next) {
        info!(version = %next, "version already released");
        return ReleaseOutcome::AlreadyReleased(next);
    }

    info!(version = %next, "next version computed");
    ReleaseOutcome::Release(next)
}

/// Next prerelease of `target` under `token`, after the highest existing revision
fn next_revision(versions: &[&Version], target: &Version, token: &str) -> Version {
    let highest = versions
        .iter()
        .filter(|v| v.prerelease_token() == Some(token) && v.finalize_version() == *target)
        .max();

    match highest {
        Some(latest) => {
            debug!(latest = %latest, "advancing prerelease revision");
            latest.bump_prerelease_revision(token)
        }
        None => target.to_prerelease(token, Some(1)),
    }
}
