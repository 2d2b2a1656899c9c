//! Release workflow orchestration
//!
//! Drives one invocation from branch selection to tagging, independent of
//! clap so the workflow can be exercised against any [`Repository`]:
//!
//! 1. Match the active branch against the configured branch groups
//! 2. Resolve release tags and build the release history
//! 3. Decide the outcome with the next-version algorithm
//! 4. Optionally create the release tag (and partial tags) and push them
//!
//! States other than [`ReleaseOutcome::Release`] are values, never errors.

use crate::analyzer::history::ReleaseHistory;
use crate::analyzer::next_version::{next_version_from_history, ReleaseOutcome, VersionPolicy};
use crate::analyzer::resolver::{partial_tags_to_move, tags_and_versions};
use crate::config::ReleaseSettings;
use crate::domain::{select_branch_options, LevelBump, Prerelease, Tag, Version};
use crate::error::{Result, SemrelError};
use crate::git::Repository;
use std::collections::HashSet;
use tracing::{debug, info};

/// Exit code for a computed or applied release
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for configuration and validation failures
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for non-release outcomes under `--strict`
pub const EXIT_NO_RELEASE: i32 = 2;

/// Command-line overrides for one release decision
///
/// Mirrors the CLI flags but carries no clap types, so the workflow can be
/// driven programmatically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// Bump level to apply regardless of the commits
    pub force_level: Option<LevelBump>,

    /// `Some(true)` forces a prerelease, `Some(false)` a full release
    pub as_prerelease: Option<bool>,

    /// Prerelease token replacing the branch group's
    pub prerelease_token: Option<String>,
}

/// Everything decided for the current HEAD
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    /// Active branch name
    pub branch: String,

    /// Matching branch group, `None` when the branch is not a release branch
    pub group: Option<String>,

    /// Policy the version was computed under
    pub policy: VersionPolicy,

    pub outcome: ReleaseOutcome,

    /// Release history of HEAD; empty when the branch is not a release branch
    pub history: ReleaseHistory,

    /// Every tag in the repository
    pub tags: Vec<Tag>,

    /// Commit HEAD points at, if any
    pub head: Option<String>,
}

impl ReleasePlan {
    /// Release history with the pending release filed, when there is one
    pub fn history_with_release(&self) -> ReleaseHistory {
        let mut history = self.history.clone();
        if let (ReleaseOutcome::Release(version), Some(head)) = (&self.outcome, &self.head) {
            history.release(version.clone(), head.clone());
        }
        history
    }
}

/// Tags written by [`apply_release`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRelease {
    /// The release tag that was created
    pub tag: String,

    /// Partial tags created or moved alongside it
    pub partial_tags: Vec<String>,

    /// Whether the tags were pushed to the remote
    pub pushed: bool,
}

fn validate_token(token: &str) -> Result<()> {
    match Prerelease::parse(token) {
        Ok(pre) if pre.revision.is_none() => Ok(()),
        _ => Err(SemrelError::config(format!(
            "Invalid prerelease token '{}'",
            token
        ))),
    }
}

/// Decide what to release for the repository's HEAD
///
/// A branch outside every configured group yields
/// [`ReleaseOutcome::NotAReleaseBranch`] without walking any history.
pub fn plan_release<R: Repository + ?Sized>(
    repo: &R,
    settings: &ReleaseSettings,
    args: &ReleaseArgs,
) -> Result<ReleasePlan> {
    if let Some(token) = &args.prerelease_token {
        validate_token(token)?;
    }

    let branch = repo.active_branch()?;
    let group = match select_branch_options(&settings.branches, &branch) {
        Ok(group) => group,
        Err(SemrelError::NotReleaseBranch(branch)) => {
            info!(%branch, "not a release branch");
            return Ok(ReleasePlan {
                outcome: ReleaseOutcome::NotAReleaseBranch(branch.clone()),
                branch,
                group: None,
                policy: VersionPolicy::default(),
                history: ReleaseHistory::default(),
                tags: Vec::new(),
                head: None,
            });
        }
        Err(e) => return Err(e),
    };

    let forced_prerelease = args.force_level == Some(LevelBump::PrereleaseRevision);
    let policy = VersionPolicy {
        prerelease: args.as_prerelease.unwrap_or(group.prerelease || forced_prerelease),
        prerelease_token: args
            .prerelease_token
            .clone()
            .unwrap_or_else(|| group.prerelease_token.clone()),
        major_on_zero: settings.major_on_zero,
        allow_zero_version: settings.allow_zero_version,
        force_level: args.force_level,
    };
    debug!(?policy, group = %group.name, "release policy");

    let tags = repo.tags()?;
    let releases = tags_and_versions(&tags, &settings.tag_format);
    let commits = repo.commits_from_head()?;
    let history = ReleaseHistory::from_commits(
        &commits,
        &releases,
        settings.parser.as_ref(),
        &settings.exclude_patterns,
    );

    let outcome = next_version_from_history(&history, &releases, &settings.tag_format, &policy);
    info!(%branch, %outcome, "release decided");

    Ok(ReleasePlan {
        group: Some(group.name.clone()),
        branch,
        policy,
        outcome,
        history,
        tags,
        head: commits.first().map(|c| c.hash.clone()),
    })
}

/// Highest release tag reachable from HEAD
pub fn last_released<R: Repository + ?Sized>(
    repo: &R,
    settings: &ReleaseSettings,
) -> Result<Option<(Tag, Version)>> {
    let tags = repo.tags()?;
    let ancestry: HashSet<String> = repo
        .commits_from_head()?
        .into_iter()
        .map(|c| c.hash)
        .collect();

    Ok(tags_and_versions(&tags, &settings.tag_format)
        .into_iter()
        .find(|(tag, _)| ancestry.contains(&tag.commit)))
}

/// Create the release tag at HEAD, plus partial tags when enabled, and push
///
/// Does nothing and returns `None` unless the plan's outcome is a release.
pub fn apply_release<R: Repository + ?Sized>(
    repo: &R,
    settings: &ReleaseSettings,
    plan: &ReleasePlan,
    push: bool,
) -> Result<Option<AppliedRelease>> {
    let version = match &plan.outcome {
        ReleaseOutcome::Release(version) => version,
        _ => return Ok(None),
    };
    let head = plan
        .head
        .as_deref()
        .ok_or_else(|| SemrelError::tag("Cannot tag a repository without commits"))?;

    let tag = settings.tag_format.render(version);
    repo.create_tag(&tag, head, false)?;
    info!(%tag, commit = head, "release tag created");

    let partial_tags = if settings.add_partial_tags {
        partial_tags_to_move(&plan.tags, &settings.tag_format, version)
    } else {
        Vec::new()
    };
    for partial in &partial_tags {
        repo.create_tag(partial, head, true)?;
        debug!(tag = %partial, "partial tag moved");
    }

    if push {
        repo.push_tags(&settings.remote, &[tag.as_str()], false)?;
        if !partial_tags.is_empty() {
            let names: Vec<&str> = partial_tags.iter().map(String::as_str).collect();
            repo.push_tags(&settings.remote, &names, true)?;
        }
        info!(remote = %settings.remote, "tags pushed");
    }

    Ok(Some(AppliedRelease {
        tag,
        partial_tags,
        pushed: push,
    }))
}

/// Process exit code for an outcome
pub fn exit_code(outcome: &ReleaseOutcome, strict: bool) -> i32 {
    match outcome {
        ReleaseOutcome::Release(_) => EXIT_SUCCESS,
        _ if strict => EXIT_NO_RELEASE,
        _ => EXIT_SUCCESS,
    }
}
