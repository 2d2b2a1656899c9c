use crate::error::{Result, SemrelError};
use regex::Regex;
use tracing::debug;

/// Release settings for the branches matched by one configured group
#[derive(Debug, Clone)]
pub struct BranchConfig {
    /// Group name from configuration
    pub name: String,
    /// Pattern anchored at the start of the branch name
    pub pattern: Regex,
    /// Whether releases from these branches are prereleases
    pub prerelease: bool,
    /// Token for prerelease versions, e.g. "rc"
    pub prerelease_token: String,
}

impl BranchConfig {
    /// Create a branch group, compiling its match pattern
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        prerelease: bool,
        prerelease_token: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let anchored = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
            SemrelError::config(format!(
                "Invalid match pattern '{}' for branch group '{}': {}",
                pattern, name, e
            ))
        })?;

        Ok(BranchConfig {
            name,
            pattern: anchored,
            prerelease,
            prerelease_token: prerelease_token.into(),
        })
    }

    /// Check if the group applies to a branch
    pub fn matches(&self, branch: &str) -> bool {
        self.pattern.is_match(branch)
    }
}

/// Select the release settings for the active branch
///
/// Groups are tried in declared order and the first match wins. A branch no
/// group matches is not a release branch.
pub fn select_branch_options<'a>(
    groups: &'a [BranchConfig],
    active_branch: &str,
) -> Result<&'a BranchConfig> {
    for group in groups {
        if group.matches(active_branch) {
            debug!(group = %group.name, branch = active_branch, "branch matched release group");
            return Ok(group);
        }
    }

    Err(SemrelError::NotReleaseBranch(active_branch.to_string()))
}
