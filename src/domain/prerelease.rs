//! Prerelease markers for semantic versions
//!
//! A prerelease is a stability token (`alpha`, `beta`, `rc`, or anything
//! matching semver identifier rules) with an optional numeric revision.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{Result, SemrelError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Prerelease token plus revision, e.g. `rc.2`
///
/// # Examples
/// - "alpha" -> Prerelease { token: "alpha", revision: None }
/// - "beta.1" -> Prerelease { token: "beta", revision: Some(1) }
/// - "dev.build.3" -> Prerelease { token: "dev.build", revision: Some(3) }
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prerelease {
    /// The stability label
    pub token: String,
    /// Revision counter within the token, starting at 1
    pub revision: Option<u64>,
}

impl Prerelease {
    /// Create a new prerelease marker
    pub fn new(token: impl Into<String>, revision: Option<u64>) -> Self {
        Prerelease {
            token: token.into(),
            revision,
        }
    }

    /// Parse a prerelease marker such as "rc.1"
    ///
    /// The trailing dot-separated numeric identifier, if any, is the revision;
    /// everything before it is the token.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Next revision under the same token; a missing revision counts as 0
    pub fn increment_revision(&self) -> Self {
        Prerelease {
            token: self.token.clone(),
            revision: Some(self.revision.unwrap_or(0) + 1),
        }
    }
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token.split('.').all(|ident| {
            !ident.is_empty() && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

impl FromStr for Prerelease {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SemrelError::version("Empty prerelease identifier"));
        }

        let (token, revision) = match s.rsplit_once('.') {
            Some((token, rev)) if !rev.is_empty() && rev.chars().all(|c| c.is_ascii_digit()) => {
                let revision = rev.parse::<u64>().map_err(|_| {
                    SemrelError::version(format!("Invalid prerelease revision: '{}'", rev))
                })?;
                (token, Some(revision))
            }
            _ => (s, None),
        };

        if !is_valid_token(token) {
            return Err(SemrelError::version(format!(
                "Invalid prerelease identifier: '{}'",
                s
            )));
        }

        Ok(Prerelease::new(token, revision))
    }
}

impl PartialOrd for Prerelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Prerelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.token
            .cmp(&other.token)
            .then_with(|| self.revision.cmp(&other.revision))
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)?;
        if let Some(rev) = self.revision {
            write!(f, ".{}", rev)?;
        }
        Ok(())
    }
}
