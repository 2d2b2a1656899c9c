use crate::domain::prerelease::Prerelease;
use crate::error::{Result, SemrelError};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Tag template used when a version is not attached to a configured format
pub const DEFAULT_TAG_FORMAT: &str = "v{version}";

/// Magnitude of a version increment implied by a commit
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Major > Minor > Patch > PrereleaseRevision > NoRelease`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelBump {
    #[serde(alias = "none")]
    NoRelease,
    PrereleaseRevision,
    Patch,
    Minor,
    Major,
}

impl LevelBump {
    pub fn name(&self) -> &'static str {
        match self {
            LevelBump::NoRelease => "no_release",
            LevelBump::PrereleaseRevision => "prerelease_revision",
            LevelBump::Patch => "patch",
            LevelBump::Minor => "minor",
            LevelBump::Major => "major",
        }
    }
}

impl fmt::Display for LevelBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LevelBump {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "no_release" | "none" => Ok(LevelBump::NoRelease),
            "prerelease_revision" | "prerelease" => Ok(LevelBump::PrereleaseRevision),
            "patch" => Ok(LevelBump::Patch),
            "minor" => Ok(LevelBump::Minor),
            "major" => Ok(LevelBump::Major),
            other => Err(SemrelError::config(format!("Unknown bump level: '{}'", other))),
        }
    }
}

/// Semantic version with an optional prerelease marker and build metadata.
///
/// Build metadata and the tag template take no part in equality, hashing or
/// ordering, per semver precedence rules.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<Prerelease>,
    pub build_metadata: Option<String>,
    pub tag_format: String,
}

impl Version {
    /// Create a new release version rendered with the default tag format
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
            build_metadata: None,
            tag_format: DEFAULT_TAG_FORMAT.to_string(),
        }
    }

    /// Parse a bare semver string such as `1.2.3-rc.1+build.5`
    pub fn parse(s: &str) -> Result<Self> {
        let parsed = semver::Version::parse(s.trim())
            .map_err(|e| SemrelError::version(format!("Invalid version '{}': {}", s, e)))?;

        let prerelease = if parsed.pre.is_empty() {
            None
        } else {
            Some(Prerelease::parse(parsed.pre.as_str())?)
        };
        let build_metadata = if parsed.build.is_empty() {
            None
        } else {
            Some(parsed.build.to_string())
        };

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
            build_metadata,
            tag_format: DEFAULT_TAG_FORMAT.to_string(),
        })
    }

    pub fn with_tag_format(mut self, tag_format: impl Into<String>) -> Self {
        self.tag_format = tag_format.into();
        self
    }

    /// Attach build metadata; the only mutation allowed before a release is finalized
    pub fn with_build_metadata(mut self, build_metadata: impl Into<String>) -> Self {
        let build = build_metadata.into();
        self.build_metadata = if build.is_empty() { None } else { Some(build) };
        self
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    pub fn prerelease_token(&self) -> Option<&str> {
        self.prerelease.as_ref().map(|p| p.token.as_str())
    }

    pub fn prerelease_revision(&self) -> Option<u64> {
        self.prerelease.as_ref().and_then(|p| p.revision)
    }

    fn release(&self, major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
            build_metadata: None,
            tag_format: self.tag_format.clone(),
        }
    }

    /// Bump version according to level
    ///
    /// Patch/minor/major increments clear prerelease state and build metadata.
    /// `PrereleaseRevision` advances the revision of an existing prerelease; on a
    /// release version it starts an `rc.1` prerelease of the same numbers.
    pub fn bump(&self, level: LevelBump) -> Self {
        match level {
            LevelBump::NoRelease => self.clone(),
            LevelBump::PrereleaseRevision => {
                let token = self.prerelease_token().unwrap_or("rc").to_string();
                self.bump_prerelease_revision(&token)
            }
            LevelBump::Patch => self.release(self.major, self.minor, self.patch + 1),
            LevelBump::Minor => self.release(self.major, self.minor + 1, 0),
            LevelBump::Major => self.release(self.major + 1, 0, 0),
        }
    }

    /// Advance the prerelease revision for `token`
    ///
    /// Matching tokens increment the revision; otherwise the same numbers are
    /// re-marked with `token` at revision 1.
    pub fn bump_prerelease_revision(&self, token: &str) -> Self {
        match &self.prerelease {
            Some(pre) if pre.token == token => Version {
                prerelease: Some(pre.increment_revision()),
                build_metadata: None,
                ..self.clone()
            },
            _ => self.to_prerelease(token, Some(1)),
        }
    }

    /// Same major.minor.patch marked as a prerelease; revision defaults to 1
    pub fn to_prerelease(&self, token: &str, revision: Option<u64>) -> Self {
        Version {
            prerelease: Some(Prerelease::new(token, Some(revision.unwrap_or(1)))),
            build_metadata: None,
            ..self.clone()
        }
    }

    /// Strip the prerelease marker, keeping major.minor.patch
    pub fn finalize_version(&self) -> Self {
        self.release(self.major, self.minor, self.patch)
    }

    /// Largest component by which `self` differs from `older`
    pub fn difference(&self, older: &Version) -> LevelBump {
        if self.major != older.major {
            LevelBump::Major
        } else if self.minor != older.minor {
            LevelBump::Minor
        } else if self.patch != older.patch {
            LevelBump::Patch
        } else if self.prerelease != older.prerelease {
            LevelBump::PrereleaseRevision
        } else {
            LevelBump::NoRelease
        }
    }

    /// Render the version through its tag format
    pub fn as_tag(&self) -> String {
        self.tag_format.replace("{version}", &self.to_string())
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::new(0, 0, 0)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build_metadata {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert!(!v.is_prerelease());
    }

    #[test]
    fn test_version_parse_prerelease_and_build() {
        let v = Version::parse("1.2.3-rc.4+sha.abc").unwrap();
        assert_eq!(v.prerelease_token(), Some("rc"));
        assert_eq!(v.prerelease_revision(), Some(4));
        assert_eq!(v.build_metadata.as_deref(), Some("sha.abc"));
        assert_eq!(v.to_string(), "1.2.3-rc.4+sha.abc");
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("v1.2.3").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::parse("1.2.3-rc.1+b").unwrap();
        let bumped = v.bump(LevelBump::Major);
        assert_eq!(bumped, Version::new(2, 0, 0));
        assert!(bumped.build_metadata.is_none());
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(LevelBump::Minor), Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        let bumped = v.bump(LevelBump::Patch);
        assert_eq!(bumped.patch, v.patch + 1);
        assert_eq!((bumped.major, bumped.minor), (1, 2));
    }

    #[test]
    fn test_version_bump_no_release_is_identity() {
        let v = Version::parse("0.4.1-beta.2").unwrap();
        assert_eq!(v.bump(LevelBump::NoRelease), v);
    }

    #[test]
    fn test_bump_prerelease_revision() {
        let v = Version::parse("1.2.0-rc.1").unwrap();
        assert_eq!(v.bump(LevelBump::PrereleaseRevision).to_string(), "1.2.0-rc.2");
        assert_eq!(v.bump_prerelease_revision("rc").to_string(), "1.2.0-rc.2");
        assert_eq!(
            v.bump_prerelease_revision("beta").to_string(),
            "1.2.0-beta.1"
        );
        assert_eq!(
            Version::new(1, 2, 0).bump_prerelease_revision("alpha").to_string(),
            "1.2.0-alpha.1"
        );
    }

    #[test]
    fn test_to_prerelease_and_finalize() {
        let v = Version::new(2, 0, 0).to_prerelease("beta", None);
        assert_eq!(v.to_string(), "2.0.0-beta.1");
        assert_eq!(v.finalize_version(), Version::new(2, 0, 0));
        assert!(!v.finalize_version().is_prerelease());
    }

    #[test]
    fn test_equality_ignores_build_metadata() {
        let a = Version::parse("1.0.0+one").unwrap();
        let b = Version::parse("1.0.0+two").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_semver_precedence() {
        let ordered = [
            "0.9.9",
            "1.0.0-alpha.1",
            "1.0.0-alpha.2",
            "1.0.0-beta.1",
            "1.0.0-rc.1",
            "1.0.0-rc.10",
            "1.0.0",
            "1.0.1",
            "1.1.0",
            "2.0.0",
        ];
        let versions: Vec<Version> = ordered.iter().map(|s| Version::parse(s).unwrap()).collect();
        for pair in versions.windows(2) {
            assert!(pair[0] < pair[1], "{} should be < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_difference() {
        let base = Version::new(1, 2, 3);
        assert_eq!(Version::new(2, 0, 0).difference(&base), LevelBump::Major);
        assert_eq!(Version::new(1, 3, 0).difference(&base), LevelBump::Minor);
        assert_eq!(Version::new(1, 2, 4).difference(&base), LevelBump::Patch);
        assert_eq!(
            base.to_prerelease("rc", None).difference(&base),
            LevelBump::PrereleaseRevision
        );
        assert_eq!(base.difference(&base), LevelBump::NoRelease);
    }

    #[test]
    fn test_as_tag() {
        let v = Version::parse("1.2.3-rc.1").unwrap();
        assert_eq!(v.as_tag(), "v1.2.3-rc.1");
        assert_eq!(
            v.with_tag_format("release-{version}").as_tag(),
            "release-1.2.3-rc.1"
        );
    }

    #[test]
    fn test_level_bump_ordering_and_parse() {
        assert!(LevelBump::Major > LevelBump::Minor);
        assert!(LevelBump::Minor > LevelBump::Patch);
        assert!(LevelBump::Patch > LevelBump::PrereleaseRevision);
        assert!(LevelBump::PrereleaseRevision > LevelBump::NoRelease);
        assert_eq!("MINOR".parse::<LevelBump>().unwrap(), LevelBump::Minor);
        assert!("huge".parse::<LevelBump>().is_err());
    }

    #[test]
    fn test_version_serializes_as_string() {
        let v = Version::parse("3.1.0-beta.2").unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"3.1.0-beta.2\"");
    }
}
