use crate::domain::version::Version;
use crate::error::{Result, SemrelError};
use regex::Regex;

const VERSION_PLACEHOLDER: &str = "{version}";

/// A git tag and the commit it points at (peeled through annotated tags)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
    pub commit: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit: commit.into(),
        }
    }
}

/// Tag naming template (e.g., "v{version}", "release-{version}")
///
/// Compiled once into matchers for full and partial (`v1`, `v1.2`) tags.
#[derive(Debug, Clone)]
pub struct TagFormat {
    template: String,
    full: Regex,
    partial: Regex,
}

impl TagFormat {
    /// Compile a tag template
    ///
    /// The template must contain exactly one `{version}` placeholder; anything
    /// else is a configuration error.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let parts: Vec<&str> = template.split(VERSION_PLACEHOLDER).collect();
        if parts.len() != 2 {
            return Err(SemrelError::config(format!(
                "Invalid tag format '{}': should have exactly one {{version}} placeholder",
                template
            )));
        }

        let prefix = regex::escape(parts[0]);
        let suffix = regex::escape(parts[1]);
        let compile = |body: &str| {
            Regex::new(&format!("^{}{}{}$", prefix, body, suffix)).map_err(|e| {
                SemrelError::config(format!("Invalid tag format '{}': {}", template, e))
            })
        };

        let full = compile(r"(?P<version>.+)")?;
        let partial = compile(r"(?P<major>\d+)(?:\.(?P<minor>\d+))?")?;

        Ok(TagFormat {
            template,
            full,
            partial,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Format a version according to the template
    /// Example: template="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn render(&self, version: &Version) -> String {
        self.template
            .replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    /// Parse a tag name back into a version carrying this template
    ///
    /// Returns `None` when the tag is not a release tag under this format.
    /// Versions with a component at `u64::MAX` cannot be bumped and are not
    /// treated as releases.
    pub fn parse_tag(&self, tag: &str) -> Option<Version> {
        let captures = self.full.captures(tag)?;
        let version = Version::parse(captures.name("version")?.as_str()).ok()?;
        if at_numeric_limit(&version) {
            return None;
        }
        Some(version.with_tag_format(self.template.clone()))
    }

    /// Partial tags for a release, e.g. `v1` and `v1.2` for `1.2.3`
    pub fn partial_tags(&self, version: &Version) -> Vec<String> {
        vec![
            self.template
                .replace(VERSION_PLACEHOLDER, &version.major.to_string()),
            self.template.replace(
                VERSION_PLACEHOLDER,
                &format!("{}.{}", version.major, version.minor),
            ),
        ]
    }

    /// Match a partial tag, returning its major and optional minor component
    pub fn parse_partial_tag(&self, tag: &str) -> Option<(u64, Option<u64>)> {
        let captures = self.partial.captures(tag)?;
        let major = captures.name("major")?.as_str().parse().ok()?;
        let minor = match captures.name("minor") {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some((major, minor))
    }
}

fn at_numeric_limit(version: &Version) -> bool {
    [version.major, version.minor, version.patch].contains(&u64::MAX)
        || version.prerelease_revision() == Some(u64::MAX)
}
