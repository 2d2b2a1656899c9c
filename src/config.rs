use crate::domain::{BranchConfig, Prerelease, TagFormat, DEFAULT_TAG_FORMAT};
use crate::error::{Result, SemrelError};
use crate::parser::{CommitParser, ParserRegistry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "semrel.toml";

/// Matches any semver string, used to recognise the tool's own release commits
const SEMVER_PATTERN: &str =
    r"(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?";

fn default_tag_format() -> String {
    DEFAULT_TAG_FORMAT.to_string()
}

fn default_commit_parser() -> String {
    "conventional".to_string()
}

fn default_commit_message() -> String {
    "{version}\n\nAutomatically generated by semrel".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_true() -> bool {
    true
}

fn default_prerelease_token() -> String {
    "rc".to_string()
}

fn default_branches() -> Vec<BranchGroup> {
    vec![BranchGroup {
        name: "main".to_string(),
        pattern: "(main|master)".to_string(),
        prerelease: false,
        prerelease_token: default_prerelease_token(),
    }]
}

/// Represents the complete configuration for semrel.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tag template with exactly one `{version}` placeholder
    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    /// Registered name of the commit parser
    #[serde(default = "default_commit_parser")]
    pub commit_parser: String,

    /// Options handed to the commit parser, validated by the parser itself
    #[serde(default)]
    pub commit_parser_options: toml::Table,

    /// Whether breaking changes bump the major version while it is 0
    #[serde(default = "default_true")]
    pub major_on_zero: bool,

    /// Whether versions below 1.0.0 may be released at all
    #[serde(default = "default_true")]
    pub allow_zero_version: bool,

    /// Maintain `v1` / `v1.2` style tags alongside full release tags
    #[serde(default)]
    pub add_partial_tags: bool,

    /// Message template of release commits, excluded from history
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Extra regexes matched at the start of the message; matching commits are
    /// left out of history
    #[serde(default)]
    pub exclude_commit_patterns: Vec<String>,

    /// Remote to push tags to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Release branch groups, first match wins
    #[serde(default = "default_branches")]
    pub branches: Vec<BranchGroup>,
}

/// One `[[branches]]` entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BranchGroup {
    pub name: String,

    #[serde(rename = "match")]
    pub pattern: String,

    #[serde(default)]
    pub prerelease: bool,

    #[serde(default = "default_prerelease_token")]
    pub prerelease_token: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_format: default_tag_format(),
            commit_parser: default_commit_parser(),
            commit_parser_options: toml::Table::new(),
            major_on_zero: true,
            allow_zero_version: true,
            add_partial_tags: false,
            commit_message: default_commit_message(),
            exclude_commit_patterns: Vec::new(),
            remote: default_remote(),
            branches: default_branches(),
        }
    }
}

/// Validated settings, compiled once before any repository access
pub struct ReleaseSettings {
    pub tag_format: TagFormat,
    pub parser: Box<dyn CommitParser>,
    pub branches: Vec<BranchConfig>,
    pub exclude_patterns: Vec<Regex>,
    pub major_on_zero: bool,
    pub allow_zero_version: bool,
    pub add_partial_tags: bool,
    pub remote: String,
}

impl std::fmt::Debug for ReleaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseSettings")
            .field("tag_format", &self.tag_format.template())
            .field("parser", &self.parser.name())
            .field("branches", &self.branches)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("major_on_zero", &self.major_on_zero)
            .field("allow_zero_version", &self.allow_zero_version)
            .field("add_partial_tags", &self.add_partial_tags)
            .field("remote", &self.remote)
            .finish()
    }
}

impl Config {
    /// Compile and check every setting using the built-in parsers
    pub fn validate(&self) -> Result<ReleaseSettings> {
        self.validate_with(&ParserRegistry::default())
    }

    /// Compile and check every setting, resolving the parser in `registry`
    ///
    /// All failures here are configuration errors.
    pub fn validate_with(&self, registry: &ParserRegistry) -> Result<ReleaseSettings> {
        let tag_format = TagFormat::new(self.tag_format.clone())?;
        let parser = registry.build(&self.commit_parser, &self.commit_parser_options)?;

        if self.branches.is_empty() {
            return Err(SemrelError::config("At least one branch group is required"));
        }
        let mut branches = Vec::with_capacity(self.branches.len());
        for group in &self.branches {
            if branches.iter().any(|b: &BranchConfig| b.name == group.name) {
                return Err(SemrelError::config(format!(
                    "Duplicate branch group '{}'",
                    group.name
                )));
            }
            validate_prerelease_token(&group.name, &group.prerelease_token)?;
            branches.push(BranchConfig::new(
                group.name.clone(),
                &group.pattern,
                group.prerelease,
                group.prerelease_token.clone(),
            )?);
        }

        let mut exclude_patterns = vec![self.release_commit_pattern()?];
        for pattern in &self.exclude_commit_patterns {
            let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
                SemrelError::config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            exclude_patterns.push(regex);
        }

        if self.remote.trim().is_empty() {
            return Err(SemrelError::config("Remote name cannot be empty"));
        }

        debug!(
            parser = parser.name(),
            tag_format = %self.tag_format,
            branches = branches.len(),
            excludes = exclude_patterns.len(),
            "configuration validated"
        );

        Ok(ReleaseSettings {
            tag_format,
            parser,
            branches,
            exclude_patterns,
            major_on_zero: self.major_on_zero,
            allow_zero_version: self.allow_zero_version,
            add_partial_tags: self.add_partial_tags,
            remote: self.remote.clone(),
        })
    }

    /// Regex matching the commits this tool creates for a release
    fn release_commit_pattern(&self) -> Result<Regex> {
        let escaped = regex::escape(self.commit_message.trim());
        let pattern = escaped.replace(&regex::escape("{version}"), SEMVER_PATTERN);
        Regex::new(&format!("^{}", pattern)).map_err(|e| {
            SemrelError::config(format!(
                "Invalid commit message template '{}': {}",
                self.commit_message, e
            ))
        })
    }
}

fn validate_prerelease_token(group: &str, token: &str) -> Result<()> {
    match Prerelease::parse(token) {
        Ok(pre) if pre.revision.is_none() => Ok(()),
        _ => Err(SemrelError::config(format!(
            "Invalid prerelease token '{}' for branch group '{}'",
            token, group
        ))),
    }
}

/// Path of the configuration file that [`load_config`] would read
pub fn find_config_file(config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semrel.toml` in current directory
/// 3. `semrel.toml` in user config directory
/// 4. Default configuration if no file found
///
/// An explicit path that cannot be read is an error; a file that is present
/// but malformed is always an error.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match find_config_file(config_path) {
        Some(path) => path,
        None => {
            debug!("no configuration file found, using defaults");
            return Ok(Config::default());
        }
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        SemrelError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "configuration loaded");

    let config: Config = toml::from_str(&content)?;
    Ok(config)
}
