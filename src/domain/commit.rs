use crate::domain::version::LevelBump;
use serde::Serialize;

/// Type label given to commits that no parser could classify
pub const UNKNOWN_TYPE: &str = "unknown";

/// A commit as read from the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRef {
    /// Full commit hash
    pub hash: String,
    /// Raw commit message
    pub message: String,
    /// Author name
    pub author: String,
    /// Commit time, seconds since the unix epoch
    pub timestamp: i64,
}

impl CommitRef {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        CommitRef {
            hash: hash.into(),
            message: message.into(),
            author: String::new(),
            timestamp: 0,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn short_hash(&self) -> &str {
        if self.hash.len() > 7 {
            &self.hash[..7]
        } else {
            &self.hash
        }
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// A commit classified by a commit parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommit {
    pub bump: LevelBump,
    pub r#type: String,
    pub scope: String,
    pub descriptions: Vec<String>,
    pub breaking_descriptions: Vec<String>,
    pub release_notices: Vec<String>,
    pub commit: CommitRef,
}

impl ParsedCommit {
    pub fn is_breaking(&self) -> bool {
        !self.breaking_descriptions.is_empty()
    }
}

/// A commit the parser could not classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub commit: CommitRef,
    pub error: String,
}

/// Outcome of parsing one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseResult {
    Parsed(ParsedCommit),
    Error(ParseError),
}

impl ParseResult {
    pub fn commit(&self) -> &CommitRef {
        match self {
            ParseResult::Parsed(parsed) => &parsed.commit,
            ParseResult::Error(err) => &err.commit,
        }
    }

    /// Bump implied by the commit; parse errors never release
    pub fn bump(&self) -> LevelBump {
        match self {
            ParseResult::Parsed(parsed) => parsed.bump,
            ParseResult::Error(_) => LevelBump::NoRelease,
        }
    }

    /// Bucket label used when grouping release history
    pub fn type_label(&self) -> &str {
        match self {
            ParseResult::Parsed(parsed) => &parsed.r#type,
            ParseResult::Error(_) => UNKNOWN_TYPE,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ParseResult::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(bump: LevelBump, kind: &str) -> ParseResult {
        ParseResult::Parsed(ParsedCommit {
            bump,
            r#type: kind.to_string(),
            scope: String::new(),
            descriptions: vec!["subject".to_string()],
            breaking_descriptions: Vec::new(),
            release_notices: Vec::new(),
            commit: CommitRef::new("abc1234def", "feat: subject"),
        })
    }

    #[test]
    fn test_parsed_accessors() {
        let result = parsed(LevelBump::Minor, "feature");
        assert_eq!(result.bump(), LevelBump::Minor);
        assert_eq!(result.type_label(), "feature");
        assert!(!result.is_error());
    }

    #[test]
    fn test_error_is_unknown_and_does_not_release() {
        let result = ParseResult::Error(ParseError {
            commit: CommitRef::new("abc", "random text"),
            error: "Unable to parse".to_string(),
        });
        assert_eq!(result.type_label(), UNKNOWN_TYPE);
        assert_eq!(result.bump(), LevelBump::NoRelease);
        assert_eq!(result.commit().message, "random text");
    }

    #[test]
    fn test_commit_ref_helpers() {
        let commit = CommitRef::new("0123456789abcdef", "fix: a\n\nbody")
            .with_author("Dev")
            .with_timestamp(42);
        assert_eq!(commit.short_hash(), "0123456");
        assert_eq!(commit.subject(), "fix: a");
        assert_eq!(commit.author, "Dev");
        assert_eq!(commit.timestamp, 42);
    }
}
