use thiserror::Error;

/// Unified error type for semrel operations
#[derive(Error, Debug)]
pub enum SemrelError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Commit parser error: {0}")]
    Parser(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Branch '{0}' is not a release branch")]
    NotReleaseBranch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in semrel
pub type Result<T> = std::result::Result<T, SemrelError>;

impl SemrelError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemrelError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemrelError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        SemrelError::Tag(msg.into())
    }

    /// Create a commit parser error with context
    pub fn parser(msg: impl Into<String>) -> Self {
        SemrelError::Parser(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        SemrelError::Branch(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        SemrelError::Remote(msg.into())
    }

    /// True for failures caused by invalid settings rather than repository state.
    ///
    /// These abort before any history walk and map to exit code 1.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SemrelError::Config(_) | SemrelError::Parser(_) | SemrelError::Toml(_)
        )
    }
}
