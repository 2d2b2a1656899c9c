//! Repository access layer
//!
//! The engine only ever reads three things from a repository: the commit
//! ancestry of HEAD in topological order, the tag list with each tag's target
//! commit, and the active branch name. Writes are limited to creating and
//! pushing tags once a release has been decided.
//!
//! - [repository::Git2Repository]: backed by the `git2` crate
//! - [mock::MockRepository]: in-memory linear history for tests
//!
//! ```rust
//! # use semrel::git::{MockRepository, Repository};
//! let mut repo = MockRepository::new();
//! repo.commit("feat: first");
//! repo.tag("v0.1.0");
//! assert_eq!(repo.tags().unwrap().len(), 1);
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{CommitRef, Tag};
use crate::error::Result;

/// Read/tag operations the release engine needs from a repository
///
/// Implementors must be `Send`; the engine drives a repository from one
/// thread. All reads are treated as one point-in-time snapshot for the
/// duration of an invocation.
pub trait Repository: Send {
    /// Every commit reachable from HEAD, most recent first, in topological order
    ///
    /// An unborn HEAD yields an empty list.
    fn commits_from_head(&self) -> Result<Vec<CommitRef>>;

    /// All tags with the commit they point at
    ///
    /// Annotated tags are peeled to their commit; tags on non-commit objects are
    /// left out.
    fn tags(&self) -> Result<Vec<Tag>>;

    /// Short name of the checked-out branch
    fn active_branch(&self) -> Result<String>;

    /// Create a lightweight tag at `commit`, replacing an existing one when `force`
    fn create_tag(&self, name: &str, commit: &str, force: bool) -> Result<()>;

    /// Push tags to `remote`; `force` allows moving tags that already exist there
    fn push_tags(&self, remote: &str, tag_names: &[&str], force: bool) -> Result<()>;
}
