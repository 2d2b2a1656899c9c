//! Domain logic - pure business rules independent of git operations

pub mod branch;
pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::{select_branch_options, BranchConfig};
pub use commit::{CommitRef, ParseError, ParseResult, ParsedCommit, UNKNOWN_TYPE};
pub use prerelease::Prerelease;
pub use tag::{Tag, TagFormat};
pub use version::{LevelBump, Version, DEFAULT_TAG_FORMAT};
