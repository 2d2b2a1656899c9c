//! Analysis engine: release tags, release history and the next version

pub mod history;
pub mod next_version;
pub mod resolver;

pub use history::{CommitsByType, Release, ReleaseHistory};
pub use next_version::{next_version, next_version_from_history, ReleaseOutcome, VersionPolicy};
pub use resolver::{partial_tags_and_versions, partial_tags_to_move, tags_and_versions};
