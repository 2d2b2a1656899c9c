//! Terminal presentation, styled with `console`.

pub mod formatter;

pub use formatter::{
    display_applied, display_error, display_outcome, display_proposed_tag, display_status,
    display_success, display_unreleased, format_outcome, format_proposed_tag, format_unreleased,
};

