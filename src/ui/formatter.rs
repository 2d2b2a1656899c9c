//! Formatting functions for terminal output.
//!
//! `format_*` functions build styled strings and are testable on their own;
//! `display_*` functions print them. Everything goes to stderr because stdout
//! carries the values requested with the `--print*` flags.

use crate::analyzer::{ReleaseHistory, ReleaseOutcome};
use crate::cli::AppliedRelease;
use console::style;

/// Commits listed per type before the rest are summarised
const MAX_LISTED_COMMITS: usize = 10;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// One line describing a release decision
pub fn format_outcome(outcome: &ReleaseOutcome) -> String {
    match outcome {
        ReleaseOutcome::Release(_) => format!("{} {}", style("✓").green(), outcome),
        _ => format!("{} {}", style("!").yellow().bold(), outcome),
    }
}

pub fn display_outcome(outcome: &ReleaseOutcome) {
    eprintln!("{}", format_outcome(outcome));
}

/// Display the proposed tag change (or initial tag).
///
/// # Arguments
/// * `old_tag` - Last release tag (None if this is the first release)
/// * `new_tag` - The tag about to be created
pub fn format_proposed_tag(old_tag: Option<&str>, new_tag: &str) -> String {
    match old_tag {
        Some(old) => format!(
            "{}\n  From: {}\n  To:   {}",
            style("Proposed Tag Change:").bold(),
            style(old).red(),
            style(new_tag).green()
        ),
        None => format!(
            "{}\n  New tag: {}",
            style("Initial Tag:").bold(),
            style(new_tag).green()
        ),
    }
}

pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    eprintln!("\n{}", format_proposed_tag(old_tag, new_tag));
}

/// Summarise the unreleased commits of a history, grouped by type.
///
/// Shows at most ten subjects per type and counts the rest.
pub fn format_unreleased(history: &ReleaseHistory, branch: &str) -> String {
    let mut out = format!(
        "{} ({} commits)",
        style(format!("Unreleased changes on '{}'", branch)).bold(),
        history.unreleased_count()
    );

    for (commit_type, results) in &history.unreleased {
        out.push_str(&format!("\n  {}", style(commit_type).underlined()));
        for result in results.iter().take(MAX_LISTED_COMMITS) {
            let commit = result.commit();
            out.push_str(&format!(
                "\n    {} {}",
                style(commit.short_hash()).dim(),
                commit.subject()
            ));
        }
        if results.len() > MAX_LISTED_COMMITS {
            out.push_str(&format!(
                "\n    ... and {} more",
                results.len() - MAX_LISTED_COMMITS
            ));
        }
    }
    out
}

pub fn display_unreleased(history: &ReleaseHistory, branch: &str) {
    eprintln!("\n{}", format_unreleased(history, branch));
}

/// Report the tags written for a release
pub fn display_applied(applied: &AppliedRelease, remote: &str) {
    display_success(&format!("Created tag: {}", applied.tag));
    for partial in &applied.partial_tags {
        display_success(&format!("Moved tag: {}", partial));
    }

    if applied.pushed {
        display_success(&format!("Pushed tags to '{}'", remote));
    } else {
        display_status(&format!(
            "Tag created locally. Push it with: git push {} {}",
            remote, applied.tag
        ));
    }
}
