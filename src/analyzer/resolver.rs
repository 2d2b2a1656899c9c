use crate::domain::{Tag, TagFormat, Version};
use tracing::debug;

/// Release tags and their versions, newest version first
///
/// Tags that do not follow `format` are not release tags and are left out.
/// Several tags may resolve to the same version; their relative order is by
/// tag name so the result is deterministic.
pub fn tags_and_versions(tags: &[Tag], format: &TagFormat) -> Vec<(Tag, Version)> {
    let mut pairs: Vec<(Tag, Version)> = tags
        .iter()
        .filter_map(|tag| match format.parse_tag(&tag.name) {
            Some(version) => Some((tag.clone(), version)),
            None => {
                debug!(tag = %tag.name, format = format.template(), "not a release tag");
                None
            }
        })
        .collect();

    pairs.sort_by(|(a_tag, a), (b_tag, b)| b.cmp(a).then_with(|| a_tag.name.cmp(&b_tag.name)));
    pairs
}

/// Existing partial tags (`v1`, `v1.2`) paired with the newest release they cover
///
/// A partial tag covers the full, non-prerelease versions sharing its major
/// (and minor, when present). Partial tags with nothing to cover are dropped.
/// These pairs never feed version computation.
pub fn partial_tags_and_versions(tags: &[Tag], format: &TagFormat) -> Vec<(Tag, Version)> {
    let releases: Vec<Version> = tags_and_versions(tags, format)
        .into_iter()
        .map(|(_, version)| version)
        .filter(|version| !version.is_prerelease())
        .collect();

    tags.iter()
        .filter_map(|tag| {
            let (major, minor) = format.parse_partial_tag(&tag.name)?;
            let covered = releases
                .iter()
                .find(|v| v.major == major && minor.map_or(true, |m| v.minor == m))?;
            Some((tag.clone(), covered.clone()))
        })
        .collect()
}

/// Partial tag names that should point at `version` once it is released
///
/// Prereleases never move partial tags, and a partial tag already covering a
/// newer release than `version` stays where it is.
pub fn partial_tags_to_move(tags: &[Tag], format: &TagFormat, version: &Version) -> Vec<String> {
    if version.is_prerelease() {
        return Vec::new();
    }

    let existing = partial_tags_and_versions(tags, format);
    format
        .partial_tags(version)
        .into_iter()
        .filter(|name| {
            existing
                .iter()
                .find(|(tag, _)| &tag.name == name)
                .map_or(true, |(_, covered)| covered <= version)
        })
        .collect()
}
