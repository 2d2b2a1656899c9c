// tests/git_history_test.rs
mod common;

use common::TestRepo;
use semrel::analyzer::{next_version, ReleaseHistory, ReleaseOutcome, VersionPolicy};
use semrel::config::Config;
use semrel::domain::{LevelBump, Version};
use semrel::git::{Git2Repository, Repository};
use std::collections::HashSet;

fn open(test: &TestRepo) -> Git2Repository {
    Git2Repository::open(test.path()).unwrap()
}

#[test]
fn test_walk_is_newest_first() {
    let test = TestRepo::new();
    let a = test.commit("feat: a");
    let b = test.commit("fix: b");
    let c = test.commit("docs: c");

    let commits = open(&test).commits_from_head().unwrap();
    let hashes: Vec<String> = commits.iter().map(|c| c.hash.clone()).collect();
    assert_eq!(hashes, vec![c.to_string(), b.to_string(), a.to_string()]);
    assert_eq!(commits[0].author, "Test Author");
    assert_eq!(commits[1].subject(), "fix: b");
}

#[test]
fn test_active_branch() {
    let test = TestRepo::new();
    let base = test.commit("feat: a");
    assert_eq!(open(&test).active_branch().unwrap(), "main");

    test.checkout_branch("release/2.x", base);
    assert_eq!(open(&test).active_branch().unwrap(), "release/2.x");
}

#[test]
fn test_annotated_tags_peel_to_commit() {
    let test = TestRepo::new();
    let first = test.commit("feat: a");
    let second = test.commit("fix: b");
    test.annotated_tag("v1.0.0", first);
    test.lightweight_tag("v1.0.1", second);

    let mut tags = open(&test).tags().unwrap();
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].name, "v1.0.0");
    assert_eq!(tags[0].commit, first.to_string());
    assert_eq!(tags[1].commit, second.to_string());
}

#[test]
fn test_merged_branch_commits_are_unreleased() {
    let test = TestRepo::new();
    let base = test.commit("feat: initial");
    test.lightweight_tag("v1.0.0", base);

    let side = test.commit_on("feature", "fix: from the side branch", base);
    let main = test.commit("feat: on main");
    test.commit_with_parents("Merge branch 'feature'", &[main, side]);

    let settings = Config::default().validate().unwrap();
    let repo = open(&test);
    let history = ReleaseHistory::from_git_history(
        &repo,
        &settings.tag_format,
        settings.parser.as_ref(),
        &settings.exclude_patterns,
    )
    .unwrap();

    assert_eq!(history.released.len(), 1);
    assert_eq!(history.released[0].version, Version::new(1, 0, 0));
    assert_eq!(history.released[0].len(), 1);
    assert_eq!(history.unreleased_count(), 3);
    assert_eq!(history.unreleased["unknown"].len(), 1);
    assert_eq!(history.unreleased_level(), LevelBump::Minor);

    // every ancestor lands in exactly one bucket
    let walked: Vec<String> = history.commits().map(|c| c.hash.clone()).collect();
    let unique: HashSet<&String> = walked.iter().collect();
    assert_eq!(walked.len(), 4);
    assert_eq!(unique.len(), 4);
}

#[test]
fn test_next_version_from_real_repository() {
    let test = TestRepo::new();
    let base = test.commit("feat: a");
    test.annotated_tag("v0.1.0", base);
    test.commit("fix: a");
    test.commit("feat: b");

    let settings = Config::default().validate().unwrap();
    let outcome = next_version(
        &open(&test),
        &settings.tag_format,
        settings.parser.as_ref(),
        &settings.exclude_patterns,
        &VersionPolicy::default(),
    )
    .unwrap();

    assert_eq!(outcome, ReleaseOutcome::Release(Version::new(0, 2, 0)));
}

#[test]
fn test_unreachable_tags_stay_out_of_history() {
    let test = TestRepo::new();
    let base = test.commit("feat: a");
    test.lightweight_tag("v1.0.0", base);
    let side = test.commit_on("hotfix", "fix: elsewhere", base);
    test.lightweight_tag("v1.0.1", side);
    test.commit("fix: here");

    let settings = Config::default().validate().unwrap();
    let repo = open(&test);
    let history = ReleaseHistory::from_git_history(
        &repo,
        &settings.tag_format,
        settings.parser.as_ref(),
        &settings.exclude_patterns,
    )
    .unwrap();

    assert_eq!(history.released.len(), 1);
    assert_eq!(history.unreleased_count(), 1);

    // versions are computed from every release tag, reachable or not
    let outcome = next_version(
        &repo,
        &settings.tag_format,
        settings.parser.as_ref(),
        &settings.exclude_patterns,
        &VersionPolicy::default(),
    )
    .unwrap();
    assert_eq!(outcome, ReleaseOutcome::Release(Version::new(1, 0, 2)));
}

#[test]
fn test_create_tag_points_at_commit() {
    let test = TestRepo::new();
    let head = test.commit("feat: a");

    let repo = open(&test);
    repo.create_tag("v0.1.0", &head.to_string(), false).unwrap();
    assert!(repo.create_tag("v0.1.0", &head.to_string(), false).is_err());
    repo.create_tag("v0.1.0", &head.to_string(), true).unwrap();

    let reference = test.repo.find_reference("refs/tags/v0.1.0").unwrap();
    assert_eq!(reference.peel_to_commit().unwrap().id(), head);
}

#[test]
fn test_push_tags_to_local_remote() {
    let test = TestRepo::new();
    let head = test.commit("feat: a");

    let remote_dir = tempfile::TempDir::new().unwrap();
    let bare = git2::Repository::init_bare(remote_dir.path()).unwrap();
    test.repo
        .remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    let repo = open(&test);
    repo.create_tag("v0.1.0", &head.to_string(), false).unwrap();
    repo.push_tags("origin", &["v0.1.0"], false).unwrap();

    let pushed = bare.find_reference("refs/tags/v0.1.0").unwrap();
    assert_eq!(pushed.target(), Some(head));
}

#[test]
fn test_push_to_unknown_remote_fails() {
    let test = TestRepo::new();
    let head = test.commit("feat: a");
    let repo = open(&test);
    repo.create_tag("v0.1.0", &head.to_string(), false).unwrap();

    assert!(repo.push_tags("nowhere", &["v0.1.0"], false).is_err());
}
