// Shared helpers for tests that need a real repository on disk
#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::path::Path;
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    counter: std::cell::Cell<u32>,
}

impl TestRepo {
    /// Fresh repository whose HEAD points at an unborn `main`
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.set_head("refs/heads/main").unwrap();
        TestRepo {
            dir,
            repo,
            counter: std::cell::Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn signature(&self) -> Signature<'static> {
        Signature::now("Test Author", "test@example.com").unwrap()
    }

    /// Commit on top of HEAD with a unique tree
    pub fn commit(&self, message: &str) -> Oid {
        let parents: Vec<Oid> = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap().id()],
            Err(_) => Vec::new(),
        };
        self.commit_with_parents(message, &parents)
    }

    /// Commit with explicit parents, advancing HEAD
    pub fn commit_with_parents(&self, message: &str, parents: &[Oid]) -> Oid {
        let n = self.counter.get() + 1;
        self.counter.set(n);

        let blob = self.repo.blob(format!("change {}\n", n).as_bytes()).unwrap();
        let mut builder = self.repo.treebuilder(None).unwrap();
        builder
            .insert(format!("file{}.txt", n), blob, 0o100644)
            .unwrap();
        let tree = self.repo.find_tree(builder.write().unwrap()).unwrap();

        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        let sig = self.signature();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    /// Commit on a side branch without moving HEAD
    pub fn commit_on(&self, branch: &str, message: &str, parent: Oid) -> Oid {
        let n = self.counter.get() + 1;
        self.counter.set(n);

        let blob = self.repo.blob(format!("side {}\n", n).as_bytes()).unwrap();
        let mut builder = self.repo.treebuilder(None).unwrap();
        builder
            .insert(format!("side{}.txt", n), blob, 0o100644)
            .unwrap();
        let tree = self.repo.find_tree(builder.write().unwrap()).unwrap();

        let parent = self.repo.find_commit(parent).unwrap();
        let sig = self.signature();
        self.repo
            .commit(
                Some(&format!("refs/heads/{}", branch)),
                &sig,
                &sig,
                message,
                &tree,
                &[&parent],
            )
            .unwrap()
    }

    pub fn lightweight_tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    pub fn annotated_tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo
            .tag(name, &object, &self.signature(), "release", false)
            .unwrap();
    }

    /// Point HEAD at another branch
    pub fn checkout_branch(&self, branch: &str, at: Oid) {
        let commit = self.repo.find_commit(at).unwrap();
        self.repo.branch(branch, &commit, true).unwrap();
        self.repo
            .set_head(&format!("refs/heads/{}", branch))
            .unwrap();
    }
}
