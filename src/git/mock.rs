use crate::domain::{CommitRef, Tag};
use crate::error::{Result, SemrelError};
use crate::git::Repository;
use std::sync::Mutex;

/// In-memory repository with a linear history, for tests
///
/// Commits are appended oldest first and walked newest first. Tags created
/// through the [`Repository`] trait are recorded and visible to later reads.
pub struct MockRepository {
    commits: Vec<CommitRef>,
    tags: Mutex<Vec<Tag>>,
    pushed: Mutex<Vec<String>>,
    branch: String,
}

impl MockRepository {
    /// Create an empty repository on `main`
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
            branch: "main".to_string(),
        }
    }

    /// Append a commit and return its generated hash
    pub fn commit(&mut self, message: &str) -> String {
        let index = self.commits.len() as i64 + 1;
        let hash = format!("{:040x}", index);
        self.commits.push(
            CommitRef::new(hash.clone(), message)
                .with_author("Test Author")
                .with_timestamp(1_700_000_000 + index * 60),
        );
        hash
    }

    /// Append several commits in order
    pub fn commits(&mut self, messages: &[&str]) {
        for message in messages {
            self.commit(message);
        }
    }

    /// Tag the most recent commit
    pub fn tag(&mut self, name: &str) {
        if let Some(head) = self.commits.last() {
            let tag = Tag::new(name, head.hash.clone());
            self.tags_mut().push(tag);
        }
    }

    /// Tag an arbitrary commit
    pub fn tag_commit(&mut self, name: &str, hash: &str) {
        self.tags_mut().push(Tag::new(name, hash));
    }

    pub fn set_branch(&mut self, branch: &str) {
        self.branch = branch.to_string();
    }

    /// Hash of the most recent commit
    pub fn head(&self) -> Option<&str> {
        self.commits.last().map(|c| c.hash.as_str())
    }

    /// Tag names pushed so far, in push order
    pub fn pushed_tags(&self) -> Vec<String> {
        self.pushed.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        self.tags.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn commits_from_head(&self) -> Result<Vec<CommitRef>> {
        Ok(self.commits.iter().rev().cloned().collect())
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        let tags = self
            .tags
            .lock()
            .map_err(|_| SemrelError::tag("tag list lock poisoned"))?;
        Ok(tags.clone())
    }

    fn active_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn create_tag(&self, name: &str, commit: &str, force: bool) -> Result<()> {
        if !self.commits.iter().any(|c| c.hash == commit) {
            return Err(SemrelError::tag(format!("Cannot find object: {}", commit)));
        }

        let mut tags = self
            .tags
            .lock()
            .map_err(|_| SemrelError::tag("tag list lock poisoned"))?;
        match tags.iter().position(|t| t.name == name) {
            Some(_) if !force => Err(SemrelError::tag(format!(
                "Cannot create tag '{}': tag already exists",
                name
            ))),
            Some(index) => {
                tags[index] = Tag::new(name, commit);
                Ok(())
            }
            None => {
                tags.push(Tag::new(name, commit));
                Ok(())
            }
        }
    }

    fn push_tags(&self, _remote: &str, tag_names: &[&str], _force: bool) -> Result<()> {
        let mut pushed = self
            .pushed
            .lock()
            .map_err(|_| SemrelError::remote("push log lock poisoned"))?;
        pushed.extend(tag_names.iter().map(|t| t.to_string()));
        Ok(())
    }
}
