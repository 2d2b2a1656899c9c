use crate::domain::{CommitRef, Tag};
use crate::error::{Result, SemrelError};
use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn commits_from_head(&self) -> Result<Vec<CommitRef>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;

        match revwalk.push_head() {
            Ok(()) => {}
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn, no history to walk");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            let author = commit.author().name().unwrap_or("unknown").to_string();

            commits.push(
                CommitRef::new(commit.id().to_string(), message)
                    .with_author(author)
                    .with_timestamp(commit.time().seconds()),
            );
        }

        Ok(commits)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            match reference.peel_to_commit() {
                Ok(commit) => tags.push(Tag::new(name, commit.id().to_string())),
                Err(e) => debug!(tag = name, error = %e, "tag does not point at a commit"),
            }
        }

        Ok(tags)
    }

    fn active_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(|s| s.to_string())
                .ok_or_else(|| SemrelError::branch("Branch name is not valid UTF-8")),
            Ok(_) => Err(SemrelError::branch(
                "HEAD is detached; check out a branch to release from",
            )),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(|s| s.to_string())
                    .ok_or_else(|| SemrelError::branch("Cannot resolve unborn branch name"))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, commit: &str, force: bool) -> Result<()> {
        let oid = Oid::from_str(commit)
            .map_err(|e| SemrelError::tag(format!("Invalid commit id '{}': {}", commit, e)))?;
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| SemrelError::tag(format!("Cannot find object: {}", e)))?;

        self.repo
            .tag_lightweight(name, &object, force)
            .map_err(|e| SemrelError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        debug!(tag = name, commit, force, "tag created");
        Ok(())
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str], force: bool) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| SemrelError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let prefix = if force { "+" } else { "" };
        let refspecs: Vec<String> = tag_names
            .iter()
            .map(|tag| format!("{}refs/tags/{}:refs/tags/{}", prefix, tag, tag))
            .collect();

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(Self::remote_callbacks());

        remote_handle
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| {
                warn!(remote, error = %e, "push failed");
                match e.class() {
                    git2::ErrorClass::Net => {
                        SemrelError::remote(format!("Network error during push: {}", e))
                    }
                    _ => SemrelError::remote(format!("Push to '{}' failed: {}", remote, e)),
                }
            })?;

        Ok(())
    }
}
