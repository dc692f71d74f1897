//! Git-backed snapshots
//!
//! [`GitProvider`] fetches a repository with `git2` into a bare clone in a
//! temporary directory. The clone is owned by the returned [`GitSnapshot`] and
//! removed when the snapshot is dropped, so nothing outlives the run.
//!
//! Authentication is delegated to what the user already has configured:
//! - SSH keys loaded in `ssh-agent`
//! - Git credential helpers for HTTPS remotes

use std::path::Path;

use git2::build::RepoBuilder;
use git2::{
    AutotagOption, Cred, CredentialType, ErrorClass, ErrorCode, FetchOptions, ObjectType, Oid,
    RemoteCallbacks, Repository, TreeWalkMode, TreeWalkResult,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::snapshot::{
    AnnotatedTag, Commit, CommitId, Credentials, ObjectId, Reference, Snapshot, SnapshotProvider,
};
use crate::tree::{FileMode, Tree};

/// Credential callbacks are retried at most this many times per fetch.
const MAX_AUTH_ATTEMPTS: usize = 3;

/// Fetches repositories with libgit2
#[derive(Debug, Clone, Default)]
pub struct GitProvider {
    show_progress: bool,
}

impl GitProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a transfer progress bar on stderr while fetching.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, url: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30}] {pos}/{len} objects")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(format!("Fetching {}", url));
        bar
    }
}

impl SnapshotProvider for GitProvider {
    type Snapshot = GitSnapshot;

    fn fetch(&self, url: &str, credentials: &Credentials) -> Result<GitSnapshot> {
        let dir = tempfile::Builder::new()
            .prefix("apideps-")
            .tempdir()
            .map_err(|e| Error::Fetch {
                url: url.to_string(),
                message: format!("cannot create clone directory: {}", e),
                hint: None,
            })?;

        let bar = self.progress_bar(url);
        let mut callbacks = RemoteCallbacks::new();

        let ssh_user = credentials.ssh_user.clone();
        let mut attempts = 0;
        callbacks.credentials(move |remote_url, username_from_url, allowed| {
            attempts += 1;
            if attempts > MAX_AUTH_ATTEMPTS {
                return Err(git2::Error::from_str("authentication failed"));
            }
            let user = username_from_url.unwrap_or(ssh_user.as_str());
            if allowed.contains(CredentialType::USERNAME) {
                Cred::username(user)
            } else if allowed.contains(CredentialType::SSH_KEY) {
                Cred::ssh_key_from_agent(user)
            } else if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                let config = git2::Config::open_default()?;
                Cred::credential_helper(&config, remote_url, username_from_url)
            } else {
                Cred::default()
            }
        });

        let progress = bar.clone();
        callbacks.transfer_progress(move |stats| {
            progress.set_length(stats.total_objects() as u64);
            progress.set_position(stats.received_objects() as u64);
            true
        });

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);
        fetch_options.download_tags(AutotagOption::All);

        let result = RepoBuilder::new()
            .bare(true)
            .fetch_options(fetch_options)
            .clone(url, dir.path());
        bar.finish_and_clear();

        let repo = result.map_err(|e| fetch_error(url, &e))?;
        debug!("cloned {} into {}", url, dir.path().display());

        Ok(GitSnapshot {
            url: url.to_string(),
            repo,
            _clone_dir: Some(dir),
        })
    }
}

fn fetch_error(url: &str, err: &git2::Error) -> Error {
    let auth = err.code() == ErrorCode::Auth
        || err.class() == ErrorClass::Ssh
        || err.message().contains("authentication");
    let hint = auth.then(|| {
        "make sure you have access to the repository: add your SSH key to ssh-agent, \
         pass --ssh-user if the address has no user, or configure a git credential helper"
            .to_string()
    });
    Error::Fetch {
        url: url.to_string(),
        message: err.message().to_string(),
        hint,
    }
}

/// A bare clone of one repository
pub struct GitSnapshot {
    url: String,
    repo: Repository,
    /// Removed on drop; `None` for repositories opened in place
    _clone_dir: Option<TempDir>,
}

impl GitSnapshot {
    /// Open an existing repository in place instead of cloning it.
    pub fn open(path: &Path) -> Result<GitSnapshot> {
        let url = path.display().to_string();
        let repo = Repository::open(path).map_err(|e| fetch_error(&url, &e))?;
        Ok(GitSnapshot {
            url,
            repo,
            _clone_dir: None,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn load_error(id: &str, err: &git2::Error) -> Error {
        Error::Load {
            commit: id.to_string(),
            message: err.message().to_string(),
        }
    }
}

impl Snapshot for GitSnapshot {
    fn head(&self) -> Result<Reference> {
        let head_error = |e: git2::Error| Error::HeadRef {
            url: self.url.clone(),
            message: e.message().to_string(),
        };
        let head = self.repo.head().map_err(head_error)?;
        let target = head.peel_to_commit().map_err(head_error)?.id();
        Ok(Reference {
            name: head.name().unwrap_or("HEAD").to_string(),
            target: ObjectId::new(&target.to_string()),
        })
    }

    fn find_tag(&self, name: &str) -> Result<Option<ObjectId>> {
        let refname = format!("refs/tags/{}", name);
        let reference = match self.repo.find_reference(&refname) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Resolution {
                    message: format!("could not resolve tag name: {}, with error: {}", name, e),
                })
            }
        };
        let target = reference
            .resolve()
            .ok()
            .and_then(|r| r.target())
            .ok_or_else(|| Error::Resolution {
                message: format!("tag {} does not point at an object", name),
            })?;
        Ok(Some(ObjectId::new(&target.to_string())))
    }

    fn tag_object(&self, id: &ObjectId) -> Result<Option<AnnotatedTag>> {
        let Ok(oid) = Oid::from_str(id.as_str()) else {
            return Ok(None);
        };
        let object = match self.repo.find_object(oid, None) {
            Ok(object) => object,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(Self::load_error(id.as_str(), &e)),
        };
        if object.kind() != Some(ObjectType::Tag) {
            return Ok(None);
        }
        Ok(object.as_tag().map(|tag| AnnotatedTag {
            id: id.clone(),
            name: tag.name().unwrap_or_default().to_string(),
            target: ObjectId::new(&tag.target_id().to_string()),
        }))
    }

    fn commit(&self, id: &CommitId) -> Result<Commit> {
        let commit = self
            .repo
            .find_commit_by_prefix(id.as_str())
            .map_err(|e| Self::load_error(id.as_str(), &e))?;
        Ok(Commit {
            id: ObjectId::new(&commit.id().to_string()),
            tree: ObjectId::new(&commit.tree_id().to_string()),
            summary: commit.summary().unwrap_or_default().to_string(),
        })
    }

    fn tree(&self, commit: &Commit) -> Result<Tree> {
        let id = commit.id.as_str();
        let git_tree = Oid::from_str(commit.tree.as_str())
            .and_then(|oid| self.repo.find_tree(oid))
            .map_err(|e| Self::load_error(id, &e))?;

        let mut tree = Tree::new();
        let mut failure = None;
        let walked = git_tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            // Subtrees are walked into; gitlinks have no content here.
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            let Some(name) = entry.name() else {
                failure = Some(git2::Error::from_str(&format!(
                    "file name in {} is not valid UTF-8: {}",
                    if root.is_empty() { "." } else { root },
                    String::from_utf8_lossy(entry.name_bytes())
                )));
                return TreeWalkResult::Abort;
            };
            match entry.to_object(&self.repo).and_then(|o| o.peel_to_blob()) {
                Ok(blob) => {
                    tree.insert(
                        &format!("{}{}", root, name),
                        blob.content(),
                        FileMode::from_raw(entry.filemode() as u32),
                    );
                    TreeWalkResult::Ok
                }
                Err(e) => {
                    failure = Some(e);
                    TreeWalkResult::Abort
                }
            }
        });

        if let Some(e) = failure {
            return Err(Self::load_error(id, &e));
        }
        walked.map_err(|e| Self::load_error(id, &e))?;
        debug!("loaded {} files from tree {}", tree.len(), commit.tree.short());
        Ok(tree)
    }
}
