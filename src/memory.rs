//! In-memory snapshots
//!
//! [`MemoryProvider`] serves [`MemorySnapshot`]s registered up front, and
//! records every fetch so callers can check how often a repository was
//! actually requested.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::snapshot::{
    AnnotatedTag, Commit, CommitId, Credentials, ObjectId, Reference, Snapshot, SnapshotProvider,
};
use crate::tree::Tree;

/// An in-memory repository object graph
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    head: Option<Reference>,
    tags: HashMap<String, ObjectId>,
    tag_objects: HashMap<ObjectId, AnnotatedTag>,
    commits: HashMap<ObjectId, (Commit, Tree)>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit with the given tree. The first commit added becomes
    /// `HEAD` on `refs/heads/main` unless [`Self::with_head`] is used.
    pub fn with_commit(mut self, id: &str, tree: Tree) -> Self {
        let id = ObjectId::new(id);
        let commit = Commit {
            id: id.clone(),
            tree: ObjectId::new(&format!("tree-{}", id)),
            summary: String::new(),
        };
        if self.head.is_none() {
            self.head = Some(Reference {
                name: "refs/heads/main".to_string(),
                target: id.clone(),
            });
        }
        self.commits.insert(id, (commit, tree));
        self
    }

    /// Point `HEAD` at a commit.
    pub fn with_head(mut self, branch: &str, commit: &str) -> Self {
        self.head = Some(Reference {
            name: format!("refs/heads/{}", branch),
            target: ObjectId::new(commit),
        });
        self
    }

    /// A tag ref pointing straight at a commit.
    pub fn with_lightweight_tag(mut self, name: &str, commit: &str) -> Self {
        self.tags.insert(name.to_string(), ObjectId::new(commit));
        self
    }

    /// A tag ref pointing at an annotated tag object `tag_id`, which in turn
    /// targets `target`.
    pub fn with_annotated_tag(mut self, name: &str, tag_id: &str, target: &str) -> Self {
        let id = ObjectId::new(tag_id);
        self.tags.insert(name.to_string(), id.clone());
        self.tag_objects.insert(
            id.clone(),
            AnnotatedTag {
                id,
                name: name.to_string(),
                target: ObjectId::new(target),
            },
        );
        self
    }
}

impl Snapshot for MemorySnapshot {
    fn head(&self) -> Result<Reference> {
        self.head.clone().ok_or_else(|| Error::HeadRef {
            url: "memory".to_string(),
            message: "reference not found".to_string(),
        })
    }

    fn find_tag(&self, name: &str) -> Result<Option<ObjectId>> {
        Ok(self.tags.get(name).cloned())
    }

    fn tag_object(&self, id: &ObjectId) -> Result<Option<AnnotatedTag>> {
        Ok(self.tag_objects.get(id).cloned())
    }

    fn commit(&self, id: &CommitId) -> Result<Commit> {
        self.commits
            .get(id)
            .map(|(commit, _)| commit.clone())
            .ok_or_else(|| Error::Load {
                commit: id.to_string(),
                message: "object not found".to_string(),
            })
    }

    fn tree(&self, commit: &Commit) -> Result<Tree> {
        self.commits
            .get(&commit.id)
            .map(|(_, tree)| tree.clone())
            .ok_or_else(|| Error::Load {
                commit: commit.id.to_string(),
                message: "tree not found".to_string(),
            })
    }
}

/// Serves registered [`MemorySnapshot`]s by address
#[derive(Debug, Default)]
pub struct MemoryProvider {
    repos: HashMap<String, MemorySnapshot>,
    fetches: Mutex<Vec<String>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository under `url`.
    pub fn with_repo(mut self, url: &str, snapshot: MemorySnapshot) -> Self {
        self.repos.insert(url.to_string(), snapshot);
        self
    }

    /// Number of fetches made for `url`.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches
            .lock()
            .map(|log| log.iter().filter(|u| *u == url).count())
            .unwrap_or(0)
    }

    /// Total number of fetches made.
    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().map(|log| log.len()).unwrap_or(0)
    }
}

impl SnapshotProvider for MemoryProvider {
    type Snapshot = MemorySnapshot;

    fn fetch(&self, url: &str, _credentials: &Credentials) -> Result<MemorySnapshot> {
        self.fetches
            .lock()
            .map_err(|_| Error::LockPoisoned {
                context: "memory provider fetch log".to_string(),
            })?
            .push(url.to_string());

        self.repos.get(url).cloned().ok_or_else(|| Error::Fetch {
            url: url.to_string(),
            message: "repository not found".to_string(),
            hint: None,
        })
    }
}
