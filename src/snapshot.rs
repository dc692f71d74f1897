//! # Snapshot Capability
//!
//! The fetch pipeline never talks to a version-control system directly. It
//! asks a [`SnapshotProvider`] for a [`Snapshot`] of a repository: an
//! immutable copy of its refs, tags, commits and trees as of fetch time. The
//! provider owns transport and authentication; the snapshot only answers
//! queries.
//!
//! Two implementations ship with the crate:
//!
//! - [`crate::git::GitProvider`], backed by `git2`.
//! - [`crate::memory::MemoryProvider`], an in-memory object graph used by
//!   tests and benchmarks.

use std::fmt;

use crate::error::Result;
use crate::tree::Tree;

/// A content-addressed object hash, rendered as lower-case hex.
///
/// Constructing one performs no validation; whether it names a real object is
/// only known once a snapshot is asked to load it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

/// An [`ObjectId`] that is expected to name a commit.
pub type CommitId = ObjectId;

impl ObjectId {
    pub fn new(hex: &str) -> Self {
        Self(hex.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log output.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(8);
        self.0.get(..end).unwrap_or(&self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named reference and the object it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub target: ObjectId,
}

/// An annotated tag object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedTag {
    pub id: ObjectId,
    pub name: String,
    /// Object the tag points at; usually a commit, possibly another tag.
    pub target: ObjectId,
}

/// A loaded commit object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: CommitId,
    pub tree: ObjectId,
    pub summary: String,
}

/// Identity used to authenticate a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name for SSH when the repository address does not carry one.
    pub ssh_user: String,
}

impl Credentials {
    pub fn ssh(user: impl Into<String>) -> Self {
        Self {
            ssh_user: user.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::ssh("git")
    }
}

/// A queryable, immutable copy of one repository.
pub trait Snapshot {
    /// The reference `HEAD` resolves to.
    fn head(&self) -> Result<Reference>;

    /// Target of `refs/tags/<name>`, or `None` when there is no such tag.
    fn find_tag(&self, name: &str) -> Result<Option<ObjectId>>;

    /// The annotated tag object with this id, or `None` when the object is
    /// not an annotated tag (for instance the commit of a lightweight tag).
    fn tag_object(&self, id: &ObjectId) -> Result<Option<AnnotatedTag>>;

    /// Load a commit; fails with `Error::Load` when `id` names no commit.
    fn commit(&self, id: &CommitId) -> Result<Commit>;

    /// The full file tree of a commit.
    fn tree(&self, commit: &Commit) -> Result<Tree>;
}

/// Obtains snapshots of repositories by address.
pub trait SnapshotProvider {
    type Snapshot: Snapshot;

    /// Fetch the repository at `url`; fails with `Error::Fetch`.
    fn fetch(&self, url: &str, credentials: &Credentials) -> Result<Self::Snapshot>;
}
