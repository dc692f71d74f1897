//! Revision resolution
//!
//! Turns the revision pinned by a manifest entry into a commit identifier.
//! A tag is looked up in the snapshot and peeled through annotated tag objects
//! until it reaches a non-tag object. A commit hash is taken literally and is
//! only checked when the commit is loaded. Entries that pin nothing are
//! rejected: floating on `HEAD` is not supported.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::manifest::{Dependency, Revision};
use crate::snapshot::{Commit, CommitId, Snapshot};

/// Annotated tags pointing at annotated tags are followed at most this far.
const MAX_TAG_CHAIN: usize = 16;

/// Resolve the revision of `dep` against `snapshot`.
pub fn resolve<S: Snapshot + ?Sized>(dep: &Dependency, snapshot: &S) -> Result<CommitId> {
    match dep.revision() {
        Revision::Unpinned => Err(Error::Resolution {
            message: "no commit ref provided, tag or commit hash required".to_string(),
        }),
        Revision::Tag(tag) => resolve_tag(tag, snapshot),
        Revision::Commit(hash) => {
            debug!("using commit hash {} as given", hash);
            Ok(CommitId::new(hash))
        }
    }
}

/// Resolve a tag name to the commit it ultimately targets.
pub fn resolve_tag<S: Snapshot + ?Sized>(tag: &str, snapshot: &S) -> Result<CommitId> {
    let mut target = snapshot
        .find_tag(tag)?
        .ok_or_else(|| Error::Resolution {
            message: format!("could not resolve tag name: {}, tag not found", tag),
        })?;

    for _ in 0..MAX_TAG_CHAIN {
        match snapshot.tag_object(&target)? {
            Some(annotated) => {
                debug!("peeling annotated tag {} -> {}", annotated.id, annotated.target);
                target = annotated.target;
            }
            None => {
                info!("resolved tag: {} to commit: {}", tag, target);
                return Ok(target);
            }
        }
    }

    Err(Error::Resolution {
        message: format!(
            "tag {} is nested more than {} annotated tags deep",
            tag, MAX_TAG_CHAIN
        ),
    })
}

/// Load the commit object for a resolved identifier.
pub fn load_commit<S: Snapshot + ?Sized>(snapshot: &S, id: &CommitId) -> Result<Commit> {
    let commit = snapshot.commit(id)?;
    debug!("loaded commit {} ({})", commit.id.short(), commit.summary);
    Ok(commit)
}
