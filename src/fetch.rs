//! # Dependency Fetch Orchestration
//!
//! [`Fetcher`] walks a manifest and vendors every entry:
//!
//! 1.  **Fetch**: get the repository snapshot through the [`RepoCache`], so
//!     entries sharing a repository trigger a single fetch.
//! 2.  **Resolve**: turn the entry's tag or commit into a commit identifier.
//! 3.  **Load**: load the commit and its tree.
//! 4.  **Copy**: materialize the entry's folder into its target path.
//!
//! Entries are processed one at a time in name order. The first failure stops
//! the run and is returned wrapped with the entry's name; entries already
//! copied stay on disk.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::cache::RepoCache;
use crate::error::Result;
use crate::manifest::{Dependency, Manifest};
use crate::materialize::{copy_subtree, CopyStats};
use crate::resolve::{load_commit, resolve};
use crate::snapshot::{CommitId, Credentials, Snapshot, SnapshotProvider};

/// Outcome of one vendored entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDependency {
    pub name: String,
    pub commit: CommitId,
    pub target: PathBuf,
    pub stats: CopyStats,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub fetched: Vec<FetchedDependency>,
    /// Entries without a repository
    pub skipped: Vec<String>,
}

impl FetchReport {
    pub fn files_written(&self) -> usize {
        self.fetched.iter().map(|d| d.stats.files).sum()
    }
}

/// Vendors manifest entries through a snapshot provider
pub struct Fetcher<P: SnapshotProvider> {
    cache: RepoCache<P>,
    base_dir: PathBuf,
}

impl<P: SnapshotProvider> Fetcher<P> {
    /// Relative target paths are resolved against the current directory.
    pub fn new(provider: P, credentials: Credentials) -> Self {
        Self {
            cache: RepoCache::new(provider, credentials),
            base_dir: PathBuf::from("."),
        }
    }

    /// Resolve relative target paths against `base_dir` instead.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn cache(&self) -> &RepoCache<P> {
        &self.cache
    }

    /// Vendor every entry of `manifest`, stopping at the first failure.
    pub fn fetch_all(&self, manifest: &Manifest) -> Result<FetchReport> {
        info!("Fetching dependencies...");
        let mut report = FetchReport::default();

        for (name, dep) in manifest.iter() {
            match self.fetch_one(name, dep) {
                Ok(Some(fetched)) => report.fetched.push(fetched),
                Ok(None) => report.skipped.push(name.clone()),
                Err(e) => return Err(e.for_dependency(name)),
            }
        }

        info!(
            "fetched {} dependencies ({} skipped, {} files written)",
            report.fetched.len(),
            report.skipped.len(),
            report.files_written()
        );
        Ok(report)
    }

    /// Vendor a single entry. Returns `None` for entries without a
    /// repository.
    pub fn fetch_one(&self, name: &str, dep: &Dependency) -> Result<Option<FetchedDependency>> {
        info!("processing {}...", name);
        if dep.is_noop() {
            debug!("skipping {}: no repository", name);
            return Ok(None);
        }

        let snapshot = self.cache.get_or_fetch(&dep.repo)?;

        let head = snapshot.head()?;
        info!("head ref of {}: {} ({})", dep.repo, head.target, head.name);

        let commit_id = resolve(dep, snapshot.as_ref())?;
        let commit = load_commit(snapshot.as_ref(), &commit_id)?;
        let tree = snapshot.tree(&commit)?;

        let target = self.base_dir.join(&dep.target_path);
        let stats = copy_subtree(&tree, &dep.repo_folder, &target)?;

        Ok(Some(FetchedDependency {
            name: name.to_string(),
            commit: commit.id,
            target,
            stats,
        }))
    }
}
