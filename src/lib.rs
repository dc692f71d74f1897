//! # apideps
//!
//! This library vendors folders of git repositories into a local tree. A
//! manifest names, for each dependency, the repository, a pinned tag or
//! commit, the folder to take and where to put it. It backs the `apideps`
//! command-line tool but can be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use apideps::fetch::Fetcher;
//! use apideps::manifest;
//! use apideps::memory::{MemoryProvider, MemorySnapshot};
//! use apideps::snapshot::Credentials;
//! use apideps::tree::{FileMode, Tree};
//!
//! let mut tree = Tree::new();
//! tree.insert("openapi/service/api.yaml", "openapi: 3.0.0", FileMode::Regular);
//! let snapshot = MemorySnapshot::new()
//!     .with_commit("4b00f9948a6aec2caa4689c58a826243a4bee1aa", tree)
//!     .with_lightweight_tag("service-v1.0.1", "4b00f9948a6aec2caa4689c58a826243a4bee1aa");
//! let provider = MemoryProvider::new().with_repo("git@host:org/apis.git", snapshot);
//!
//! let manifest = manifest::parse(r#"
//! dependencies:
//!   service:
//!     repo: git@host:org/apis.git
//!     repofolder: openapi/service
//!     tag: service-v1.0.1
//!     targetpath: vendor/service
//! "#).unwrap();
//!
//! let out = tempfile::tempdir().unwrap();
//! let fetcher = Fetcher::new(provider, Credentials::default()).with_base_dir(out.path());
//! let report = fetcher.fetch_all(&manifest).unwrap();
//! assert_eq!(report.fetched.len(), 1);
//! assert!(out.path().join("vendor/service/api.yaml").exists());
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the `apideps.yaml` schema.
//! - **Snapshots (`snapshot`, `git`, `memory`)**: immutable, queryable copies
//!   of repositories, obtained through a pluggable provider.
//! - **Cache (`cache`)**: fetches each repository at most once per run.
//! - **Resolution (`resolve`)**: turns a tag or commit into a commit id.
//! - **Trees (`tree`, `materialize`)**: commit file listings and the copy of a
//!   folder onto disk with its permission bits.
//! - **Orchestration (`fetch`)**: ties the above together, failing fast.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod git;
pub mod manifest;
pub mod materialize;
pub mod memory;
pub mod output;
pub mod path;
pub mod resolve;
pub mod snapshot;
pub mod tree;

#[cfg(test)]
mod path_proptest;
