//! # Manifest Schema and Parsing
//!
//! This module defines the data structures for the `apideps.yaml` manifest and
//! the logic for loading it. A manifest maps dependency names to the
//! repository, revision and subfolder that should be vendored:
//!
//! ```yaml
//! dependencies:
//!   service:
//!     repo: git@host:org/apis.git
//!     repofolder: openapi/service
//!     tag: service-v1.0.1
//!     targetpath: ./vendor/service
//! ```
//!
//! Dependencies are kept in a `BTreeMap`, so every consumer sees them in name
//! order and a run is reproducible from one invocation to the next.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default manifest file name, looked up in the working directory.
pub const DEFAULT_MANIFEST_FILE: &str = "apideps.yaml";

/// A single manifest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Address of the source repository. Empty marks the entry as a no-op.
    #[serde(default)]
    pub repo: String,
    /// Folder inside the repository to copy.
    #[serde(default, rename = "repofolder")]
    pub repo_folder: String,
    /// Commit hash to pin to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit: String,
    /// Tag to pin to. Takes priority over `commit`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Local directory the folder is copied into.
    #[serde(default, rename = "targetpath")]
    pub target_path: String,
}

/// The revision a dependency asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision<'a> {
    Tag(&'a str),
    Commit(&'a str),
    Unpinned,
}

impl Dependency {
    /// Entries without a repository are skipped by the fetcher.
    pub fn is_noop(&self) -> bool {
        self.repo.trim().is_empty()
    }

    /// The pinned revision; a tag wins over a commit when both are set.
    pub fn revision(&self) -> Revision<'_> {
        let tag = self.tag.trim();
        let commit = self.commit.trim();
        if !tag.is_empty() {
            Revision::Tag(tag)
        } else if !commit.is_empty() {
            Revision::Commit(commit)
        } else {
            Revision::Unpinned
        }
    }
}

/// The whole manifest, keyed by dependency name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, Dependency>,
}

impl Manifest {
    /// Number of entries, including no-op ones.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Dependency)> {
        self.dependencies.iter()
    }

    /// Human-readable listing of every entry, used by the `list` command.
    pub fn render_listing(&self) -> String {
        let mut out = String::new();
        for (name, dep) in &self.dependencies {
            let _ = writeln!(out, "{} :", name);
            let _ = writeln!(out, "\t repo: {}", dep.repo);
            let _ = writeln!(out, "\t repofolder: {}", dep.repo_folder);
            if !dep.commit.is_empty() {
                let _ = writeln!(out, "\t commit: {}", dep.commit);
            }
            if !dep.tag.is_empty() {
                let _ = writeln!(out, "\t tag: {}", dep.tag);
            }
            let _ = writeln!(out, "\t targetpath: {}", dep.target_path);
        }
        out
    }
}

/// Parse a manifest from a YAML string.
pub fn parse(yaml: &str) -> Result<Manifest> {
    if yaml.trim().is_empty() {
        return Ok(Manifest::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| Error::ManifestParse {
        message: e.to_string(),
        hint: Some(
            "expected a top-level 'dependencies:' map of name -> {repo, repofolder, tag|commit, targetpath}"
                .to_string(),
        ),
    })
}

/// Load a manifest from a file.
pub fn from_file(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::ManifestParse {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: Some(format!(
            "create {} or pass --file <PATH>",
            DEFAULT_MANIFEST_FILE
        )),
    })?;
    parse(&content)
}
