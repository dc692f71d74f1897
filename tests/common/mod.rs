//! Shared test utilities for integration and E2E tests.
//!
//! Provides a local git repository fixture (built with `git2`, no network)
//! and a working-directory fixture holding an `apideps.yaml` manifest.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let repo = GitFixture::apis();
//! let fixture = TestFixture::new().with_manifest(&manifests::service(&repo.url()));
//! fixture.command().arg("get").assert().success();
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use assert_fs::prelude::*;
use git2::{Oid, Repository, Signature};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::{GitFixture, TestFixture};
}

/// Files of the `apis` fixture repository: path, content, git file mode.
pub const APIS_FILES: &[(&str, &[u8], i32)] = &[
    ("README.md", b"# apis\n", 0o100644),
    ("openapi/service/api.yaml", b"openapi: 3.0.0\n", 0o100644),
    ("openapi/service/gen.sh", b"#!/bin/sh\necho gen\n", 0o100755),
    (
        "openapi/service/models/user.yaml",
        b"type: object\n",
        0o100644,
    ),
    ("openapi/billing/api.yaml", b"openapi: 3.1.0\n", 0o100644),
];

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// One dependency pinned by an annotated tag.
    pub fn service(url: &str) -> String {
        format!(
            r#"
dependencies:
  service:
    repo: {url}
    repofolder: openapi/service
    tag: service-v1.0.1
    targetpath: ./vendor/service
"#
        )
    }

    /// Two dependencies from the same repository plus a no-op entry.
    pub fn service_and_billing(url: &str, commit: &str) -> String {
        format!(
            r#"
dependencies:
  service:
    repo: {url}
    repofolder: openapi/service
    tag: service-v1.0.1
    targetpath: ./vendor/service
  billing:
    repo: {url}
    repofolder: openapi/billing
    commit: {commit}
    targetpath: ./vendor/billing
  later:
    repo: ""
"#
        )
    }

    /// A dependency whose folder does not exist.
    pub fn missing_folder(url: &str) -> String {
        format!(
            r#"
dependencies:
  ghost:
    repo: {url}
    repofolder: openapi/ghost
    tag: service-v1.0.1
    targetpath: ./vendor/ghost
"#
        )
    }

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "dependencies: [unclosed";
}

/// A local git repository built from a list of files
pub struct GitFixture {
    dir: assert_fs::TempDir,
    commit: Oid,
}

#[allow(dead_code)]
impl GitFixture {
    /// The `apis` repository: one commit, an annotated tag `service-v1.0.1`
    /// and a lightweight tag `billing-v2`, both on that commit.
    pub fn apis() -> Self {
        Self::with_files(APIS_FILES)
    }

    pub fn with_files(files: &[(&str, &[u8], i32)]) -> Self {
        let dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let commit = {
            let repo = Repository::init(dir.path()).expect("Failed to init repository");
            let tree_id = write_tree(&repo, files, "");
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = Signature::now("apideps", "apideps@example.com").unwrap();
            let commit = repo
                .commit(Some("HEAD"), &sig, &sig, "add apis", &tree, &[])
                .unwrap();
            let object = repo.find_object(commit, None).unwrap();
            repo.tag("service-v1.0.1", &object, &sig, "service release", false)
                .unwrap();
            repo.tag_lightweight("billing-v2", &object, false).unwrap();
            commit
        };
        Self { dir, commit }
    }

    /// Address to fetch the repository from.
    pub fn url(&self) -> String {
        self.dir.path().display().to_string()
    }

    /// Hash of the tagged commit.
    pub fn commit(&self) -> String {
        self.commit.to_string()
    }
}

fn write_tree(repo: &Repository, files: &[(&str, &[u8], i32)], prefix: &str) -> Oid {
    let mut builder = repo.treebuilder(None).unwrap();
    let mut subdirs = BTreeSet::new();
    for (path, content, mode) in files {
        let Some(rest) = path.strip_prefix(prefix) else {
            continue;
        };
        match rest.split_once('/') {
            None => {
                let blob = repo.blob(content).unwrap();
                builder.insert(rest, blob, *mode).unwrap();
            }
            Some((dir, _)) => {
                subdirs.insert(dir.to_string());
            }
        }
    }
    for dir in subdirs {
        let sub = write_tree(repo, files, &format!("{}{}/", prefix, dir));
        builder.insert(dir.as_str(), sub, 0o040000).unwrap();
    }
    builder.write().unwrap()
}

/// A temporary working directory with an optional manifest.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add an `apideps.yaml` manifest with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("apideps.yaml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A command for the apideps binary running in this directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("apideps").unwrap();
        cmd.current_dir(self.path())
            .env_remove("APIDEPS_FILE")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
