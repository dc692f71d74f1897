//! Library-level tests running the fetcher against real git repositories.

mod common;

use std::fs;
use std::path::Path;

use apideps::error::Error;
use apideps::fetch::Fetcher;
use apideps::git::{GitProvider, GitSnapshot};
use apideps::manifest::{self, Dependency};
use apideps::resolve::resolve;
use apideps::snapshot::{Credentials, Snapshot};
use common::{GitFixture, APIS_FILES};
use tempfile::TempDir;
use walkdir::WalkDir;

fn fetcher(base: &Path) -> Fetcher<GitProvider> {
    Fetcher::new(GitProvider::new(), Credentials::default()).with_base_dir(base)
}

/// Every regular file under `dir`, relative and sorted.
fn listing(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

fn fixture_content(path: &str) -> &'static [u8] {
    APIS_FILES
        .iter()
        .find(|(p, _, _)| *p == path)
        .map(|(_, content, _)| *content)
        .unwrap()
}

#[test]
fn test_annotated_tag_resolves_to_commit() {
    let repo = GitFixture::apis();
    let snapshot = GitSnapshot::open(Path::new(&repo.url())).unwrap();

    let dep = Dependency {
        repo: repo.url(),
        tag: "service-v1.0.1".to_string(),
        ..Default::default()
    };
    assert_eq!(resolve(&dep, &snapshot).unwrap().as_str(), repo.commit());

    let light = Dependency {
        tag: "billing-v2".to_string(),
        ..dep.clone()
    };
    assert_eq!(resolve(&light, &snapshot).unwrap().as_str(), repo.commit());
}

#[test]
fn test_vendored_files_match_repository_bytes() {
    let repo = GitFixture::apis();
    let out = TempDir::new().unwrap();
    let manifest = manifest::parse(&common::manifests::service(&repo.url())).unwrap();

    let report = fetcher(out.path()).fetch_all(&manifest).unwrap();
    assert_eq!(report.fetched.len(), 1);
    assert_eq!(report.fetched[0].commit.as_str(), repo.commit());

    let target = out.path().join("vendor/service");
    assert_eq!(
        listing(&target),
        vec!["api.yaml", "gen.sh", "models/user.yaml", "user.yaml"]
    );
    for rel in ["api.yaml", "gen.sh", "models/user.yaml"] {
        assert_eq!(
            fs::read(target.join(rel)).unwrap(),
            fixture_content(&format!("openapi/service/{}", rel)),
            "{} differs",
            rel
        );
    }
}

#[test]
fn test_repository_fetched_once_per_run() {
    let repo = GitFixture::apis();
    let out = TempDir::new().unwrap();
    let manifest = manifest::parse(&common::manifests::service_and_billing(
        &repo.url(),
        &repo.commit(),
    ))
    .unwrap();

    let fetcher = fetcher(out.path());
    let report = fetcher.fetch_all(&manifest).unwrap();

    assert_eq!(report.fetched.len(), 2);
    assert_eq!(report.skipped, vec!["later".to_string()]);
    assert_eq!(fetcher.cache().len().unwrap(), 1);
    assert!(fetcher.cache().contains(&repo.url()).unwrap());
}

#[test]
fn test_abbreviated_commit_is_accepted() {
    let repo = GitFixture::apis();
    let out = TempDir::new().unwrap();
    let dep = Dependency {
        repo: repo.url(),
        repo_folder: "openapi/billing".to_string(),
        commit: repo.commit()[..10].to_string(),
        target_path: "billing".to_string(),
        ..Default::default()
    };

    let fetched = fetcher(out.path())
        .fetch_one("billing", &dep)
        .unwrap()
        .unwrap();
    assert_eq!(fetched.commit.as_str(), repo.commit());
    assert_eq!(listing(&out.path().join("billing")), vec!["api.yaml"]);
}

#[test]
fn test_folder_without_direct_files_is_not_found() {
    let repo = GitFixture::apis();
    let out = TempDir::new().unwrap();
    let dep = Dependency {
        repo: repo.url(),
        repo_folder: "openapi".to_string(),
        tag: "service-v1.0.1".to_string(),
        target_path: "all".to_string(),
        ..Default::default()
    };

    let err = fetcher(out.path()).fetch_one("all", &dep).unwrap_err();
    assert!(matches!(err, Error::SourceNotFound { .. }), "{err}");
    assert!(!out.path().join("all").exists());
}

#[test]
fn test_unreachable_repository_is_fetch_error() {
    let out = TempDir::new().unwrap();
    let dep = Dependency {
        repo: out.path().join("missing.git").display().to_string(),
        tag: "v1".to_string(),
        ..Default::default()
    };

    let err = fetcher(out.path()).fetch_one("missing", &dep).unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }), "{err}");
}

#[test]
fn test_head_of_fetched_repository() {
    let repo = GitFixture::apis();
    let snapshot = GitSnapshot::open(Path::new(&repo.url())).unwrap();
    let head = snapshot.head().unwrap();
    assert_eq!(head.target.as_str(), repo.commit());
    assert!(head.name.starts_with("refs/heads/"));
}
