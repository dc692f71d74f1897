//! # Tree Materializer
//!
//! Copies a folder of a commit tree onto the local filesystem.
//!
//! ## Layout
//!
//! Every directory of the source folder that directly holds files is mirrored
//! at the same relative path under the target. In addition, each mirrored
//! directory (and the target root) receives a copy of every file found anywhere
//! beneath it, under the file's base name. For a source folder holding
//! `api.yaml` and `models/user.yaml` the target ends up with:
//!
//! ```text
//! target/api.yaml
//! target/user.yaml
//! target/models/user.yaml
//! ```
//!
//! When several files map to the same destination the one closest to that
//! directory wins, so a file always keeps its content at its own relative
//! path. Among equally deep candidates the last in path order wins.
//!
//! ## Guarantees
//!
//! Each destination file is written once, synced, and then given the
//! permission bits of its git file mode. Existing files in the target that are
//! not part of the copy are left alone. A failure stops the copy immediately;
//! files written before it stay on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::path;
use crate::tree::{Tree, TreeFile};

/// What a copy wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub directories: usize,
    pub files: usize,
}

/// Destinations computed for a source tree, relative to the target root
#[derive(Debug)]
pub struct CopyPlan<'a> {
    pub directories: BTreeSet<String>,
    pub files: BTreeMap<String, &'a TreeFile>,
}

/// Compute where every file of `source` lands.
pub fn plan(source: &Tree) -> CopyPlan<'_> {
    let mut directories = BTreeSet::new();
    directories.insert(String::new());
    for file in source.files() {
        directories.insert(file.parent().to_string());
    }

    // Deepest first, so files nearer a directory overwrite farther ones.
    let mut ordered: Vec<&TreeFile> = source.files().collect();
    ordered.sort_by(|a, b| {
        path::depth(&b.path)
            .cmp(&path::depth(&a.path))
            .then_with(|| a.path.cmp(&b.path))
    });

    let mut files = BTreeMap::new();
    for dir in &directories {
        for file in &ordered {
            if path::strip_dir(&file.path, dir).is_some() {
                files.insert(path::join(dir, file.name()), *file);
            }
        }
    }

    CopyPlan { directories, files }
}

/// Copy the folder `source` of `tree` into `target`.
pub fn copy_subtree(tree: &Tree, source: &str, target: &Path) -> Result<CopyStats> {
    let source = path::normalize(source);
    info!(
        "copying folder: {} to: {}",
        display_folder(&source),
        target.display()
    );

    ensure_source_folder(tree, &source)?;

    let subtree = tree.subtree(&source);
    let plan = plan(&subtree);
    let mut stats = CopyStats::default();

    for dir in &plan.directories {
        let dst = target.join(dir);
        ensure_target_folder(&dst)?;
        stats.directories += 1;
    }

    for (dest, file) in &plan.files {
        copy_file(file, &target.join(dest))?;
        stats.files += 1;
    }

    debug!(
        "copied {} files into {} directories under {}",
        stats.files,
        stats.directories,
        target.display()
    );
    Ok(stats)
}

/// The folder must directly contain at least one file.
fn ensure_source_folder(tree: &Tree, source: &str) -> Result<()> {
    if tree.has_direct_files(source) {
        Ok(())
    } else {
        Err(Error::SourceNotFound {
            folder: display_folder(source).to_string(),
        })
    }
}

fn ensure_target_folder(dir: &Path) -> Result<()> {
    debug!("ensuring folder exists: {}", dir.display());
    fs::create_dir_all(dir).map_err(|e| Error::copy("creating directory", dir, e))
}

fn copy_file(file: &TreeFile, dest: &Path) -> Result<()> {
    debug!("copying file: {} to: {}", file.path, dest.display());

    let mut out = fs::File::create(dest).map_err(|e| Error::copy("creating", dest, e))?;
    let mut reader = file.reader();
    io::copy(&mut reader, &mut out).map_err(|e| Error::copy("writing", dest, e))?;
    out.sync_all().map_err(|e| Error::copy("syncing", dest, e))?;
    drop(out);

    let mode = file.mode.to_permissions().ok_or_else(|| Error::Permission {
        path: file.path.clone(),
        mode: file.mode.raw(),
    })?;
    set_mode(dest, mode)
}

#[cfg(unix)]
fn set_mode(dest: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dest, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::copy("setting permissions on", dest, e))
}

#[cfg(not(unix))]
fn set_mode(dest: &Path, mode: u32) -> Result<()> {
    let mut perms = fs::metadata(dest)
        .map_err(|e| Error::copy("reading metadata of", dest, e))?
        .permissions();
    perms.set_readonly(mode & 0o222 == 0);
    fs::set_permissions(dest, perms).map_err(|e| Error::copy("setting permissions on", dest, e))
}

fn display_folder(folder: &str) -> &str {
    if folder.is_empty() {
        "."
    } else {
        folder
    }
}
