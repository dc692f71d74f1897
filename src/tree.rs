//! Read-only commit trees
//!
//! A [`Tree`] is the file listing of one commit: every blob reachable from the
//! commit's root tree, keyed by its `/`-separated path, with its bytes and git
//! file mode. Directories are implicit in the paths, so a directory without
//! files does not exist in a tree.

use std::collections::BTreeMap;

use crate::path;

/// Git file mode of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// `100644`
    Regular,
    /// `100664`, group-writable files from early git versions
    Deprecated,
    /// `100755`
    Executable,
    /// `120000`, content is the link target
    Symlink,
    /// Anything else (`160000` gitlinks, unknown modes)
    Other(u32),
}

impl FileMode {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => FileMode::Regular,
            0o100664 => FileMode::Deprecated,
            0o100755 => FileMode::Executable,
            0o120000 => FileMode::Symlink,
            other => FileMode::Other(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            FileMode::Regular => 0o100644,
            FileMode::Deprecated => 0o100664,
            FileMode::Executable => 0o100755,
            FileMode::Symlink => 0o120000,
            FileMode::Other(raw) => raw,
        }
    }

    /// Unix permission bits for a file written from this entry.
    ///
    /// Symlinks are materialized as regular files holding the link target and
    /// get `0o777`. Returns `None` for modes that are not files.
    pub fn to_permissions(self) -> Option<u32> {
        match self {
            FileMode::Regular => Some(0o644),
            FileMode::Deprecated => Some(0o664),
            FileMode::Executable => Some(0o755),
            FileMode::Symlink => Some(0o777),
            FileMode::Other(_) => None,
        }
    }
}

/// A file in a commit tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Path relative to the tree root
    pub path: String,
    /// Blob content
    pub content: Vec<u8>,
    pub mode: FileMode,
}

impl TreeFile {
    /// Final path component
    pub fn name(&self) -> &str {
        path::base_name(&self.path)
    }

    /// Directory holding the file; `""` at the tree root
    pub fn parent(&self) -> &str {
        path::parent(&self.path)
    }

    /// Reader over the blob content
    pub fn reader(&self) -> &[u8] {
        &self.content
    }
}

/// The files of one commit, ordered by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    files: BTreeMap<String, TreeFile>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file. The path is normalized first.
    pub fn insert(&mut self, file_path: &str, content: impl Into<Vec<u8>>, mode: FileMode) {
        let file_path = path::normalize(file_path);
        let file = TreeFile {
            path: file_path.clone(),
            content: content.into(),
            mode,
        };
        self.files.insert(file_path, file);
    }

    /// Get a file by path
    pub fn get(&self, file_path: &str) -> Option<&TreeFile> {
        self.files.get(&path::normalize(file_path))
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether at least one file sits directly inside `dir`.
    pub fn has_direct_files(&self, dir: &str) -> bool {
        let dir = path::normalize(dir);
        self.files.values().any(|f| f.parent() == dir)
    }

    /// The tree rooted at `dir`, with paths relative to it. Empty when `dir`
    /// holds no files.
    pub fn subtree(&self, dir: &str) -> Tree {
        let dir = path::normalize(dir);
        if dir.is_empty() {
            return self.clone();
        }
        let files = self
            .files
            .values()
            .filter_map(|f| {
                path::strip_dir(&f.path, &dir).map(|rest| {
                    (
                        rest.to_string(),
                        TreeFile {
                            path: rest.to_string(),
                            content: f.content.clone(),
                            mode: f.mode,
                        },
                    )
                })
            })
            .collect();
        Tree { files }
    }

    /// Every file in the tree, depth-first in path order.
    pub fn files(&self) -> impl Iterator<Item = &TreeFile> {
        self.files.values()
    }
}

impl FromIterator<TreeFile> for Tree {
    fn from_iter<I: IntoIterator<Item = TreeFile>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for file in iter {
            tree.insert(&file.path, file.content, file.mode);
        }
        tree
    }
}
