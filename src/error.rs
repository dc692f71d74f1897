//! # Error Handling
//!
//! This module defines the centralized error type for `apideps`. It uses the
//! `thiserror` library to build a single `Error` enum covering every failure
//! the fetch pipeline can produce, each variant carrying the context that was
//! available where it was raised (repository URL, commit, path).
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Errors raised while processing one manifest
//!   entry are wrapped in [`Error::Dependency`] by the orchestrator so the
//!   dependency name is always part of the final message.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Errors are never downgraded: the kind raised at the bottom of the stack is
//! the kind reported at the top, reachable through [`Error::root_cause`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for apideps operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest file could not be read or decoded.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// The repository could not be fetched (network, transport or auth).
    #[error("Fetch error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Fetch {
        url: String,
        message: String,
        /// Optional hint for how to resolve the fetch issue
        hint: Option<String>,
    },

    /// The HEAD reference of a fetched repository could not be read.
    #[error("Could not read HEAD of {url}: {message}")]
    HeadRef { url: String, message: String },

    /// No usable revision was given, or the named tag does not exist.
    #[error("Revision resolution error: {message}")]
    Resolution { message: String },

    /// A resolved commit identifier does not name a loadable commit.
    #[error("Could not load commit {commit}: {message}")]
    Load { commit: String, message: String },

    /// The requested source folder has no files in the commit tree.
    #[error("Source folder '{folder}' not found in source commit tree")]
    SourceNotFound { folder: String },

    /// A file mode has no file-permission meaning.
    #[error("Cannot translate file mode {mode:o} of '{path}' to permissions")]
    Permission { path: String, mode: u32 },

    /// An I/O step of the copy failed.
    #[error("Copy error while {operation} '{}': {source}", path.display())]
    Copy {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An error raised while processing a single manifest entry.
    #[error("Dependency '{name}' failed: {source}")]
    Dependency {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

impl Error {
    /// Wrap this error with the name of the dependency being processed.
    pub fn for_dependency(self, name: &str) -> Self {
        Error::Dependency {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// Build a [`Error::Copy`] for the given operation and path.
    pub fn copy(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Copy {
            operation,
            path: path.into(),
            source,
        }
    }

    /// The innermost error, skipping any [`Error::Dependency`] wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Dependency { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
