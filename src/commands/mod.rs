//! # CLI Command Implementations
//!
//! Each subcommand of the `apideps` command-line tool lives in its own file.
//! A command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `apideps` library to do the work.

pub mod completions;
pub mod get;
pub mod list;
pub mod version;
