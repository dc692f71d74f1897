//! Get command implementation
//!
//! Loads the manifest and vendors every dependency in it:
//! 1. Fetch each referenced repository once
//! 2. Resolve the pinned tag or commit
//! 3. Copy the requested folder into the target path

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use apideps::fetch::Fetcher;
use apideps::git::GitProvider;
use apideps::manifest::{self, DEFAULT_MANIFEST_FILE};
use apideps::output::emoji;
use apideps::snapshot::Credentials;

use crate::cli::GlobalOptions;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Path to the dependencies manifest
    #[arg(short, long, value_name = "PATH", env = "APIDEPS_FILE", default_value = DEFAULT_MANIFEST_FILE)]
    pub file: PathBuf,

    /// SSH user for repository addresses that do not name one
    #[arg(long, value_name = "USER", env = "APIDEPS_SSH_USER", default_value = "git")]
    pub ssh_user: String,

    /// Directory relative target paths are resolved against
    #[arg(long, value_name = "PATH")]
    pub base_dir: Option<PathBuf>,
}

/// Execute the get command
pub fn execute(args: GetArgs, globals: &GlobalOptions) -> Result<()> {
    let start_time = Instant::now();

    if !args.file.exists() {
        anyhow::bail!("Manifest file not found: {}", args.file.display());
    }
    log::info!("preparing to fetch the dependencies...");
    let manifest = manifest::from_file(&args.file)?;

    let base_dir = match args.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let show_progress = !globals.quiet && std::io::stderr().is_terminal();
    let provider = GitProvider::new().with_progress(show_progress);
    let fetcher = Fetcher::new(provider, Credentials::ssh(args.ssh_user)).with_base_dir(base_dir);

    match fetcher.fetch_all(&manifest) {
        Ok(report) => {
            if !globals.quiet {
                for dep in &report.fetched {
                    println!(
                        "{} {} @ {} -> {} ({} files)",
                        emoji(&globals.output, "📦", "[OK]"),
                        dep.name,
                        dep.commit.short(),
                        dep.target.display(),
                        dep.stats.files
                    );
                }
                for name in &report.skipped {
                    println!("{} {} (no repository)", emoji(&globals.output, "⏭️ ", "[SKIP]"), name);
                }
                println!(
                    "{} Fetched {} dependencies in {:.2}s",
                    emoji(&globals.output, "✅", "[DONE]"),
                    report.fetched.len(),
                    start_time.elapsed().as_secs_f64()
                );
            }
            Ok(())
        }
        Err(e) => {
            if !globals.quiet {
                println!("{} Fetch failed", emoji(&globals.output, "❌", "[FAIL]"));
            }
            Err(e.into())
        }
    }
}
