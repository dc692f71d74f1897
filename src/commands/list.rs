//! List command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use apideps::manifest::{self, DEFAULT_MANIFEST_FILE};

use crate::cli::GlobalOptions;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the dependencies manifest
    #[arg(short, long, value_name = "PATH", env = "APIDEPS_FILE", default_value = DEFAULT_MANIFEST_FILE)]
    pub file: PathBuf,
}

/// Print every dependency of the manifest
pub fn execute(args: ListArgs, globals: &GlobalOptions) -> Result<()> {
    log::info!("listing api dependencies from dep file: {}", args.file.display());
    let manifest = manifest::from_file(&args.file)?;

    if !globals.quiet {
        if manifest.is_empty() {
            println!("No dependencies defined in {}", args.file.display());
        } else {
            print!("{}", manifest.render_listing());
        }
    }
    Ok(())
}
