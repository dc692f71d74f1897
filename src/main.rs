//! # apideps CLI
//!
//! Binary entry point for the `apideps` command-line tool. It parses the
//! command line with `clap`, installs the log sink and runs the selected
//! command; the work itself lives in the `apideps` library.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
