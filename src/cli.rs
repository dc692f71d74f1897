//! CLI argument parsing, logging setup and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;
use apideps::output::OutputConfig;

/// apideps - vendor pinned folders of git repositories
#[derive(Parser, Debug)]
#[command(name = "apideps")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Enable verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch all the dependencies in the manifest
    Get(commands::get::GetArgs),

    /// List the dependencies in the manifest
    List(commands::list::ListArgs),

    /// Show the revision the binary was built from
    #[command(name = "cliversion")]
    CliVersion,

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub output: OutputConfig,
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        let globals = GlobalOptions {
            output: OutputConfig::from_env_and_flag(&self.color),
            quiet: self.quiet,
        };

        let result = match self.command {
            Commands::Get(args) => commands::get::execute(args, &globals),
            Commands::List(args) => commands::list::execute(args, &globals),
            Commands::CliVersion => commands::version::execute(),
            Commands::Completions(args) => commands::completions::execute(args),
        };

        if let Err(e) = &result {
            log::error!("error executing command: {:#}", e);
        }
        result
    }

    fn level(&self) -> LevelFilter {
        if self.verbose {
            return LevelFilter::Debug;
        }
        if self.quiet {
            return LevelFilter::Error;
        }
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Install the single log sink for the process. `RUST_LOG`, when set,
    /// refines the level chosen on the command line.
    fn init_logging(&self) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.level());
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.write_style(match self.color.to_lowercase().as_str() {
            "always" => env_logger::WriteStyle::Always,
            "never" => env_logger::WriteStyle::Never,
            _ => env_logger::WriteStyle::Auto,
        });
        // A second init (tests calling execute twice) keeps the first sink.
        let _ = builder.try_init();
    }
}
