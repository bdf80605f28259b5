//! embedfs command-line tool.
//!
//! Builds the tree a mount would serve from a source directory and prints
//! it, without mounting anything.
//!
//! # Examples
//!
//! ```bash
//! # List everything under testdata/
//! embedfs tree ./bundle --prefix testdata
//!
//! # Print one file
//! embedfs cat ./bundle dir_a/file_a.txt --prefix testdata
//!
//! # Check a mode override
//! embedfs stat ./bundle dir_a/file_a.txt --prefix testdata --chmod dir_a/file_a.txt=0644
//! ```

#![allow(clippy::format_push_string)]

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes logging infrastructure.
///
/// Sets up tracing with appropriate log levels based on verbosity flag.
/// Logs go to stderr so `cat` output stays clean.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes a subcommand to its handler.
fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Tree { source } => commands::tree(&source),
        Commands::Cat { source, path } => commands::cat(&source, &path),
        Commands::Stat { source, path } => commands::stat(&source, path.as_deref()),
    }
}
