//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands
//! - `SourceArgs` - Where the tree comes from and how it is configured

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect the read-only tree embedfs builds from a directory.
///
/// The tree is built exactly as a mount would see it: prefix stripped,
/// directories inferred from file paths, mode overrides applied.
#[derive(Parser, Debug)]
#[command(name = "embedfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the whole tree.
    ///
    /// # Examples
    ///
    /// ```bash
    /// embedfs tree ./bundle --prefix testdata
    /// embedfs tree ./bundle --config mount.toml --chmod bin/run.sh=0755
    /// ```
    Tree {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write the content of one file to stdout.
    Cat {
        #[command(flatten)]
        source: SourceArgs,

        /// File path inside the tree
        path: String,
    },

    /// Show kind, mode and size of a node, or a summary of the tree.
    Stat {
        #[command(flatten)]
        source: SourceArgs,

        /// Node path inside the tree (the root when omitted)
        path: Option<String>,
    },
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory to build the tree from
    pub dir: PathBuf,

    /// Prefix stripped from every path (overrides the config file)
    #[arg(short, long, env = "EMBEDFS_PREFIX")]
    pub prefix: Option<String>,

    /// TOML mount configuration
    #[arg(short, long, env = "EMBEDFS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mode override in PATH=MODE form, MODE in octal (repeatable)
    #[arg(long = "chmod", value_parser = parse_chmod, num_args = 1)]
    pub chmod: Vec<(String, u32)>,
}

/// Parses a `PATH=MODE` override with an octal mode such as `0644` or
/// `0o755`.
///
/// # Errors
///
/// Returns a message if `=` is missing, the path is empty or the mode is
/// not octal.
pub fn parse_chmod(value: &str) -> Result<(String, u32), String> {
    let (path, mode) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=MODE, got '{value}'"))?;

    if path.is_empty() {
        return Err("path must not be empty".to_string());
    }

    let digits = mode.strip_prefix("0o").unwrap_or(mode);
    let mode = u32::from_str_radix(digits, 8)
        .map_err(|e| format!("invalid octal mode '{mode}': {e}"))?;

    Ok((path.to_string(), mode))
}
