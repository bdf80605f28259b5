//! Subcommand implementations.
//!
//! Every subcommand builds the tree from scratch, then queries it through
//! the same read-only API a serving runtime would use.

use crate::cli::SourceArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use embedfs::{DirSource, MountConfig, Node};
use std::io::{self, Write};
use tracing::debug;

/// Builds the tree described by `args`.
///
/// Command-line `--prefix` wins over the config file; `--chmod` entries
/// are applied after the config file's overrides.
///
/// # Errors
///
/// Returns an error if the config file is invalid or the build fails.
pub fn load(args: &SourceArgs) -> Result<Node> {
    let mut config = match &args.config {
        Some(path) => MountConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MountConfig::default(),
    };
    if let Some(prefix) = &args.prefix {
        config.prefix.clone_from(prefix);
    }
    debug!("Building tree from {} with prefix '{}'", args.dir.display(), config.prefix);

    let mut builder = config.builder(DirSource::new(&args.dir));
    for (path, mode) in &args.chmod {
        builder.chmod(path, *mode);
    }

    builder
        .build()
        .with_context(|| format!("failed to build tree from {}", args.dir.display()))
}

/// Prints every node of the tree, one per line.
///
/// # Errors
///
/// Returns an error if the tree cannot be built.
pub fn tree(args: &SourceArgs) -> Result<()> {
    let root = load(args)?;
    print!("{}", render_tree(&root));
    Ok(())
}

/// Writes the content of the file at `path` to stdout.
///
/// # Errors
///
/// Returns an error if the tree cannot be built, `path` is not a file or
/// stdout cannot be written.
pub fn cat(args: &SourceArgs, path: &str) -> Result<()> {
    let root = load(args)?;
    let content = root
        .read_file(path)
        .with_context(|| format!("cannot read {path}"))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(content).context("failed to write to stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Prints details of the node at `path`, or a tree summary without one.
///
/// # Errors
///
/// Returns an error if the tree cannot be built or `path` does not exist.
pub fn stat(args: &SourceArgs, path: Option<&str>) -> Result<()> {
    let root = load(args)?;
    let path = path.unwrap_or("/");
    let node = root
        .lookup(path)
        .with_context(|| format!("no such file or directory: {path}"))?;

    println!("{} {}", "Path:".bold(), path);
    for (label, value) in describe(node) {
        println!("{} {}", format!("{label}:").bold(), value.yellow());
    }
    Ok(())
}

/// Renders the tree as an indented listing in walk order.
///
/// Directories end with `/`; files show their octal mode and size.
#[must_use]
pub fn render_tree(root: &Node) -> String {
    let mut out = String::new();
    for (path, node) in root.walk() {
        let depth = path.matches('/').count();
        let name = path.rsplit('/').next().unwrap_or(&path);
        out.push_str(&"  ".repeat(depth));
        match node {
            Node::Directory(_) => {
                out.push_str(name);
                out.push_str("/\n");
            }
            Node::File(file) => {
                out.push_str(&format!(
                    "{name} ({:04o}, {} bytes)\n",
                    file.mode(),
                    file.size()
                ));
            }
        }
    }
    out
}

/// Label/value pairs describing one node.
#[must_use]
pub fn describe(node: &Node) -> Vec<(&'static str, String)> {
    match node {
        Node::Directory(dir) => vec![
            ("Kind", "directory".to_string()),
            ("Entries", dir.len().to_string()),
            ("Files", node.file_count().to_string()),
            ("Directories", node.dir_count().to_string()),
        ],
        Node::File(file) => vec![
            ("Kind", "file".to_string()),
            ("Mode", format!("{:04o}", file.mode())),
            ("Size", format!("{} bytes", file.size())),
        ],
    }
}
