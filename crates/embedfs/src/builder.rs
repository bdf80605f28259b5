//! Tree construction.
//!
//! [`TreeBuilder`] walks a [`Source`] once and attaches a node for every
//! file under a caller-supplied root. Directories are never taken from the
//! source's directory entries; they are inferred from file paths and
//! created the first time a path needs them.
//!
//! # Examples
//!
//! ```
//! use embedfs::{MemorySource, TreeBuilder, DEFAULT_FILE_MODE};
//!
//! let source = MemorySource::new()
//!     .with_file("testdata/dir_a/file_a.txt", "Content of file_a.txt")
//!     .with_file("testdata/dir_b/file_b.txt", "Content of file_b.txt");
//!
//! let mut builder = TreeBuilder::new(source, "testdata");
//! builder.chmod("dir_a/file_a.txt", 0o644);
//!
//! let root = builder.build()?;
//! assert_eq!(root.list_dir("")?, ["dir_a", "dir_b"]);
//! assert_eq!(root.read_file("dir_a/file_a.txt")?, b"Content of file_a.txt");
//! assert_eq!(root.mode("dir_a/file_a.txt")?, 0o644);
//! assert_eq!(root.mode("dir_b/file_b.txt")?, DEFAULT_FILE_MODE);
//! # Ok::<(), embedfs::EmbedFsError>(())
//! ```

use crate::error::{EmbedFsError, Result};
use crate::modes::ModeOverrides;
use crate::node::{DEFAULT_FILE_MODE, Inode, Node, NodeKind};
use crate::path::{Prefix, RelativePath};
use crate::source::{Source, SourceEntry};
use std::io;

/// Counters describing one completed build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// File nodes attached, duplicates included
    pub files_placed: usize,
    /// Directory nodes created
    pub directories_created: usize,
    /// Root marker and directory entries passed over
    pub entries_skipped: usize,
    /// Files that replaced an earlier file at the same path
    pub files_replaced: usize,
    /// Files whose mode came from the override table
    pub overrides_applied: usize,
}

/// What the walk does with one enumerated item.
enum Visit {
    Skip(SourceEntry),
    Place(SourceEntry),
    Fatal(EmbedFsError),
}

impl Visit {
    fn classify(item: io::Result<SourceEntry>) -> Self {
        match item {
            Err(source) => Self::Fatal(EmbedFsError::Enumeration { source }),
            Ok(entry) if entry.is_root() || entry.is_dir() => Self::Skip(entry),
            Ok(entry) => Self::Place(entry),
        }
    }
}

/// Builds a directory tree from a flat source enumeration.
///
/// Create it with a source and a prefix, register mode overrides with
/// [`chmod`](Self::chmod), then run [`populate`](Self::populate) against
/// the root node handed out by the serving runtime (or [`build`](Self::build)
/// for a fresh in-memory [`Node`]).
///
/// The override table cannot change during a walk: `populate` borrows the
/// builder immutably.
#[derive(Debug, Clone)]
pub struct TreeBuilder<S> {
    source: S,
    prefix: Prefix,
    modes: ModeOverrides,
    default_mode: u32,
}

impl<S: Source> TreeBuilder<S> {
    /// Creates a builder over `source` that strips `prefix` from every path.
    ///
    /// The prefix is normalized here, once, so every entry of every build is
    /// stripped identically; see [`Prefix::new`].
    #[must_use]
    pub fn new(source: S, prefix: &str) -> Self {
        Self {
            source,
            prefix: Prefix::new(prefix),
            modes: ModeOverrides::new(),
            default_mode: DEFAULT_FILE_MODE,
        }
    }

    /// Registers a mode override for the file at `path`.
    ///
    /// `path` is relative to the stripped root; a single leading `/` is
    /// ignored.
    pub fn chmod(&mut self, path: &str, mode: u32) -> &mut Self {
        self.modes.set(path, mode);
        self
    }

    /// Registers a mode override and returns the builder, for chaining.
    #[must_use]
    pub fn with_mode(mut self, path: &str, mode: u32) -> Self {
        self.chmod(path, mode);
        self
    }

    /// Replaces the whole override table.
    #[must_use]
    pub fn with_modes(mut self, modes: ModeOverrides) -> Self {
        self.modes = modes;
        self
    }

    /// Sets the mode given to files without an override.
    #[must_use]
    pub const fn with_default_mode(mut self, mode: u32) -> Self {
        self.default_mode = mode;
        self
    }

    /// Returns the normalized prefix.
    #[must_use]
    pub const fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Returns the override table.
    #[must_use]
    pub const fn modes(&self) -> &ModeOverrides {
        &self.modes
    }

    /// Returns the mode given to files without an override.
    #[must_use]
    pub const fn default_mode(&self) -> u32 {
        self.default_mode
    }

    /// Returns the backing source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Walks the source and attaches every file under `root`.
    ///
    /// Entries are processed strictly one at a time. Missing directories are
    /// created once and reused; a file whose path was already placed
    /// replaces the earlier node.
    ///
    /// # Errors
    ///
    /// Stops at the first failure and returns it:
    ///
    /// - `EmbedFsError::Enumeration` if the source cannot be walked
    /// - `EmbedFsError::ContentRead` if a file's content cannot be read
    /// - `EmbedFsError::StructuralConflict` if a path needs a directory where
    ///   a file exists, or a file where a directory exists
    /// - `EmbedFsError::InvalidPath` if a path contains `..` or has no name
    ///
    /// After an error `root` may hold some of the nodes; it must not be
    /// served.
    pub fn populate<N: Inode>(&self, root: &mut N) -> Result<BuildStats> {
        let mut stats = BuildStats::default();

        for item in self.source.entries() {
            match Visit::classify(item) {
                Visit::Skip(entry) => {
                    tracing::trace!("Skipping directory entry {}", entry.path());
                    stats.entries_skipped += 1;
                }
                Visit::Place(entry) => self.place(root, &entry, &mut stats)?,
                Visit::Fatal(error) => {
                    tracing::error!("Tree build aborted: {error}");
                    return Err(error);
                }
            }
        }

        tracing::info!(
            files = stats.files_placed,
            directories = stats.directories_created,
            overrides = stats.overrides_applied,
            "Built tree under prefix '{}'",
            self.prefix
        );
        Ok(stats)
    }

    /// Builds a tree under a fresh, empty [`Node`] directory.
    ///
    /// # Errors
    ///
    /// Same as [`populate`](Self::populate).
    pub fn build(&self) -> Result<Node> {
        let mut root = Node::new_directory();
        self.populate(&mut root)?;
        Ok(root)
    }

    fn place<N: Inode>(
        &self,
        root: &mut N,
        entry: &SourceEntry,
        stats: &mut BuildStats,
    ) -> Result<()> {
        let stripped = self.prefix.strip(entry.path()).unwrap_or_else(|| {
            if !self.prefix.is_empty() {
                tracing::warn!(
                    "{} is outside prefix '{}', placing it unchanged",
                    entry.path(),
                    self.prefix
                );
            }
            entry.path()
        });
        let relative = RelativePath::parse(stripped)?;
        let key = relative.key();

        let parent = descend(root, &relative, stats)?;
        match parent.child(relative.name()).map(N::kind) {
            Some(NodeKind::Directory) => {
                return Err(EmbedFsError::StructuralConflict {
                    path: key,
                    expected: NodeKind::File,
                });
            }
            Some(NodeKind::File) => {
                tracing::debug!("Replacing earlier file at {key}");
                stats.files_replaced += 1;
            }
            None => {}
        }

        // Content is addressed by the unstripped path.
        let content = self
            .source
            .read(entry.path())
            .map_err(|source| EmbedFsError::ContentRead {
                path: entry.path().to_string(),
                source,
            })?;

        let mode = if let Some(mode) = self.modes.get(&key) {
            stats.overrides_applied += 1;
            mode
        } else {
            self.default_mode
        };

        tracing::debug!("Placing {key} ({} bytes, mode {mode:o})", content.len());
        parent
            .add_child(relative.name(), N::new_file(content, mode))
            .ok_or_else(|| EmbedFsError::StructuralConflict {
                path: relative.dirs().join("/"),
                expected: NodeKind::Directory,
            })?;
        stats.files_placed += 1;
        Ok(())
    }
}

/// Follows `relative`'s directory segments from `root`, creating any
/// directory that does not exist yet, and returns the file's parent.
fn descend<'n, N: Inode>(
    root: &'n mut N,
    relative: &RelativePath<'_>,
    stats: &mut BuildStats,
) -> Result<&'n mut N> {
    let mut current = root;
    let mut walked = String::new();

    for segment in relative.dirs() {
        if !walked.is_empty() {
            walked.push('/');
        }
        walked.push_str(segment);

        let next = match current.child(segment).map(N::kind) {
            Some(NodeKind::Directory) => current.child_mut(segment),
            Some(NodeKind::File) => None,
            None => {
                tracing::debug!("Creating directory {walked}");
                stats.directories_created += 1;
                current.add_child(segment, N::new_directory())
            }
        };
        current = next.ok_or_else(|| EmbedFsError::StructuralConflict {
            path: walked.clone(),
            expected: NodeKind::Directory,
        })?;
    }

    Ok(current)
}
