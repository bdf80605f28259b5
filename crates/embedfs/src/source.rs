//! Backing stores a tree is built from.
//!
//! A [`Source`] supplies two capabilities: a one-shot enumeration of every
//! entry under its root, and content access by full path. Enumerated paths
//! are slash-separated and relative to the source root; the root itself is
//! reported once as [`ROOT_MARKER`].
//!
//! Two stores are provided:
//!
//! - [`MemorySource`] holds `(path, bytes)` pairs, the shape of a resource
//!   bundle compiled into a binary.
//! - [`DirSource`] walks a directory on disk.
//!
//! # Examples
//!
//! ```
//! use embedfs::{MemorySource, Source};
//!
//! let source = MemorySource::new()
//!     .with_file("testdata/dir_a/file_a.txt", "Content of file_a.txt");
//!
//! let paths: Vec<String> = source
//!     .entries()
//!     .map(|entry| entry.unwrap().path().to_string())
//!     .collect();
//!
//! assert_eq!(paths, [".", "testdata", "testdata/dir_a", "testdata/dir_a/file_a.txt"]);
//! assert_eq!(source.read("testdata/dir_a/file_a.txt").unwrap(), b"Content of file_a.txt");
//! ```

use crate::node::NodeKind;
use crate::path::{ROOT_MARKER, SEPARATOR};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One item of a source enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    path: String,
    kind: NodeKind,
}

impl SourceEntry {
    /// Creates a regular file entry.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Directory,
        }
    }

    /// Creates the entry for the enumeration's own root.
    #[must_use]
    pub fn root() -> Self {
        Self::directory(ROOT_MARKER)
    }

    /// Full path, relative to the source root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Kind of the entry.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` for directory entries, the root marker included.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Returns `true` if this entry is the enumeration's root marker.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == ROOT_MARKER
    }
}

/// Lazy, one-shot enumeration of source entries.
pub type Entries<'a> = Box<dyn Iterator<Item = io::Result<SourceEntry>> + 'a>;

/// A read-only backing store.
pub trait Source {
    /// Enumerates every entry under the source root.
    ///
    /// The enumeration is finite and yields the root marker, directories
    /// and files. An `Err` item means the store could not be walked.
    fn entries(&self) -> Entries<'_>;

    /// Returns the complete content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file does not exist or cannot be read.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

impl<S: Source + ?Sized> Source for &S {
    fn entries(&self) -> Entries<'_> {
        (**self).entries()
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}

/// An in-memory bundle of files.
///
/// Directory entries are not stored; the enumeration synthesizes one for
/// every ancestor of a file, in depth-first name order, the way a walk of
/// an embedded filesystem reports them.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous content at `path`.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// Adds a file and returns the bundle, for chaining.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Builds a bundle from static `(path, bytes)` pairs, such as a table
    /// of `include_bytes!` results.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::MemorySource;
    ///
    /// static BUNDLE: &[(&str, &[u8])] = &[("assets/a.txt", b"a"), ("assets/b.txt", b"b")];
    ///
    /// let source = MemorySource::from_static(BUNDLE);
    /// assert_eq!(source.len(), 2);
    /// ```
    #[must_use]
    pub fn from_static(files: &[(&str, &[u8])]) -> Self {
        files
            .iter()
            .map(|(path, content)| (*path, *content))
            .collect()
    }

    /// Number of files in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the bundle holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<String>, C: Into<Vec<u8>>> FromIterator<(P, C)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (path, content) in iter {
            source.insert(path, content);
        }
        source
    }
}

impl Source for MemorySource {
    fn entries(&self) -> Entries<'_> {
        // Keyed by segments so that ordering is depth-first by name.
        let mut tree: BTreeMap<Vec<&str>, NodeKind> = BTreeMap::new();
        for path in self.files.keys() {
            let segments: Vec<&str> = path.split(SEPARATOR).collect();
            for depth in 1..segments.len() {
                tree.entry(segments[..depth].to_vec())
                    .or_insert(NodeKind::Directory);
            }
            tree.insert(segments, NodeKind::File);
        }

        let entries = tree.into_iter().map(|(segments, kind)| {
            let path = segments.join("/");
            Ok(match kind {
                NodeKind::Directory => SourceEntry::directory(path),
                NodeKind::File => SourceEntry::file(path),
            })
        });
        Box::new(std::iter::once(Ok(SourceEntry::root())).chain(entries))
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file in bundle: {path}"),
            )
        })
    }
}

/// A directory on the local filesystem.
///
/// Entries are enumerated with `walkdir` in file-name order. Symbolic
/// links are followed, so a link is reported as the kind of its target.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Creates a source rooted at `root`.
    ///
    /// The directory is not touched until the source is enumerated.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, path: &Path) -> io::Result<String> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            io::Error::other(format!(
                "walked outside source root: {}",
                path.display()
            ))
        })?;
        let relative = relative.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("path is not valid UTF-8: {}", relative.display()),
            )
        })?;

        if relative.is_empty() {
            return Ok(ROOT_MARKER.to_string());
        }
        // Normalize path separators to forward slashes for cross-platform compatibility
        Ok(relative.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}

impl Source for DirSource {
    fn entries(&self) -> Entries<'_> {
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Box::new(walker.map(move |entry| {
            let entry = entry.map_err(io::Error::from)?;
            let path = self.entry_path(entry.path())?;
            Ok(if entry.file_type().is_dir() {
                SourceEntry::directory(path)
            } else {
                SourceEntry::file(path)
            })
        }))
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(path))
    }
}
