//! Tree nodes.
//!
//! [`Inode`] is the set of primitives the tree builder needs from whatever
//! node type the serving runtime uses: create a directory, create a file,
//! look up a child and attach a child. [`Node`] is the in-memory
//! implementation shipped with this crate, together with the read-only
//! queries a runtime issues once the tree is built.
//!
//! # Examples
//!
//! ```
//! use embedfs::{Inode, Node};
//!
//! let mut root = Node::new_directory();
//! let dir = root.add_child("dir_a", Node::new_directory()).unwrap();
//! dir.add_child("file_a.txt", Node::new_file(b"hello".to_vec(), 0o644));
//!
//! assert_eq!(root.read_file("dir_a/file_a.txt").unwrap(), b"hello");
//! assert_eq!(root.list_dir("/").unwrap(), ["dir_a"]);
//! ```

use crate::error::{EmbedFsError, Result};
use crate::path::segments;
use std::collections::BTreeMap;
use std::collections::btree_map::{self, Entry};
use std::fmt;

/// Permission bits given to files without a mode override.
pub const DEFAULT_FILE_MODE: u32 = 0o444;

/// The two kinds of node a tree contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A node with named children
    Directory,
    /// A node with byte content and a mode
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => f.write_str("directory"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Node primitives consumed by [`TreeBuilder`](crate::TreeBuilder).
///
/// Implement this for the node type of a virtual filesystem runtime to let
/// the builder populate it directly.
pub trait Inode: Sized {
    /// Creates an empty directory node.
    fn new_directory() -> Self;

    /// Creates a file node holding `content` with permission bits `mode`.
    fn new_file(content: Vec<u8>, mode: u32) -> Self;

    /// Reports whether this node is a directory or a file.
    fn kind(&self) -> NodeKind;

    /// Looks up the child called `name`.
    fn child(&self, name: &str) -> Option<&Self>;

    /// Looks up the child called `name` for mutation.
    fn child_mut(&mut self, name: &str) -> Option<&mut Self>;

    /// Attaches `child` under `name`, replacing any existing child of that
    /// name, and returns the attached node.
    ///
    /// Returns `None` if `self` is not a directory.
    fn add_child(&mut self, name: &str, child: Self) -> Option<&mut Self>;
}

/// Children of a directory node, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    children: BTreeMap<String, Node>,
}

impl Directory {
    /// Iterates over `(name, child)` pairs in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the directory has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Content and permissions of a file node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    content: Vec<u8>,
    mode: u32,
}

impl File {
    /// Returns the file content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the permission bits.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.content.len()
    }
}

/// An in-memory, read-only tree node.
///
/// # Thread Safety
///
/// `Node` is `Send` and `Sync`. Once built, a tree can be shared across
/// threads behind an `Arc` and queried concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A directory
    Directory(Directory),
    /// A regular file
    File(File),
}

impl Node {
    /// Returns `true` for directory nodes.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Returns `true` for file nodes.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the directory data, if this is a directory.
    #[must_use]
    pub const fn as_dir(&self) -> Option<&Directory> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    /// Returns the file data, if this is a file.
    #[must_use]
    pub const fn as_file(&self) -> Option<&File> {
        match self {
            Self::File(file) => Some(file),
            Self::Directory(_) => None,
        }
    }

    /// Resolves a slash-separated path relative to this node.
    ///
    /// Leading, trailing and repeated separators are ignored; `""` and
    /// `"/"` resolve to `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::{Inode, Node};
    ///
    /// let mut root = Node::new_directory();
    /// root.add_child("a.txt", Node::new_file(Vec::new(), 0o444));
    ///
    /// assert!(root.lookup("/a.txt").is_some());
    /// assert!(root.lookup("a.txt/b").is_none());
    /// assert!(root.lookup("/").unwrap().is_dir());
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Self> {
        segments(path).try_fold(self, |node, segment| node.child(segment))
    }

    /// Reads the content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `EmbedFsError::NotFound` if nothing exists at `path` and
    /// `EmbedFsError::NotAFile` if `path` is a directory.
    pub fn read_file(&self, path: &str) -> Result<&[u8]> {
        self.file_at(path).map(File::content)
    }

    /// Returns the permission bits of the file at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`read_file`](Self::read_file).
    pub fn mode(&self, path: &str) -> Result<u32> {
        self.file_at(path).map(File::mode)
    }

    /// Lists the names of the direct children of the directory at `path`.
    ///
    /// Names are returned in sorted order.
    ///
    /// # Errors
    ///
    /// Returns `EmbedFsError::NotFound` if nothing exists at `path` and
    /// `EmbedFsError::NotADirectory` if `path` is a file.
    pub fn list_dir(&self, path: &str) -> Result<Vec<&str>> {
        match self.lookup(path) {
            Some(Self::Directory(dir)) => Ok(dir.children.keys().map(String::as_str).collect()),
            Some(Self::File(_)) => Err(EmbedFsError::NotADirectory {
                path: path.to_string(),
            }),
            None => Err(EmbedFsError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Number of file nodes in this subtree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self {
            Self::File(_) => 1,
            Self::Directory(_) => self.walk().filter(|(_, node)| node.is_file()).count(),
        }
    }

    /// Number of directory nodes below this node, not counting itself.
    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.walk().filter(|(_, node)| node.is_dir()).count()
    }

    /// Depth-first, name-ordered traversal of every node below this one.
    ///
    /// Yields `(path, node)` pairs where `path` is relative to `self` and
    /// has no leading separator. A directory is yielded before its children.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::{Inode, Node};
    ///
    /// let mut root = Node::new_directory();
    /// let a = root.add_child("a", Node::new_directory()).unwrap();
    /// a.add_child("x.txt", Node::new_file(Vec::new(), 0o444));
    ///
    /// let paths: Vec<String> = root.walk().map(|(path, _)| path).collect();
    /// assert_eq!(paths, ["a", "a/x.txt"]);
    /// ```
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        let stack = match self {
            Self::Directory(dir) => vec![(String::new(), dir.children.iter())],
            Self::File(_) => Vec::new(),
        };
        Walk { stack }
    }

    fn file_at(&self, path: &str) -> Result<&File> {
        match self.lookup(path) {
            Some(Self::File(file)) => Ok(file),
            Some(Self::Directory(_)) => Err(EmbedFsError::NotAFile {
                path: path.to_string(),
            }),
            None => Err(EmbedFsError::NotFound {
                path: path.to_string(),
            }),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new_directory()
    }
}

impl Inode for Node {
    fn new_directory() -> Self {
        Self::Directory(Directory::default())
    }

    fn new_file(content: Vec<u8>, mode: u32) -> Self {
        Self::File(File { content, mode })
    }

    fn kind(&self) -> NodeKind {
        match self {
            Self::Directory(_) => NodeKind::Directory,
            Self::File(_) => NodeKind::File,
        }
    }

    fn child(&self, name: &str) -> Option<&Self> {
        self.as_dir().and_then(|dir| dir.children.get(name))
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        match self {
            Self::Directory(dir) => dir.children.get_mut(name),
            Self::File(_) => None,
        }
    }

    fn add_child(&mut self, name: &str, child: Self) -> Option<&mut Self> {
        let Self::Directory(dir) = self else {
            return None;
        };
        let slot = match dir.children.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(child);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(child),
        };
        Some(slot)
    }
}

/// Iterator returned by [`Node::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(String, btree_map::Iter<'a, String, Node>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (base, children) = self.stack.last_mut()?;
            let Some((name, node)) = children.next() else {
                self.stack.pop();
                continue;
            };

            let path = if base.is_empty() {
                name.clone()
            } else {
                format!("{base}/{name}")
            };
            if let Node::Directory(dir) = node {
                self.stack.push((path.clone(), dir.children.iter()));
            }
            return Some((path, node));
        }
    }
}
