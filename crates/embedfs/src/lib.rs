//! Read-only directory trees built from embedded file bundles.
//!
//! `embedfs` turns a flat enumeration of `(path, bytes)` pairs into a nested
//! directory/file node graph that a virtual filesystem runtime can serve.
//! The tree is built once, synchronously, before it is handed over.
//!
//! # Features
//!
//! - **Prefix stripping**: expose a subtree of the bundle as the root
//! - **Inferred directories**: each directory is created exactly once,
//!   whatever order the source reports files in
//! - **Mode overrides**: per-file permission bits, exact-path matched
//! - **Pluggable nodes**: populate any runtime's node type through [`Inode`]
//! - **Fail-fast**: the first enumeration, read or structural error aborts
//!   the build
//!
//! # Examples
//!
//! ```
//! use embedfs::{MemorySource, TreeBuilder};
//!
//! let source = MemorySource::new()
//!     .with_file("testdata/dir_a/file_a.txt", "Content of file_a.txt")
//!     .with_file("testdata/dir_b/file_b.txt", "Content of file_b.txt");
//!
//! let root = TreeBuilder::new(source, "testdata")
//!     .with_mode("dir_a/file_a.txt", 0o644)
//!     .build()?;
//!
//! assert_eq!(root.list_dir("/")?, ["dir_a", "dir_b"]);
//! assert_eq!(root.read_file("dir_b/file_b.txt")?, b"Content of file_b.txt");
//! # Ok::<(), embedfs::EmbedFsError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod config;
pub mod error;
pub mod modes;
pub mod node;
pub mod path;
pub mod source;

// Re-export main types
pub use builder::{BuildStats, TreeBuilder};
pub use config::MountConfig;
pub use error::{EmbedFsError, Result};
pub use modes::ModeOverrides;
pub use node::{DEFAULT_FILE_MODE, Directory, File, Inode, Node, NodeKind};
pub use path::{Prefix, RelativePath};
pub use source::{DirSource, Entries, MemorySource, Source, SourceEntry};
