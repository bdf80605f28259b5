//! Error types for tree construction and tree queries.
//!
//! All variants carry the offending path (when there is one) and the
//! classification helpers make it easy to branch on the error kind without
//! matching on every field.
//!
//! # Examples
//!
//! ```
//! use embedfs::EmbedFsError;
//!
//! let error = EmbedFsError::NotFound {
//!     path: "dir_a/missing.txt".to_string(),
//! };
//!
//! assert!(error.is_not_found());
//! assert!(!error.is_fatal_build_error());
//! ```

use crate::node::NodeKind;
use std::io;
use thiserror::Error;

/// Errors produced while building or querying a tree.
///
/// The first four variants are build failures: any of them aborts
/// [`TreeBuilder::populate`](crate::TreeBuilder::populate) and the caller
/// must not serve whatever was attached to the root before the failure.
#[derive(Error, Debug)]
pub enum EmbedFsError {
    /// The source enumeration itself failed (backing store unreadable).
    #[error("Failed to enumerate source: {source}")]
    Enumeration {
        /// Underlying I/O error from the backing store
        source: io::Error,
    },

    /// The content of a single file could not be read.
    #[error("Failed to read content of {path}: {source}")]
    ContentRead {
        /// Full source path, prefix included
        path: String,
        /// Underlying I/O error from the backing store
        source: io::Error,
    },

    /// A path segment is occupied by a node of the wrong kind.
    #[error("Structural conflict at {path}: expected a {expected}")]
    StructuralConflict {
        /// Relative path of the conflicting node
        path: String,
        /// The kind of node the walk needed at that path
        expected: NodeKind,
    },

    /// A source path cannot be placed in the tree.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath {
        /// The rejected path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// Nothing exists at the queried path.
    #[error("File not found: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// The queried path exists but is a file.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory
        path: String,
    },

    /// The queried path exists but is a directory.
    #[error("Not a file: {path}")]
    NotAFile {
        /// The path that is not a file
        path: String,
    },

    /// A mount configuration could not be loaded.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// Description of the problem
        reason: String,
    },
}

impl EmbedFsError {
    /// Returns `true` if this error aborts a tree build.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::{EmbedFsError, NodeKind};
    ///
    /// let error = EmbedFsError::StructuralConflict {
    ///     path: "a/b".to_string(),
    ///     expected: NodeKind::Directory,
    /// };
    ///
    /// assert!(error.is_fatal_build_error());
    /// ```
    #[must_use]
    pub const fn is_fatal_build_error(&self) -> bool {
        matches!(
            self,
            Self::Enumeration { .. }
                | Self::ContentRead { .. }
                | Self::StructuralConflict { .. }
                | Self::InvalidPath { .. }
        )
    }

    /// Returns `true` if this is a structural conflict.
    #[must_use]
    pub const fn is_structural_conflict(&self) -> bool {
        matches!(self, Self::StructuralConflict { .. })
    }

    /// Returns `true` if this is a file not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::EmbedFsError;
    ///
    /// let error = EmbedFsError::NotFound {
    ///     path: "missing".to_string(),
    /// };
    ///
    /// assert!(error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if a path was used with the wrong node kind.
    #[must_use]
    pub const fn is_wrong_kind(&self) -> bool {
        matches!(self, Self::NotADirectory { .. } | Self::NotAFile { .. })
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, EmbedFsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_errors_are_fatal() {
        let enumeration = EmbedFsError::Enumeration {
            source: io::Error::other("unreadable"),
        };
        let read = EmbedFsError::ContentRead {
            path: "testdata/a.txt".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let invalid = EmbedFsError::InvalidPath {
            path: "../escape".to_string(),
            reason: "parent reference".to_string(),
        };

        assert!(enumeration.is_fatal_build_error());
        assert!(read.is_fatal_build_error());
        assert!(invalid.is_fatal_build_error());
    }

    #[test]
    fn test_query_errors_are_not_fatal() {
        let error = EmbedFsError::NotADirectory {
            path: "file.txt".to_string(),
        };
        assert!(!error.is_fatal_build_error());
        assert!(error.is_wrong_kind());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_structural_conflict_display() {
        let error = EmbedFsError::StructuralConflict {
            path: "dir_a".to_string(),
            expected: NodeKind::Directory,
        };
        assert!(error.is_structural_conflict());
        assert_eq!(
            error.to_string(),
            "Structural conflict at dir_a: expected a directory"
        );
    }

    #[test]
    fn test_content_read_keeps_source() {
        use std::error::Error as _;

        let error = EmbedFsError::ContentRead {
            path: "testdata/a.txt".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(error.source().is_some());
        assert!(error.to_string().contains("testdata/a.txt"));
    }
}
