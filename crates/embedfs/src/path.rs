//! Prefix stripping and relative path handling.
//!
//! Source paths are always slash-separated, whatever the host platform.
//! A [`Prefix`] is normalized once, before a walk starts, so every entry of
//! a build is stripped the same way.
//!
//! # Examples
//!
//! ```
//! use embedfs::{Prefix, RelativePath};
//!
//! let prefix = Prefix::new("testdata");
//! let stripped = prefix.strip("testdata/dir_a/file_a.txt").unwrap();
//! assert_eq!(stripped, "dir_a/file_a.txt");
//!
//! let relative = RelativePath::parse(stripped).unwrap();
//! assert_eq!(relative.dirs(), ["dir_a"]);
//! assert_eq!(relative.name(), "file_a.txt");
//! ```

use crate::error::{EmbedFsError, Result};
use std::fmt;

/// Separator used by every source path.
pub const SEPARATOR: char = '/';

/// Path the source enumeration uses for its own root entry.
pub const ROOT_MARKER: &str = ".";

/// The part of every source path that is removed before tree placement.
///
/// The stored form is either empty (nothing to strip) or the trimmed prefix
/// followed by exactly one separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Prefix(String);

impl Prefix {
    /// Normalizes `raw` into a prefix.
    ///
    /// Leading and trailing separators are trimmed, then one separator is
    /// appended. An empty prefix, or one that is only the root marker,
    /// strips nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::Prefix;
    ///
    /// assert_eq!(Prefix::new("testdata").as_str(), "testdata/");
    /// assert_eq!(Prefix::new("/testdata/").as_str(), "testdata/");
    /// assert_eq!(Prefix::new("").as_str(), "");
    /// assert_eq!(Prefix::new(".").as_str(), "");
    /// ```
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim_matches(SEPARATOR);
        if trimmed.is_empty() || trimmed == ROOT_MARKER {
            Self(String::new())
        } else {
            Self(format!("{trimmed}{SEPARATOR}"))
        }
    }

    /// Returns the normalized prefix, separator included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this prefix strips nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes the prefix from `path`.
    ///
    /// Returns `None` if `path` does not start with the prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::Prefix;
    ///
    /// let prefix = Prefix::new("testdata");
    /// assert_eq!(prefix.strip("testdata/a.txt"), Some("a.txt"));
    /// assert_eq!(prefix.strip("other/a.txt"), None);
    /// ```
    #[must_use]
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.0.as_str())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stripped source path split into directory segments and a base name.
///
/// Empty segments and `.` segments are dropped, so `a//b/./c.txt` places
/// `c.txt` under `a/b`. Parent references are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativePath<'a> {
    dirs: Vec<&'a str>,
    name: &'a str,
}

impl<'a> RelativePath<'a> {
    /// Parses a stripped, slash-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedFsError::InvalidPath`] if the path contains a `..`
    /// segment or has no base name.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::RelativePath;
    ///
    /// let path = RelativePath::parse("a/b/c.txt")?;
    /// assert_eq!(path.dirs(), ["a", "b"]);
    /// assert_eq!(path.key(), "a/b/c.txt");
    ///
    /// assert!(RelativePath::parse("a/../c.txt").is_err());
    /// assert!(RelativePath::parse("a/").is_err());
    /// # Ok::<(), embedfs::EmbedFsError>(())
    /// ```
    pub fn parse(path: &'a str) -> Result<Self> {
        let mut segments = Vec::new();
        for segment in path.split(SEPARATOR) {
            match segment {
                "" | ROOT_MARKER => {}
                ".." => {
                    return Err(EmbedFsError::InvalidPath {
                        path: path.to_string(),
                        reason: "contains a parent directory reference".to_string(),
                    });
                }
                _ => segments.push(segment),
            }
        }

        // A trailing separator means the last segment is a directory name.
        let name = if path.ends_with(SEPARATOR) {
            None
        } else {
            segments.pop()
        };

        name.map_or_else(
            || {
                Err(EmbedFsError::InvalidPath {
                    path: path.to_string(),
                    reason: "has no file name".to_string(),
                })
            },
            |name| {
                Ok(Self {
                    dirs: segments,
                    name,
                })
            },
        )
    }

    /// Directory segments leading to the file, outermost first.
    #[must_use]
    pub fn dirs(&self) -> &[&'a str] {
        &self.dirs
    }

    /// The final path segment.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Canonical slash-joined form, used as the mode override key.
    #[must_use]
    pub fn key(&self) -> String {
        let mut key = self.dirs.join("/");
        if !key.is_empty() {
            key.push(SEPARATOR);
        }
        key.push_str(self.name);
        key
    }
}

/// Iterates the non-empty segments of a query path.
///
/// Used by tree lookups, where both `"/a/b"` and `"a/b"` address the same
/// node and `""` or `"/"` address the root.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR)
        .filter(|segment| !segment.is_empty() && *segment != ROOT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_appends_single_separator() {
        assert_eq!(Prefix::new("testdata").as_str(), "testdata/");
        assert_eq!(Prefix::new("testdata/").as_str(), "testdata/");
        assert_eq!(Prefix::new("testdata//").as_str(), "testdata/");
        assert_eq!(Prefix::new("a/b").as_str(), "a/b/");
    }

    #[test]
    fn test_prefix_empty() {
        let prefix = Prefix::new("");
        assert!(prefix.is_empty());
        assert_eq!(prefix.strip("dir_a/file_a.txt"), Some("dir_a/file_a.txt"));
    }

    #[test]
    fn test_prefix_strip() {
        let prefix = Prefix::new("testdata");
        assert_eq!(
            prefix.strip("testdata/dir_a/file_a.txt"),
            Some("dir_a/file_a.txt")
        );
        assert_eq!(prefix.strip("testdata"), None);
        assert_eq!(prefix.strip("testdatax/file.txt"), None);
    }

    #[test]
    fn test_prefix_display() {
        assert_eq!(format!("{}", Prefix::new("assets")), "assets/");
    }

    #[test]
    fn test_parse_top_level_file() {
        let path = RelativePath::parse("readme.md").unwrap();
        assert!(path.dirs().is_empty());
        assert_eq!(path.name(), "readme.md");
        assert_eq!(path.key(), "readme.md");
    }

    #[test]
    fn test_parse_nested_file() {
        let path = RelativePath::parse("a/b/c/d.txt").unwrap();
        assert_eq!(path.dirs(), ["a", "b", "c"]);
        assert_eq!(path.name(), "d.txt");
    }

    #[test]
    fn test_parse_drops_empty_and_dot_segments() {
        let path = RelativePath::parse("/a//./b/c.txt").unwrap();
        assert_eq!(path.dirs(), ["a", "b"]);
        assert_eq!(path.key(), "a/b/c.txt");
    }

    #[test]
    fn test_parse_rejects_parent_reference() {
        let err = RelativePath::parse("a/../../etc/passwd").unwrap_err();
        assert!(matches!(err, EmbedFsError::InvalidPath { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_name() {
        assert!(RelativePath::parse("").is_err());
        assert!(RelativePath::parse("dir/").is_err());
        assert!(RelativePath::parse("./").is_err());
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("/a//b/").collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(segments("").count(), 0);
        assert_eq!(segments("/").count(), 0);
        assert_eq!(segments(".").count(), 0);
    }
}
