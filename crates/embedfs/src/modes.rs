//! Per-file permission overrides.
//!
//! Keys are relative paths with the prefix already stripped. Lookups are
//! exact: there is no glob matching and a directory's entry never applies
//! to its children.

use std::collections::HashMap;

/// Mapping from relative file path to the mode it should be served with.
///
/// # Examples
///
/// ```
/// use embedfs::ModeOverrides;
///
/// let mut modes = ModeOverrides::new();
/// modes.set("/bin/run.sh", 0o755);
///
/// assert_eq!(modes.get("bin/run.sh"), Some(0o755));
/// assert_eq!(modes.get("bin/other.sh"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeOverrides {
    modes: HashMap<String, u32>,
}

impl ModeOverrides {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `mode` for `path`, replacing any earlier value.
    ///
    /// A single leading `/` is removed from `path` first.
    pub fn set(&mut self, path: &str, mode: u32) {
        let key = normalize(path);
        tracing::debug!("Registered mode override {key}: {mode:o}");
        self.modes.insert(key.to_string(), mode);
    }

    /// Looks up the override for exactly `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<u32> {
        self.modes.get(path).copied()
    }

    /// Number of registered overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Returns `true` if no override is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Iterates over `(path, mode)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.modes.iter().map(|(path, mode)| (path.as_str(), *mode))
    }
}

impl<P: AsRef<str>> FromIterator<(P, u32)> for ModeOverrides {
    fn from_iter<I: IntoIterator<Item = (P, u32)>>(iter: I) -> Self {
        let mut modes = Self::new();
        modes.extend(iter);
        modes
    }
}

impl<P: AsRef<str>> Extend<(P, u32)> for ModeOverrides {
    fn extend<I: IntoIterator<Item = (P, u32)>>(&mut self, iter: I) {
        for (path, mode) in iter {
            self.set(path.as_ref(), mode);
        }
    }
}

fn normalize(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
