//! Mount configuration.
//!
//! A [`MountConfig`] describes what a build should expose: which prefix to
//! strip, the mode given to files by default and per-file mode overrides.
//! It is stored as TOML.
//!
//! # Examples
//!
//! ```toml
//! prefix = "testdata"
//! default_mode = 0o444
//!
//! [modes]
//! "dir_a/file_a.txt" = 0o644
//! "bin/run.sh" = 0o755
//! ```

use crate::builder::TreeBuilder;
use crate::error::{EmbedFsError, Result};
use crate::modes::ModeOverrides;
use crate::node::DEFAULT_FILE_MODE;
use crate::source::Source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Largest value a mode may take: permission bits plus setuid, setgid and
/// sticky.
pub const MAX_MODE: u32 = 0o7777;

/// Configuration for one tree build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MountConfig {
    /// Prefix stripped from every source path
    #[serde(default)]
    pub prefix: String,

    /// Mode for files without an override
    #[serde(default = "default_mode")]
    pub default_mode: u32,

    /// Per-file overrides, keyed by path relative to the stripped root
    #[serde(default)]
    pub modes: BTreeMap<String, u32>,
}

const fn default_mode() -> u32 {
    DEFAULT_FILE_MODE
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            default_mode: DEFAULT_FILE_MODE,
            modes: BTreeMap::new(),
        }
    }
}

impl MountConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `EmbedFsError::Config` if the document is not valid TOML,
    /// has unknown keys, or fails [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::MountConfig;
    ///
    /// let config = MountConfig::from_toml_str(r#"
    ///     prefix = "testdata"
    ///
    ///     [modes]
    ///     "dir_a/file_a.txt" = 0o644
    /// "#)?;
    ///
    /// assert_eq!(config.prefix, "testdata");
    /// assert_eq!(config.modes["dir_a/file_a.txt"], 0o644);
    /// # Ok::<(), embedfs::EmbedFsError>(())
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| EmbedFsError::Config {
            reason: format!("failed to parse config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `EmbedFsError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EmbedFsError::Config {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        tracing::debug!("Loaded mount config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Serializes the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns `EmbedFsError::Config` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EmbedFsError::Config {
            reason: format!("failed to serialize config: {e}"),
        })
    }

    /// Checks that every mode fits in [`MAX_MODE`] and every override path
    /// is a plain relative path.
    ///
    /// # Errors
    ///
    /// Returns `EmbedFsError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.default_mode > MAX_MODE {
            return Err(EmbedFsError::Config {
                reason: format!("default_mode {:o} exceeds {MAX_MODE:o}", self.default_mode),
            });
        }

        for (path, mode) in &self.modes {
            if *mode > MAX_MODE {
                return Err(EmbedFsError::Config {
                    reason: format!("mode {mode:o} for {path} exceeds {MAX_MODE:o}"),
                });
            }
            if path.trim_start_matches('/').is_empty() {
                return Err(EmbedFsError::Config {
                    reason: "mode override with an empty path".to_string(),
                });
            }
            if path.split('/').any(|segment| segment == "..") {
                return Err(EmbedFsError::Config {
                    reason: format!("mode override path {path} contains '..'"),
                });
            }
        }

        Ok(())
    }

    /// Collects the overrides into a [`ModeOverrides`] table.
    #[must_use]
    pub fn mode_overrides(&self) -> ModeOverrides {
        self.modes
            .iter()
            .map(|(path, mode)| (path.as_str(), *mode))
            .collect()
    }

    /// Creates a [`TreeBuilder`] over `source` configured by `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs::{MemorySource, MountConfig};
    ///
    /// let config = MountConfig::from_toml_str(r#"
    ///     prefix = "assets"
    ///     default_mode = 0o400
    /// "#)?;
    /// let source = MemorySource::new().with_file("assets/logo.svg", "<svg/>");
    ///
    /// let root = config.builder(source).build()?;
    /// assert_eq!(root.mode("logo.svg")?, 0o400);
    /// # Ok::<(), embedfs::EmbedFsError>(())
    /// ```
    #[must_use]
    pub fn builder<S: Source>(&self, source: S) -> TreeBuilder<S> {
        TreeBuilder::new(source, &self.prefix)
            .with_default_mode(self.default_mode)
            .with_modes(self.mode_overrides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MountConfig::default();
        assert!(config.prefix.is_empty());
        assert_eq!(config.default_mode, DEFAULT_FILE_MODE);
        assert!(config.modes.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = MountConfig::from_toml_str("").unwrap();
        assert_eq!(config, MountConfig::default());
    }

    #[test]
    fn test_parse_octal_modes() {
        let config = MountConfig::from_toml_str(
            r#"
            prefix = "testdata"
            default_mode = 0o440

            [modes]
            "dir_a/file_a.txt" = 0o644
            "/bin/run.sh" = 493
            "#,
        )
        .unwrap();

        assert_eq!(config.default_mode, 0o440);
        assert_eq!(config.modes["dir_a/file_a.txt"], 0o644);
        assert_eq!(config.modes["/bin/run.sh"], 0o755);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = MountConfig::from_toml_str("prefx = \"typo\"").unwrap_err();
        assert!(matches!(err, EmbedFsError::Config { .. }));
    }

    #[test]
    fn test_mode_out_of_range_rejected() {
        let err = MountConfig::from_toml_str("default_mode = 0o17777").unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let err = MountConfig::from_toml_str("[modes]\n\"a\" = 0o10000").unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_invalid_override_paths_rejected() {
        assert!(MountConfig::from_toml_str("[modes]\n\"../a\" = 0o644").is_err());
        assert!(MountConfig::from_toml_str("[modes]\n\"/\" = 0o644").is_err());
    }

    #[test]
    fn test_mode_overrides_strip_leading_slash() {
        let config = MountConfig::from_toml_str("[modes]\n\"/bin/run.sh\" = 0o755").unwrap();
        let modes = config.mode_overrides();
        assert_eq!(modes.get("bin/run.sh"), Some(0o755));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = MountConfig {
            prefix: "assets".to_string(),
            ..MountConfig::default()
        };
        config.modes.insert("a.txt".to_string(), 0o600);

        let text = config.to_toml_string().unwrap();
        assert_eq!(MountConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mount.toml");
        fs::write(&path, "prefix = \"testdata\"\n").unwrap();

        let config = MountConfig::from_file(&path).unwrap();
        assert_eq!(config.prefix, "testdata");
    }

    #[test]
    fn test_from_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = MountConfig::from_file(temp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, EmbedFsError::Config { .. }));
    }

    #[test]
    fn test_builder_applies_config() {
        let config = MountConfig::from_toml_str(
            r#"
            prefix = "testdata"
            default_mode = 0o400

            [modes]
            "dir_a/file_a.txt" = 0o644
            "#,
        )
        .unwrap();
        let source = MemorySource::new()
            .with_file("testdata/dir_a/file_a.txt", "a")
            .with_file("testdata/dir_b/file_b.txt", "b");

        let root = config.builder(source).build().unwrap();
        assert_eq!(root.mode("dir_a/file_a.txt").unwrap(), 0o644);
        assert_eq!(root.mode("dir_b/file_b.txt").unwrap(), 0o400);
    }
}
