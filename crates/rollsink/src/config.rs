//! Writer configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for a [`crate::RotatingFileWriter`].
///
/// Deserializes from the shape an external loader supplies:
///
/// ```rust
/// use rollsink::WriterConfig;
///
/// let config: WriterConfig =
///     serde_json::from_str(r#"{ "path": "/var/log/capture.log", "sizeLimit": 1048576 }"#).unwrap();
/// assert_eq!(config.size_limit, 1_048_576);
/// assert!(!config.create_dirs);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WriterConfig {
    /// Path template; an index is inserted before the extension.
    pub path: PathBuf,

    /// Bytes per file before rotation (0 = unbounded).
    #[serde(default, alias = "sizeLimit")]
    pub size_limit: u64,

    /// Whether to create the template's parent directory before opening.
    #[serde(default, alias = "createDirs")]
    pub create_dirs: bool,
}

impl WriterConfig {
    /// Creates a configuration for the given template with no size limit.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the per-file size limit in bytes.
    #[must_use]
    pub const fn size_limit(mut self, bytes: u64) -> Self {
        self.size_limit = bytes;
        self
    }

    /// Sets whether missing parent directories are created.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }

    /// Returns true if files rotate by size.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.size_limit > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WriterConfig::new("/tmp/out.log");
        assert_eq!(config.path, PathBuf::from("/tmp/out.log"));
        assert_eq!(config.size_limit, 0);
        assert!(!config.create_dirs);
        assert!(!config.is_bounded());
    }

    #[test]
    fn builder_pattern() {
        let config = WriterConfig::new("out.log").size_limit(1024).create_dirs(true);

        assert_eq!(config.size_limit, 1024);
        assert!(config.create_dirs);
        assert!(config.is_bounded());
    }

    #[test]
    fn deserialize_snake_case() {
        let config: WriterConfig =
            serde_json::from_str(r#"{"path":"a.pcap","size_limit":10,"create_dirs":true}"#)
                .unwrap();
        assert_eq!(config, WriterConfig::new("a.pcap").size_limit(10).create_dirs(true));
    }

    #[test]
    fn deserialize_defaults_size_limit() {
        let config: WriterConfig = serde_json::from_str(r#"{"path":"a.pcap"}"#).unwrap();
        assert_eq!(config.size_limit, 0);
    }

    #[test]
    fn deserialize_requires_path() {
        let result: Result<WriterConfig, _> = serde_json::from_str(r#"{"sizeLimit":10}"#);
        assert!(result.is_err());
    }
}
