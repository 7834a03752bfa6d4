//! Manager configuration
//!
//! Loaded from TOML; every field has a default so a partial file is valid:
//!
//! ```toml
//! index_url = "http://localhost:6006/index.json"
//! fetch_timeout_secs = 10
//!
//! [sidebar]
//! show_roots = false
//! collapsed_roots = ["design-system"]
//!
//! [docs]
//! docs_mode = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use story_index::IndexConfig;

/// Sidebar display options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Unset behaves like `true`
    pub show_roots: Option<bool>,
    pub collapsed_roots: Vec<String>,
}

/// Docs options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsOptions {
    /// Only show docs entries in the sidebar
    pub docs_mode: bool,
}

/// Stories manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Where the index is fetched from
    pub index_url: String,
    /// Sidebar options
    pub sidebar: SidebarConfig,
    /// Docs options
    pub docs: DocsOptions,
    /// Index request timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl ManagerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns an error for malformed TOML or invalid values.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid config.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Loaded manager config from {}", path.display());
        Self::from_toml_str(&input)
    }

    /// Check values that parse but cannot work
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_url.trim().is_empty() {
            return Err(ConfigError::Invalid("index_url must not be empty".to_string()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// With index url
    #[inline]
    #[must_use]
    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }

    /// With explicit show-roots setting
    #[inline]
    #[must_use]
    pub fn with_show_roots(mut self, show_roots: bool) -> Self {
        self.sidebar.show_roots = Some(show_roots);
        self
    }

    /// With docs-only mode
    #[inline]
    #[must_use]
    pub fn with_docs_mode(mut self, docs_mode: bool) -> Self {
        self.docs.docs_mode = docs_mode;
        self
    }

    /// With fetch timeout
    #[inline]
    #[must_use]
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Options the tree builder needs
    #[must_use]
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            show_roots: self.sidebar.show_roots,
            collapsed_roots: self.sidebar.collapsed_roots.clone(),
            docs_mode: self.docs.docs_mode,
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            index_url: "http://localhost:6006/index.json".to_string(),
            sidebar: SidebarConfig::default(),
            docs: DocsOptions::default(),
            fetch_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ManagerConfig::from_toml_str("[sidebar]\nshow_roots = false\n").unwrap();
        assert_eq!(config.sidebar.show_roots, Some(false));
        assert_eq!(config.fetch_timeout_secs, 30);
        assert!(!config.docs.docs_mode);
    }

    #[test]
    fn index_config_mirrors_sidebar_and_docs() {
        let config = ManagerConfig::new().with_show_roots(true).with_docs_mode(true);
        let index = config.index_config();
        assert_eq!(index.show_roots, Some(true));
        assert!(index.docs_mode);
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = ManagerConfig::from_toml_str("fetch_timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ManagerConfig::from_toml_str("index_url = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "index_url = \"http://example.test/index.json\"\n[sidebar]\ncollapsed_roots = [\"a\"]"
        )
        .unwrap();

        let config = ManagerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.index_url, "http://example.test/index.json");
        assert_eq!(config.sidebar.collapsed_roots, vec!["a".to_string()]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ManagerConfig::from_toml_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
