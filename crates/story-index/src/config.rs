//! Display options that shape the tree

use serde::{Deserialize, Serialize};

/// Options the tree builder honors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Group titles with two or more segments under a root node.
    /// Unset behaves like `true`.
    pub show_roots: Option<bool>,
    /// Root ids that start collapsed
    pub collapsed_roots: Vec<String>,
    /// Keep only docs entries (and the containers that hold them)
    pub docs_mode: bool,
}

impl IndexConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With explicit show-roots setting
    #[inline]
    #[must_use]
    pub fn with_show_roots(mut self, show_roots: bool) -> Self {
        self.show_roots = Some(show_roots);
        self
    }

    /// With collapsed roots
    #[inline]
    #[must_use]
    pub fn with_collapsed_roots(mut self, roots: Vec<String>) -> Self {
        self.collapsed_roots = roots;
        self
    }

    /// With docs-only mode
    #[inline]
    #[must_use]
    pub fn with_docs_mode(mut self, docs_mode: bool) -> Self {
        self.docs_mode = docs_mode;
        self
    }

    /// Whether multi-segment titles get a root
    #[inline]
    #[must_use]
    pub fn roots_enabled(&self) -> bool {
        self.show_roots != Some(false)
    }
}
