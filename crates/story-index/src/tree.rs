//! Ordered sidebar tree
//!
//! Provides [`IndexTree`], an insertion-ordered map from entry id to
//! [`IndexEntry`]. Iteration order is sidebar order: each container is
//! immediately followed by its subtree.

use crate::entry::{EntryId, IndexEntry, LeafEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered sidebar tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexTree {
    entries: IndexMap<EntryId, IndexEntry>,
}

impl IndexTree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.id().to_string(), entry);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut IndexEntry> {
        self.entries.get_mut(id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Story or docs entry by id
    #[must_use]
    pub fn leaf(&self, id: &str) -> Option<&LeafEntry> {
        self.get(id).and_then(IndexEntry::as_leaf)
    }

    /// Mutable story or docs entry by id
    pub fn leaf_mut(&mut self, id: &str) -> Option<&mut LeafEntry> {
        self.get_mut(id).and_then(IndexEntry::as_leaf_mut)
    }

    /// Ids in sidebar order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in sidebar order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries in sidebar order, mutable
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut IndexEntry)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries without a parent, in sidebar order
    pub fn top_level(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values().filter(|e| e.parent().is_none())
    }
}

impl<'a> IntoIterator for &'a IndexTree {
    type Item = (&'a EntryId, &'a IndexEntry);
    type IntoIter = indexmap::map::Iter<'a, EntryId, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
