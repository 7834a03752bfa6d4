//! Lookup lists used by keyboard navigation
//!
//! All lookups are pure functions of the tree and never fail: a target that
//! does not exist, or lies outside the tree, is reported as `None`.

use crate::entry::{EntryId, EntryKind, IndexEntry, LeafEntry};
use crate::tree::IndexTree;

impl IndexTree {
    /// Story and docs ids in depth-first order
    #[must_use]
    pub fn leaf_ids(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, entry)| entry.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Children of every component, in sidebar order
    ///
    /// Roots and groups are skipped even when they hold leaves directly.
    #[must_use]
    pub fn leaf_containers(&self) -> Vec<&[EntryId]> {
        self.iter()
            .filter(|(_, entry)| entry.kind() == EntryKind::Component)
            .filter_map(|(_, entry)| entry.children())
            .collect()
    }

    /// First leaf at or below `id`
    #[must_use]
    pub fn find_leaf_entry(&self, id: &str) -> Option<&LeafEntry> {
        let mut current = self.get(id)?;
        loop {
            match current {
                IndexEntry::Story(leaf) | IndexEntry::Docs(leaf) => return Some(leaf),
                IndexEntry::Root(c) | IndexEntry::Group(c) | IndexEntry::Component(c) => {
                    current = self.get(c.children.first()?)?;
                }
            }
        }
    }

    /// Id of the leaf `delta` positions away in depth-first leaf order
    #[must_use]
    pub fn find_leaf_by_offset(&self, id: &str, delta: isize) -> Option<&str> {
        let leaves = self.leaf_ids();
        let position = leaves.iter().position(|leaf| *leaf == id)?;
        let target = position.checked_add_signed(delta)?;
        leaves.get(target).copied()
    }

    /// Sibling leaf of `id`
    ///
    /// With `to_sibling_group == false` the sibling is taken from the same
    /// container's leaves; otherwise it is the first leaf of the container
    /// `delta` positions away among [`Self::leaf_containers`].
    #[must_use]
    pub fn find_sibling_story_id(
        &self,
        id: &str,
        delta: isize,
        to_sibling_group: bool,
    ) -> Option<&str> {
        if to_sibling_group {
            let groups = self.leaf_containers();
            let position = groups
                .iter()
                .position(|children| children.iter().any(|child| child == id))?;
            let target = groups.get(position.checked_add_signed(delta)?)?;
            return target.first().map(String::as_str);
        }

        let parent = self.get(id)?.parent()?;
        let siblings: Vec<&str> = self
            .get(parent)?
            .children()?
            .iter()
            .filter(|child| self.get(child).is_some_and(IndexEntry::is_leaf))
            .map(String::as_str)
            .collect();
        let position = siblings.iter().position(|sibling| *sibling == id)?;
        siblings.get(position.checked_add_signed(delta)?).copied()
    }
}
