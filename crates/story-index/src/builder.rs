//! Tree ordering (second pass of tree construction)
//!
//! Rootless subtrees come first, then rooted subtrees; within each group
//! subtrees appear in first-seen order and are emitted depth-first, pre-order.

use crate::config::IndexConfig;
use crate::entry::{EntryId, EntryKind, EntryType, IndexEntry, RawEntry};
use crate::error::IndexBuildError;
use crate::normalize::normalize_entries;
use crate::tree::IndexTree;
use indexmap::IndexMap;

/// Build the sidebar tree for a set of raw entries
///
/// # Errors
/// Returns the first [`IndexBuildError`] found; no partial tree is produced.
pub fn build_index<I>(entries: I, config: &IndexConfig) -> Result<IndexTree, IndexBuildError>
where
    I: IntoIterator<Item = RawEntry>,
{
    let docs_mode = config.docs_mode;
    let entries = entries
        .into_iter()
        .filter(|entry| !docs_mode || entry.entry_type == EntryType::Docs);

    let unordered = normalize_entries(entries, config).map_err(|e| {
        tracing::error!("Failed to build story index: {}", e);
        e
    })?;
    let tree = order_entries(unordered);

    tracing::debug!("Built story index with {} entries", tree.len());
    Ok(tree)
}

/// Put normalized entries into sidebar order
#[must_use]
pub fn order_entries(mut unordered: IndexMap<EntryId, IndexEntry>) -> IndexTree {
    let (rootless, rooted): (Vec<&IndexEntry>, Vec<&IndexEntry>) = unordered
        .values()
        .filter(|entry| entry.kind().is_container() && entry.parent().is_none())
        .partition(|entry| entry.kind() != EntryKind::Root);

    let tops: Vec<EntryId> = rootless
        .into_iter()
        .chain(rooted)
        .map(|entry| entry.id().to_string())
        .collect();

    let mut tree = IndexTree::with_capacity(unordered.len());
    let mut stack: Vec<EntryId> = Vec::new();
    for top in tops {
        stack.push(top);
        while let Some(id) = stack.pop() {
            let Some(entry) = unordered.swap_remove(&id) else {
                continue;
            };
            if let Some(children) = entry.children() {
                stack.extend(children.iter().rev().cloned());
            }
            tree.push(entry);
        }
    }

    if !unordered.is_empty() {
        tracing::warn!(
            "Dropped {} entries unreachable from any top-level container",
            unordered.len()
        );
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(tree: &IndexTree) -> Vec<&str> {
        tree.keys().collect()
    }

    #[test]
    fn out_of_order_stories_are_grouped() {
        let tree = build_index(
            vec![
                RawEntry::story("a--1", "a", "1"),
                RawEntry::story("b--1", "b", "1"),
                RawEntry::story("a--2", "a", "2"),
            ],
            &IndexConfig::new().with_show_roots(true),
        )
        .unwrap();

        assert_eq!(keys(&tree), vec!["a", "a--1", "a--2", "b", "b--1"]);
        assert_eq!(
            tree.get("a").unwrap().children().unwrap(),
            ["a--1".to_string(), "a--2".to_string()]
        );
    }

    #[test]
    fn rootless_components_come_first() {
        let tree = build_index(
            vec![
                RawEntry::story("root-first--story-1", "Root/First", "Story 1"),
                RawEntry::story("component-a--story-1", "Component A", "Story 1"),
                RawEntry::story("component-b--story-3", "Component B", "Story 3"),
            ],
            &IndexConfig::new(),
        )
        .unwrap();

        assert_eq!(
            keys(&tree),
            vec![
                "component-a",
                "component-a--story-1",
                "component-b",
                "component-b--story-3",
                "root",
                "root-first",
                "root-first--story-1",
            ]
        );
        assert_eq!(
            tree.get("root").unwrap().children().unwrap(),
            ["root-first".to_string()]
        );
    }

    #[test]
    fn container_names_are_trimmed_titles_are_not() {
        let tree = build_index(
            vec![RawEntry::story(
                "design-system-some-component--my-story",
                "  Design System  /  Some Component  ",
                "  My Story  ",
            )],
            &IndexConfig::new(),
        )
        .unwrap();

        assert_eq!(
            keys(&tree),
            vec![
                "design-system",
                "design-system-some-component",
                "design-system-some-component--my-story",
            ]
        );
        assert_eq!(tree.get("design-system").unwrap().kind(), EntryKind::Root);
        assert_eq!(tree.get("design-system").unwrap().name(), "Design System");
        assert_eq!(
            tree.get("design-system-some-component").unwrap().name(),
            "Some Component"
        );
        let leaf = tree.leaf("design-system-some-component--my-story").unwrap();
        assert_eq!(leaf.title, "  Design System  /  Some Component  ");
        assert_eq!(leaf.name, "  My Story  ");
    }

    #[test]
    fn docs_mode_keeps_only_docs_subtrees() {
        let tree = build_index(
            vec![
                RawEntry::story("component-a--page", "Component A", "Page"),
                RawEntry::docs("component-b--docs", "Component B", "Docs"),
                RawEntry::story("component-c--story-4", "Component c", "Story 4"),
            ],
            &IndexConfig::new().with_docs_mode(true),
        )
        .unwrap();

        assert_eq!(keys(&tree), vec!["component-b", "component-b--docs"]);
        assert_eq!(tree.get("component-b--docs").unwrap().kind(), EntryKind::Docs);
    }

    #[test]
    fn build_error_yields_no_tree() {
        let result = build_index(
            vec![
                RawEntry::story("a--1", "a", "1"),
                RawEntry::story("b--1", "b/-", "1"),
            ],
            &IndexConfig::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn nested_groups_are_depth_first() {
        let tree = build_index(
            vec![
                RawEntry::story("x-y-z--1", "x/y/z", "1"),
                RawEntry::story("x-w--1", "x/w", "1"),
                RawEntry::story("x-y-q--1", "x/y/q", "1"),
            ],
            &IndexConfig::new(),
        )
        .unwrap();

        assert_eq!(
            keys(&tree),
            vec!["x", "x-y", "x-y-z", "x-y-z--1", "x-y-q", "x-y-q--1", "x-w", "x-w--1"]
        );
        assert_eq!(tree.get("x-y").unwrap().kind(), EntryKind::Group);
        assert_eq!(tree.get("x-y-z--1").unwrap().depth(), 3);
    }
}
