use pretty_assertions::assert_eq;
use proptest::prelude::*;
use story_index::{build_index, EntryKind, IndexConfig, IndexPayload, IndexTree, RawEntry};

fn keys(tree: &IndexTree) -> Vec<&str> {
    tree.keys().collect()
}

/// Ids of a depth-first, pre-order walk from the top-level entries
fn depth_first(tree: &IndexTree) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<&str> = tree.top_level().map(|e| e.id()).collect();
    stack.reverse();
    while let Some(id) = stack.pop() {
        out.push(id.to_string());
        if let Some(children) = tree.get(id).and_then(|e| e.children()) {
            stack.extend(children.iter().rev().map(String::as_str));
        }
    }
    out
}

fn raw_entries() -> impl Strategy<Value = Vec<RawEntry>> {
    let segment = prop::sample::select(vec!["a", "b", "c", "Design System"]);
    let title = prop::collection::vec(segment, 1..4).prop_map(|segments| segments.join("/"));
    prop::collection::vec(title, 1..12).prop_map(|titles| {
        titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| RawEntry::story(format!("entry-{i}--story"), title, format!("Story {i}")))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_tree_is_depth_first_with_rootless_first(
        entries in raw_entries(),
        show_roots in any::<bool>(),
    ) {
        let config = IndexConfig::new().with_show_roots(show_roots);
        let result = build_index(entries.clone(), &config);
        prop_assert!(result.is_ok(), "build failed: {:?}", result);
        let tree = result.unwrap();

        let order: Vec<String> = tree.keys().map(str::to_string).collect();
        prop_assert_eq!(&order, &depth_first(&tree));

        let kinds: Vec<EntryKind> = tree.top_level().map(|e| e.kind()).collect();
        if let Some(first_root) = kinds.iter().position(|k| *k == EntryKind::Root) {
            prop_assert!(kinds[first_root..].iter().all(|k| *k == EntryKind::Root));
        }

        for entry in &entries {
            prop_assert!(tree.leaf(&entry.id).is_some());
        }
    }

    #[test]
    fn prop_build_is_idempotent(entries in raw_entries()) {
        let config = IndexConfig::new();
        let first = build_index(entries.clone(), &config);
        let second = build_index(entries, &config);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_interleaved_titles_are_grouped() {
    let tree = build_index(
        vec![
            RawEntry::story("a--1", "a", "1"),
            RawEntry::story("b--1", "b", "1"),
            RawEntry::story("a--2", "a", "2"),
        ],
        &IndexConfig::new(),
    )
    .unwrap();

    assert_eq!(keys(&tree), vec!["a", "a--1", "a--2", "b", "b--1"]);
}

#[test]
fn test_rooted_groups_follow_rootless_ones() {
    let tree = build_index(
        vec![
            RawEntry::story("x-y--1", "x/y", "1"),
            RawEntry::story("a--1", "a", "1"),
        ],
        &IndexConfig::new(),
    )
    .unwrap();

    assert_eq!(keys(&tree), vec!["a", "a--1", "x", "x-y", "x-y--1"]);
    assert_eq!(tree.get("x").unwrap().kind(), EntryKind::Root);
}

#[test]
fn test_bare_and_rooted_titles_share_a_root() {
    let tree = build_index(
        vec![
            RawEntry::story("button--primary", "Button", "Primary"),
            RawEntry::story("button-variants--large", "Button/Variants", "Large"),
            RawEntry::story("link--1", "Link", "1"),
        ],
        &IndexConfig::new(),
    )
    .unwrap();

    assert_eq!(
        keys(&tree),
        vec![
            "link",
            "link--1",
            "button",
            "button--primary",
            "button-variants",
            "button-variants--large"
        ]
    );
    assert_eq!(tree.get("button").unwrap().kind(), EntryKind::Root);
    assert_eq!(tree.get("button-variants").unwrap().kind(), EntryKind::Component);
}

#[test]
fn test_docs_mode_keeps_the_component_with_docs() {
    let tree = build_index(
        vec![
            RawEntry::story("component-a--story-1", "Group/Component A", "Story 1"),
            RawEntry::docs("component-b--docs", "Group/Component B", "Docs"),
            RawEntry::story("component-b--story-2", "Group/Component B", "Story 2"),
            RawEntry::story("component-c--story-3", "Component C", "Story 3"),
        ],
        &IndexConfig::new().with_docs_mode(true),
    )
    .unwrap();

    assert_eq!(
        keys(&tree),
        vec!["group", "group-component-b", "component-b--docs"]
    );
}

#[test]
fn test_v3_payload_builds_like_v4() {
    let v3 = IndexPayload::from_json_str(
        r#"{
            "v": 3,
            "stories": {
                "a--1": { "id": "a--1", "kind": "a", "name": "1", "importPath": "./a.js" },
                "b-c--1": { "id": "b-c--1", "title": "b/c", "name": "1", "importPath": "./c.js" }
            }
        }"#,
    )
    .unwrap();
    let IndexPayload::Entries(entries) = v3 else {
        panic!("v3 payloads are indexable");
    };

    let tree = build_index(entries.into_values(), &IndexConfig::new()).unwrap();
    assert_eq!(keys(&tree), vec!["a", "a--1", "b", "b-c", "b-c--1"]);
    assert_eq!(tree.leaf("a--1").unwrap().title, "a");
}

#[test]
fn test_navigation_order() {
    let tree = build_index(
        vec![
            RawEntry::story("a--1", "a", "1"),
            RawEntry::story("a--2", "a", "2"),
            RawEntry::story("b-c--1", "b/c", "1"),
            RawEntry::story("b-d--1", "b/d", "1"),
            RawEntry::story("b-d--2", "b/d", "2"),
            RawEntry::story("custom-id--1", "b/e", "1"),
        ],
        &IndexConfig::new(),
    )
    .unwrap();

    assert_eq!(
        tree.leaf_ids(),
        vec!["a--1", "a--2", "b-c--1", "b-d--1", "b-d--2", "custom-id--1"]
    );
    assert_eq!(tree.find_leaf_by_offset("a--1", 1), Some("a--2"));
    assert_eq!(tree.find_leaf_by_offset("custom-id--1", 1), None);
    assert_eq!(tree.find_sibling_story_id("b-d--2", 1, true), Some("custom-id--1"));
}
