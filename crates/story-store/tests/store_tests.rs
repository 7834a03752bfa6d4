use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use story_index::{Args, IndexConfig, RawEntry};
use story_store::{IndexStatus, IndexStore, Selection, StoryPatch, ViewMode};
use story_test_utils::{docs_entries, mock_entries, object};

fn prepared_store() -> IndexStore {
    let mut store = IndexStore::new(IndexConfig::new());
    store.set_index(mock_entries()).unwrap();
    store.on_story_prepared(
        "component-a--story-1",
        object(json!({ "a": 1 })),
        object(json!({ "b": 2 })),
        object(json!({ "b": 0 })),
    );
    store
}

proptest! {
    #[test]
    fn prop_set_index_is_idempotent(
        picks in prop::collection::vec(0..3usize, 0..6),
        prepare in any::<bool>(),
    ) {
        let entries: Vec<RawEntry> = {
            let all = mock_entries();
            let mut chosen: Vec<RawEntry> = Vec::new();
            for i in picks {
                if !chosen.iter().any(|e| e.id == all[i].id) {
                    chosen.push(all[i].clone());
                }
            }
            chosen
        };

        let mut store = IndexStore::new(IndexConfig::new());
        store.set_index(mock_entries()).unwrap();
        if prepare {
            store.on_story_prepared("component-a--story-1", object(json!({ "p": 1 })), Args::new(), Args::new());
        }

        store.set_index(entries.clone()).unwrap();
        let once = store.clone();
        store.set_index(entries).unwrap();
        prop_assert_eq!(store, once);
    }
}

#[test]
fn test_prepared_state_survives_reindex() {
    let mut store = prepared_store();
    store.set_index(mock_entries()).unwrap();

    let leaf = store.tree().unwrap().leaf("component-a--story-1").unwrap();
    assert!(leaf.prepared);
    assert_eq!(leaf.parameters, Some(object(json!({ "a": 1 }))));
    assert_eq!(leaf.args, Some(object(json!({ "b": 2 }))));
    assert_eq!(leaf.initial_args, Some(object(json!({ "b": 0 }))));

    let other = store.tree().unwrap().leaf("component-a--story-2").unwrap();
    assert!(!other.prepared);
}

#[test]
fn test_new_entry_parameters_take_precedence() {
    let mut store = prepared_store();
    let mut entries = mock_entries();
    entries[0] = entries[0].clone().with_parameters(object(json!({ "fresh": true })));
    store.set_index(entries).unwrap();

    let leaf = store.tree().unwrap().leaf("component-a--story-1").unwrap();
    assert!(leaf.prepared);
    assert_eq!(leaf.parameters, Some(object(json!({ "fresh": true }))));
    assert_eq!(leaf.args, Some(object(json!({ "b": 2 }))));
}

#[test]
fn test_entries_absent_from_new_index_are_dropped() {
    let mut store = prepared_store();
    store
        .set_index(vec![RawEntry::story("component-b--story-3", "Component B", "Story 3")])
        .unwrap();

    assert!(store.entry("component-a--story-1").is_none());
    assert!(store.entry("component-a").is_none());

    // a story that comes back later starts unprepared
    store.set_index(mock_entries()).unwrap();
    assert!(!store.tree().unwrap().leaf("component-a--story-1").unwrap().prepared);
}

#[test]
fn test_args_echo_updates_story() {
    let mut store = IndexStore::new(IndexConfig::new());
    store.set_index(mock_entries()).unwrap();

    assert!(store.update_story("component-a--story-1", StoryPatch::args(object(json!({ "foo": "bar" })))));
    assert_eq!(
        store.tree().unwrap().leaf("component-a--story-1").unwrap().args,
        Some(object(json!({ "foo": "bar" })))
    );
    assert!(!store.update_story("missing--story", StoryPatch::args(Args::new())));
}

#[test]
fn test_docs_mode_store() {
    let mut store = IndexStore::new(IndexConfig::new().with_docs_mode(true));
    store.set_index(docs_entries()).unwrap();

    let keys: Vec<&str> = store.tree().unwrap().keys().collect();
    assert_eq!(keys, vec!["group", "group-component-b", "component-b--docs"]);
    assert!(store.update_docs("component-b--docs", StoryPatch::args(Args::new())));
}

#[test]
fn test_selection_and_status() {
    let mut store = IndexStore::new(IndexConfig::new());
    assert_eq!(store.status(), IndexStatus::NotLoaded);
    store.set_index(mock_entries()).unwrap();
    assert_eq!(store.status(), IndexStatus::Loaded);

    let selection = Selection::new("component-b--story-3", ViewMode::Story);
    assert!(store.set_selection(selection.clone()));
    assert!(!store.set_selection(selection));
    assert_eq!(store.current_entry().unwrap().name, "Story 3");
}
