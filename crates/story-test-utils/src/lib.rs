//! Testing utilities for the story index workspace
//!
//! Shared fixtures, a scripted index source and a recording host.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use story_index::{RawEntry, Parameters};
use story_manager::{IndexSource, ManagerHost, RefData, RefUpdate, Route};
use story_store::IndexFetchError;

/// Two components, the first with two stories
pub fn mock_entries() -> Vec<RawEntry> {
    vec![
        RawEntry::story("component-a--story-1", "Component A", "Story 1")
            .with_import_path("./component-a.stories.js"),
        RawEntry::story("component-a--story-2", "Component A", "Story 2")
            .with_import_path("./component-a.stories.js"),
        RawEntry::story("component-b--story-3", "Component B", "Story 3")
            .with_import_path("./component-b.stories.js"),
    ]
}

/// Leaves `a--1, a--2, b-c--1, b-d--1, b-d--2, custom-id--1` in tree order
pub fn navigation_entries() -> Vec<RawEntry> {
    vec![
        RawEntry::story("a--1", "a", "1"),
        RawEntry::story("a--2", "a", "2"),
        RawEntry::story("b-c--1", "b/c", "1"),
        RawEntry::story("b-d--1", "b/d", "1"),
        RawEntry::story("b-d--2", "b/d", "2"),
        RawEntry::story("custom-id--1", "b/e", "1"),
    ]
}

/// Only `component-b` holds a docs entry
pub fn docs_entries() -> Vec<RawEntry> {
    vec![
        RawEntry::story("component-a--story-1", "Group/Component A", "Story 1"),
        RawEntry::docs("component-b--docs", "Group/Component B", "Docs"),
        RawEntry::story("component-b--story-2", "Group/Component B", "Story 2"),
        RawEntry::story("component-c--story-3", "Component C", "Story 3"),
    ]
}

/// Build a JSON object from a `json!` literal
///
/// # Panics
/// Panics if `value` is not an object.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Parameters carrying UI options
pub fn options_parameters(options: Value) -> Parameters {
    object(json!({ "options": options }))
}

/// Wrap entries in a v4 index payload
pub fn index_payload(entries: &[RawEntry]) -> Value {
    let entries: Map<String, Value> = entries
        .iter()
        .map(|entry| {
            let value = serde_json::to_value(entry).expect("raw entry serializes");
            (entry.id.clone(), value)
        })
        .collect();
    json!({ "v": 4, "entries": entries })
}

/// Index source replaying queued results; clones share the queue
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    results: Arc<Mutex<VecDeque<Result<Value, IndexFetchError>>>>,
    fetches: Arc<AtomicU64>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source answering every fetch with the same entries
    pub fn with_entries(entries: &[RawEntry]) -> Self {
        let source = Self::new();
        source.push_ok(index_payload(entries));
        source
    }

    pub fn push_ok(&self, body: Value) {
        self.results.lock().push_back(Ok(body));
    }

    pub fn push_err(&self, error: IndexFetchError) {
        self.results.lock().push_back(Err(error));
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndexSource for ScriptedSource {
    /// Pops the next queued result; the last one is repeated once the
    /// queue is down to a single item
    async fn fetch(&self) -> Result<Value, IndexFetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut results = self.results.lock();
        let next = if results.len() > 1 {
            results.pop_front()
        } else {
            results.front().cloned()
        };
        next.unwrap_or_else(|| Err(IndexFetchError::Decode("no scripted response".to_string())))
    }

    fn describe(&self) -> String {
        "scripted://index.json".to_string()
    }
}

/// A call the manager made on its host
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SetOptions(Value),
    Navigate(String),
    UpdateRef(String, RefUpdate),
    SetRef(String, RefData, bool),
}

/// Host recording every call; clones share the log
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
    settings_active: Arc<Mutex<bool>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Routes navigated to, as paths
    pub fn navigations(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::Navigate(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_settings_active(&self, active: bool) {
        *self.settings_active.lock() = active;
    }
}

impl ManagerHost for RecordingHost {
    fn set_options(&mut self, options: Value) {
        self.calls.lock().push(HostCall::SetOptions(options));
    }

    fn navigate(&mut self, route: &Route) {
        self.calls.lock().push(HostCall::Navigate(route.to_string()));
    }

    fn is_settings_screen_active(&self) -> bool {
        *self.settings_active.lock()
    }

    fn update_ref(&mut self, ref_id: &str, update: RefUpdate) {
        self.calls
            .lock()
            .push(HostCall::UpdateRef(ref_id.to_string(), update));
    }

    fn set_ref(&mut self, ref_id: &str, data: RefData, ready: bool) {
        self.calls
            .lock()
            .push(HostCall::SetRef(ref_id.to_string(), data, ready));
    }
}
