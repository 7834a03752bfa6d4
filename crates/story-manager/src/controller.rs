//! Fetch/invalidation controller
//!
//! State machine: `Idle -> Fetching -> (Indexed | Errored)`. An invalidation
//! moves any state back to `Fetching` and clears the index error; the
//! previously installed tree stays readable until a new one replaces it.

use crate::source::IndexSource;
use serde_json::Value;
use std::fmt;
use story_index::IndexPayload;
use story_store::{IndexError, IndexStore};

/// Where the controller is in its fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Nothing requested yet, or the last payload was a legacy one
    #[default]
    Idle,
    /// A fetch is pending or running
    Fetching,
    /// The last fetch installed a tree
    Indexed,
    /// The last fetch failed; see the store's index error
    Errored,
}

/// Single-flight index fetcher
pub struct FetchController {
    source: Box<dyn IndexSource>,
    state: FetchState,
    fetches: u64,
}

impl fmt::Debug for FetchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchController")
            .field("source", &self.source.describe())
            .field("state", &self.state)
            .field("fetches", &self.fetches)
            .finish()
    }
}

impl FetchController {
    #[must_use]
    pub fn new(source: Box<dyn IndexSource>) -> Self {
        Self {
            source,
            state: FetchState::Idle,
            fetches: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Number of fetches started
    #[inline]
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    /// Mark the index stale; the caller schedules the fetch
    pub fn invalidate(&mut self, store: &mut IndexStore) {
        tracing::debug!("Index invalidated");
        store.clear_index_error();
        self.state = FetchState::Fetching;
    }

    /// Fetch from the source and install the result into `store`
    ///
    /// Errors never escape: they are recorded on the store.
    pub async fn fetch(&mut self, store: &mut IndexStore) -> FetchState {
        self.state = FetchState::Fetching;
        self.fetches += 1;
        tracing::debug!("Fetching index from {}", self.source.describe());

        self.state = match self.source.fetch().await {
            Ok(body) => apply_payload(store, body),
            Err(e) => {
                store.set_index_error(IndexError::Fetch(e));
                FetchState::Errored
            }
        };
        self.state
    }
}

/// Normalize a raw payload and install it
///
/// Legacy payloads are skipped with a warning: the local tree then waits
/// for an indexable payload.
pub fn apply_payload(store: &mut IndexStore, body: Value) -> FetchState {
    match IndexPayload::from_value(body) {
        Ok(IndexPayload::Entries(entries)) => match store.set_index(entries.into_values()) {
            Ok(_) => FetchState::Indexed,
            Err(_) => FetchState::Errored,
        },
        Ok(legacy @ IndexPayload::Legacy(_)) => {
            tracing::warn!(
                "Skipping story index with version v{}, awaiting set-stories",
                legacy.version()
            );
            FetchState::Idle
        }
        Err(e) => {
            store.set_index_error(IndexError::Protocol(e));
            FetchState::Errored
        }
    }
}
