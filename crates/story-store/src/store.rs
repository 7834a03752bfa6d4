//! Index store
//!
//! Holds the current tree plus everything the manager learns about it at
//! runtime:
//! - Prepared state (parameters, args) carried across full re-indexing
//! - Index error, kept alongside a stale tree
//! - Session flags and the current selection

use crate::error::IndexError;
use crate::selection::Selection;
use serde_json::Value;
use story_index::{
    build_index, Args, EntryKind, IndexBuildError, IndexConfig, IndexEntry, IndexTree, LeafEntry,
    Parameters, RawEntry,
};

/// Flags that live for the whole manager session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The local preview reported it is up (or failed trying)
    pub preview_initialized: bool,
    /// UI options were already taken from a prepared story
    pub has_called_set_options: bool,
}

/// Load state as shown by the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// Nothing loaded yet
    NotLoaded,
    /// A tree is installed and current
    Loaded,
    /// No tree was ever installed and the last attempt failed
    Errored,
    /// A tree is installed but the last attempt to replace it failed
    Stale,
}

/// Partial update of a story or docs entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryPatch {
    pub prepared: Option<bool>,
    pub parameters: Option<Parameters>,
    pub args: Option<Args>,
    pub initial_args: Option<Args>,
}

impl StoryPatch {
    /// Patch replacing the args
    #[must_use]
    pub fn args(args: Args) -> Self {
        Self {
            args: Some(args),
            ..Self::default()
        }
    }

    /// Patch marking an entry prepared with its resolved state
    #[must_use]
    pub fn prepared(parameters: Parameters, args: Args, initial_args: Args) -> Self {
        Self {
            prepared: Some(true),
            parameters: Some(parameters),
            args: Some(args),
            initial_args: Some(initial_args),
        }
    }

    fn apply(self, leaf: &mut LeafEntry) {
        if let Some(prepared) = self.prepared {
            leaf.prepared = prepared;
        }
        if let Some(parameters) = self.parameters {
            leaf.parameters = Some(parameters);
        }
        if let Some(args) = self.args {
            leaf.args = Some(args);
        }
        if let Some(initial_args) = self.initial_args {
            leaf.initial_args = Some(initial_args);
        }
    }
}

/// Current index and runtime state for one manager session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStore {
    config: IndexConfig,
    tree: Option<IndexTree>,
    index_error: Option<IndexError>,
    selection: Option<Selection>,
    session: SessionState,
}

impl IndexStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Replace the tree with one built from `entries`
    ///
    /// Stories that were prepared in the old tree keep their prepared state
    /// unless the new entry brings its own parameters or args. On success
    /// any index error is cleared; on failure the old tree stays in place.
    ///
    /// # Errors
    /// Returns the build error, which is also recorded as the index error.
    pub fn set_index<I>(&mut self, entries: I) -> Result<usize, IndexBuildError>
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut next = match build_index(entries, &self.config) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("Keeping previous index: {}", e);
                self.index_error = Some(IndexError::Build(e.clone()));
                return Err(e);
            }
        };

        if let Some(previous) = &self.tree {
            carry_prepared(previous, &mut next);
        }

        let len = next.len();
        self.tree = Some(next);
        self.index_error = None;
        tracing::info!("Installed story index with {} entries", len);
        Ok(len)
    }

    /// Record a story's resolved state
    ///
    /// Returns the story's `options` parameter the first time any story is
    /// prepared in this session, so it can be applied to the UI once.
    pub fn on_story_prepared(
        &mut self,
        story_id: &str,
        parameters: Parameters,
        args: Args,
        initial_args: Args,
    ) -> Option<Value> {
        let options = parameters.get("options").cloned();
        self.update_story(story_id, StoryPatch::prepared(parameters, args, initial_args));

        if self.session.has_called_set_options {
            return None;
        }
        self.session.has_called_set_options = true;
        options
    }

    /// Patch a story entry; returns false if no such story exists
    pub fn update_story(&mut self, story_id: &str, patch: StoryPatch) -> bool {
        self.update_leaf(story_id, EntryKind::Story, patch)
    }

    /// Patch a docs entry; returns false if no such docs entry exists
    pub fn update_docs(&mut self, docs_id: &str, patch: StoryPatch) -> bool {
        self.update_leaf(docs_id, EntryKind::Docs, patch)
    }

    fn update_leaf(&mut self, id: &str, kind: EntryKind, patch: StoryPatch) -> bool {
        let leaf = self
            .tree
            .as_mut()
            .and_then(|tree| tree.get_mut(id))
            .filter(|entry| entry.kind() == kind)
            .and_then(IndexEntry::as_leaf_mut);

        match leaf {
            Some(leaf) => {
                patch.apply(leaf);
                true
            }
            None => {
                tracing::debug!("Ignoring update for unknown {} '{}'", kind, id);
                false
            }
        }
    }

    /// Mark the local preview as initialized
    pub fn set_preview_initialized(&mut self) {
        self.session.preview_initialized = true;
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Record an error without touching the tree
    pub fn set_index_error(&mut self, error: IndexError) {
        tracing::warn!("Index error: {}", error);
        self.index_error = Some(error);
    }

    pub fn clear_index_error(&mut self) {
        self.index_error = None;
    }

    #[inline]
    #[must_use]
    pub fn index_error(&self) -> Option<&IndexError> {
        self.index_error.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> IndexStatus {
        match (&self.tree, &self.index_error) {
            (None, None) => IndexStatus::NotLoaded,
            (None, Some(_)) => IndexStatus::Errored,
            (Some(_), None) => IndexStatus::Loaded,
            (Some(_), Some(_)) => IndexStatus::Stale,
        }
    }

    /// Installed tree, if one was ever built
    #[inline]
    #[must_use]
    pub fn tree(&self) -> Option<&IndexTree> {
        self.tree.as_ref()
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&IndexEntry> {
        self.tree.as_ref().and_then(|tree| tree.get(id))
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Set the selection; returns false if it was already current
    pub fn set_selection(&mut self, selection: Selection) -> bool {
        if self.selection.as_ref() == Some(&selection) {
            return false;
        }
        self.selection = Some(selection);
        true
    }

    /// Selected story or docs entry
    #[must_use]
    pub fn current_entry(&self) -> Option<&LeafEntry> {
        let selection = self.selection.as_ref()?;
        self.tree.as_ref()?.leaf(&selection.story_id)
    }

    /// Parameter of the selected entry
    #[must_use]
    pub fn current_parameter(&self, name: &str) -> Option<&Value> {
        self.current_entry()?.parameter(name)
    }
}

fn carry_prepared(previous: &IndexTree, next: &mut IndexTree) {
    let mut carried = 0usize;
    for (id, entry) in next.iter_mut() {
        let IndexEntry::Story(new) = entry else {
            continue;
        };
        let Some(old) = previous.get(id).and_then(IndexEntry::as_story) else {
            continue;
        };
        if !old.prepared {
            continue;
        }

        new.prepared = true;
        if new.parameters.is_none() {
            new.parameters.clone_from(&old.parameters);
        }
        if new.args.is_none() {
            new.args.clone_from(&old.args);
        }
        if new.initial_args.is_none() {
            new.initial_args.clone_from(&old.initial_args);
        }
        carried += 1;
    }
    tracing::debug!("Carried prepared state for {} stories", carried);
}
