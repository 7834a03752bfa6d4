//! Inbound event handling
//!
//! Local events update the index store; events sourced from a composed ref
//! never touch it and are forwarded to the host's ref registry instead.

use crate::controller::{apply_payload, FetchState};
use crate::host::{ManagerHost, RefData, RefUpdate};
use crate::manager::StoriesManager;
use crate::navigation::Route;
use serde_json::{Map, Value};
use story_channel::{Envelope, Event, RefHandle, Source};
use story_index::{Args, IndexPayload, Parameters};
use story_store::{Selection, StoryPatch, ViewMode};

impl<H: ManagerHost> StoriesManager<H> {
    /// Handle one envelope; returns true if the index must be refetched
    pub fn handle(&mut self, envelope: Envelope) -> bool {
        let Envelope { event, source } = envelope;
        tracing::trace!("Handling {}", event.name());

        match event {
            Event::StoryIndexInvalidated => {
                self.controller.invalidate(&mut self.store);
                return true;
            }
            Event::StoryPrepared {
                story_id,
                parameters,
                args,
                initial_args,
            } => self.on_story_prepared(&source, &story_id, parameters, args, initial_args),
            Event::StorySpecified {
                story_id,
                view_mode,
            } => self.on_story_specified(&source, story_id, ViewMode::from(view_mode)),
            Event::StoryArgsUpdated { story_id, args } => {
                self.on_story_args_updated(&source, &story_id, args);
            }
            Event::CurrentStoryWasSet { .. } => self.on_preview_initialized(&source),
            Event::ConfigError { message } => {
                tracing::warn!("Preview failed to load its configuration: {}", message);
                self.on_preview_initialized(&source);
            }
            Event::StoryMissing { story_id } => {
                tracing::debug!("Preview is missing story {:?}", story_id);
                self.on_preview_initialized(&source);
            }
            Event::SetIndex { payload } => self.on_set_index(source, payload),
            Event::SetStories { payload } => self.on_set_stories(source, payload),
            outbound @ (Event::UpdateStoryArgs { .. }
            | Event::ResetStoryArgs { .. }
            | Event::PreloadEntries { .. }) => {
                tracing::trace!("Ignoring outbound {}", outbound.name());
            }
        }
        false
    }

    fn on_story_prepared(
        &mut self,
        source: &Source,
        story_id: &str,
        parameters: Parameters,
        args: Args,
        initial_args: Args,
    ) {
        if let Source::Ref(handle) = source {
            let mut fields = Map::new();
            fields.insert("prepared".to_string(), Value::Bool(true));
            fields.insert("parameters".to_string(), Value::Object(parameters));
            fields.insert("args".to_string(), Value::Object(args));
            fields.insert("initialArgs".to_string(), Value::Object(initial_args));
            self.patch_ref_story(handle, story_id, fields);
            return;
        }

        if let Some(options) = self.store.on_story_prepared(story_id, parameters, args, initial_args) {
            self.host.set_options(options);
        }
        self.preload_neighbours(story_id);
    }

    /// Ask the preview to load the first stories of the adjacent components
    fn preload_neighbours(&mut self, prepared_id: &str) {
        let Some(tree) = self.store.tree() else {
            return;
        };
        let anchor = self
            .store
            .selection()
            .map_or(prepared_id, |s| s.story_id.as_str());

        let mut ids: Vec<String> = Vec::new();
        for delta in [1, -1] {
            if let Some(id) = tree.find_sibling_story_id(anchor, delta, true) {
                if !ids.iter().any(|existing| existing == id) {
                    ids.push(id.to_string());
                }
            }
        }
        if ids.is_empty() {
            return;
        }

        tracing::debug!("Preloading {:?}", ids);
        self.channel
            .emit_local(Event::PreloadEntries { ids, target: None });
    }

    fn on_story_specified(&mut self, source: &Source, story_id: String, view_mode: ViewMode) {
        if source.as_ref_handle().is_some() {
            tracing::debug!("Ignoring story-specified from a ref");
            return;
        }
        let on_canvas = self
            .store
            .selection()
            .map_or(true, |s| s.view_mode.is_canvas());
        if !on_canvas || self.host.is_settings_screen_active() {
            tracing::debug!("Settings screen active, keeping selection");
            return;
        }

        let route = Route::new(view_mode.clone(), story_id.clone());
        if self.store.set_selection(Selection::new(story_id, view_mode)) {
            self.host.navigate(&route);
        }
    }

    fn on_story_args_updated(&mut self, source: &Source, story_id: &str, args: Args) {
        match source {
            Source::Local => {
                self.store.update_story(story_id, StoryPatch::args(args));
            }
            Source::Ref(handle) => {
                let mut fields = Map::new();
                fields.insert("args".to_string(), Value::Object(args));
                self.patch_ref_story(handle, story_id, fields);
            }
        }
    }

    fn on_preview_initialized(&mut self, source: &Source) {
        match source {
            Source::Local => self.store.set_preview_initialized(),
            Source::Ref(handle) => self
                .host
                .update_ref(&handle.id, RefUpdate::PreviewInitialized),
        }
    }

    fn on_set_index(&mut self, source: Source, payload: Value) {
        match source {
            Source::Local => {
                if apply_payload(&mut self.store, payload) != FetchState::Indexed {
                    return;
                }
                if let Some(options) = self.store.current_parameter("options").cloned() {
                    self.host.set_options(options);
                }
            }
            Source::Ref(handle) => {
                self.host.set_ref(&handle.id, RefData::Index(payload), true);
            }
        }
    }

    fn on_set_stories(&mut self, source: Source, payload: Value) {
        let Source::Ref(handle) = source else {
            tracing::warn!("Ignoring set-stories from the local preview; the local index is fetched");
            return;
        };

        match IndexPayload::from_value(payload) {
            Ok(IndexPayload::Legacy(legacy)) => {
                let data = legacy.into_set_stories_data();
                self.host
                    .set_ref(&handle.id, RefData::SetStoriesData(data), true);
            }
            Ok(IndexPayload::Entries(_)) => {
                tracing::warn!("Ref '{}' sent an index through set-stories, ignoring", handle.id);
            }
            Err(e) => {
                tracing::warn!("Ref '{}' sent unreadable stories: {}", handle.id, e);
            }
        }
    }

    /// Merge `fields` into one story of a ref's index and hand it back
    fn patch_ref_story(&mut self, handle: &RefHandle, story_id: &str, fields: Map<String, Value>) {
        let Some(mut index) = handle.index.clone() else {
            tracing::debug!("Ref '{}' has no index to update", handle.id);
            return;
        };
        let Some(Value::Object(entry)) = index.get_mut(story_id) else {
            tracing::debug!("Ref '{}' has no story '{}'", handle.id, story_id);
            return;
        };

        entry.extend(fields);
        self.host.update_ref(&handle.id, RefUpdate::Index(index));
    }
}
