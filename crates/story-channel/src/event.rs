//! Event variants and metadata
//!
//! Events are serde-tagged by their kebab-case name, so the wire frame of
//! `Event::StoryIndexInvalidated` is `{"type":"story-index-invalidated"}`.

use crate::error::ChannelError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use story_index::{Args, Parameters};

/// Messages exchanged between the manager, the local preview and refs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Event {
    // Inbound
    /// A story finished its render setup
    StoryPrepared {
        story_id: String,
        #[serde(default)]
        parameters: Parameters,
        #[serde(default)]
        args: Args,
        #[serde(default)]
        initial_args: Args,
    },
    /// The preview picked a story on its own (initial url, fallback)
    StorySpecified { story_id: String, view_mode: String },
    /// Args changed in the preview
    StoryArgsUpdated { story_id: String, args: Args },
    /// The served index is stale
    StoryIndexInvalidated,
    /// The preview rendered the selection
    CurrentStoryWasSet { story_id: String },
    /// The preview failed to load its configuration
    ConfigError { message: String },
    /// The preview could not find the selection
    StoryMissing {
        #[serde(default)]
        story_id: Option<String>,
    },
    /// Legacy v1/v2 bulk stories payload
    SetStories { payload: Value },
    /// Index pushed by a preview instead of fetched
    SetIndex { payload: Value },

    // Outbound
    /// Ask the target to merge args into a story
    UpdateStoryArgs {
        story_id: String,
        updated_args: Args,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    /// Ask the target to reset some (or all) args of a story
    ResetStoryArgs {
        story_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arg_names: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    /// Ask the target to load entries ahead of navigation
    PreloadEntries {
        ids: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
}

impl Event {
    /// Wire name of the event
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StoryPrepared { .. } => "story-prepared",
            Self::StorySpecified { .. } => "story-specified",
            Self::StoryArgsUpdated { .. } => "story-args-updated",
            Self::StoryIndexInvalidated => "story-index-invalidated",
            Self::CurrentStoryWasSet { .. } => "current-story-was-set",
            Self::ConfigError { .. } => "config-error",
            Self::StoryMissing { .. } => "story-missing",
            Self::SetStories { .. } => "set-stories",
            Self::SetIndex { .. } => "set-index",
            Self::UpdateStoryArgs { .. } => "update-story-args",
            Self::ResetStoryArgs { .. } => "reset-story-args",
            Self::PreloadEntries { .. } => "preload-entries",
        }
    }

    /// Whether the manager emits this event rather than handles it
    #[inline]
    #[must_use]
    pub fn is_outbound(&self) -> bool {
        matches!(
            self,
            Self::UpdateStoryArgs { .. } | Self::ResetStoryArgs { .. } | Self::PreloadEntries { .. }
        )
    }
}

/// Embedded instance that sourced an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefHandle {
    /// Ref id, used as the route prefix (`/story/<ref>_<id>`)
    pub id: String,
    /// Ref's own flat index, as the ref registry holds it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexMap<String, Value>>,
}

impl RefHandle {
    /// Create a handle without an index snapshot
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            index: None,
        }
    }

    /// With index snapshot
    #[inline]
    #[must_use]
    pub fn with_index(mut self, index: IndexMap<String, Value>) -> Self {
        self.index = Some(index);
        self
    }
}

/// Where an event came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Source {
    /// The manager itself or its local preview
    #[default]
    Local,
    /// A composed ref
    Ref(RefHandle),
}

impl Source {
    /// The ref, if the event came from one
    #[must_use]
    pub fn as_ref_handle(&self) -> Option<&RefHandle> {
        match self {
            Self::Local => None,
            Self::Ref(handle) => Some(handle),
        }
    }
}

/// Event plus its source metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: Event,
    #[serde(default)]
    pub source: Source,
}

impl Envelope {
    /// Event from the local context
    #[must_use]
    pub fn local(event: Event) -> Self {
        Self {
            event,
            source: Source::Local,
        }
    }

    /// Event from a composed ref
    #[must_use]
    pub fn from_ref(event: Event, handle: RefHandle) -> Self {
        Self {
            event,
            source: Source::Ref(handle),
        }
    }

    /// Encode as a JSON wire frame
    ///
    /// # Errors
    /// Returns [`ChannelError::Codec`] if a payload cannot be serialized.
    pub fn to_json(&self) -> Result<String, ChannelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON wire frame
    ///
    /// # Errors
    /// Returns [`ChannelError::Codec`] for unknown events or malformed frames.
    pub fn from_json(frame: &str) -> Result<Self, ChannelError> {
        Ok(serde_json::from_str(frame)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_event_wire_shape() {
        let value = serde_json::to_value(Event::StoryIndexInvalidated).unwrap();
        assert_eq!(value, json!({ "type": "story-index-invalidated" }));
    }

    #[test]
    fn fields_are_camel_case() {
        let value = serde_json::to_value(Event::UpdateStoryArgs {
            story_id: "a--1".to_string(),
            updated_args: serde_json::from_value(json!({ "foo": "bar" })).unwrap(),
            target: None,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({ "type": "update-story-args", "storyId": "a--1", "updatedArgs": { "foo": "bar" } })
        );
    }

    #[test]
    fn prepared_defaults_missing_maps() {
        let event: Event =
            serde_json::from_value(json!({ "type": "story-prepared", "storyId": "a--1" })).unwrap();
        assert_eq!(event.name(), "story-prepared");
        let Event::StoryPrepared { parameters, args, .. } = event else {
            panic!("expected story-prepared");
        };
        assert!(parameters.is_empty());
        assert!(args.is_empty());
    }

    #[test]
    fn envelope_source_defaults_to_local() {
        let envelope: Envelope =
            serde_json::from_value(json!({ "event": { "type": "config-error", "message": "x" } }))
                .unwrap();
        assert_eq!(envelope.source, Source::Local);
        assert!(envelope.source.as_ref_handle().is_none());
    }

    #[test]
    fn ref_source_round_trips() {
        let envelope = Envelope::from_ref(
            Event::CurrentStoryWasSet {
                story_id: "a--1".to_string(),
            },
            RefHandle::new("design"),
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["source"], json!({ "kind": "ref", "id": "design" }));
    }

    #[test]
    fn unknown_frame_is_codec_error() {
        let err = Envelope::from_json(r#"{"event":{"type":"no-such-event"}}"#).unwrap_err();
        assert!(matches!(err, ChannelError::Codec(_)));

        let frame = Envelope::local(Event::StoryIndexInvalidated).to_json().unwrap();
        assert_eq!(
            Envelope::from_json(&frame).unwrap().event,
            Event::StoryIndexInvalidated
        );
    }

    #[test]
    fn outbound_events() {
        assert!(Event::PreloadEntries {
            ids: vec![],
            target: None
        }
        .is_outbound());
        assert!(!Event::StoryIndexInvalidated.is_outbound());
    }
}
