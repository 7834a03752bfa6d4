//! Channel error types

/// Message bus errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The channel was closed; no further events will arrive
    #[error("channel closed")]
    Closed,

    /// No event is queued right now
    #[error("no event queued")]
    Empty,

    /// A wire frame could not be encoded or decoded
    #[error("invalid event frame: {0}")]
    Codec(String),
}

impl ChannelError {
    /// Whether the subscription can still yield events
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<serde_json::Error> for ChannelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}
