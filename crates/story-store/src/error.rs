//! Error types held in store state
//!
//! - Fetch errors: transport failures and non-2xx responses
//! - Index errors: anything that keeps a new tree from being installed

use story_index::{IndexBuildError, ProtocolError};

/// Index retrieval failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexFetchError {
    /// Connection or body transfer failed
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Server answered with a non-success status
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// Request did not complete in time
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// Index file could not be read
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Body is not JSON
    #[error("index body is not valid JSON: {0}")]
    Decode(String),
}

impl IndexFetchError {
    /// Check if a later fetch may succeed without changes on the client
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Io { .. } | Self::Decode(_) => false,
        }
    }
}

/// Why the current index could not be replaced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("failed to fetch index: {0}")]
    Fetch(#[from] IndexFetchError),

    #[error("failed to build index: {0}")]
    Build(#[from] IndexBuildError),

    #[error("unreadable index payload: {0}")]
    Protocol(#[from] ProtocolError),
}

impl IndexError {
    /// Fetch errors clear on the next invalidation; others need new input
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
