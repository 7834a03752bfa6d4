//! Error types for index construction
//!
//! - Build errors: titles that cannot be turned into a consistent tree
//! - Protocol errors: payloads that match no known index version
//! - Id errors: story ids that cannot be derived from a title and name

use crate::entry::EntryKind;

/// Malformed entries that prevent the tree from being built
///
/// A build error always fails the whole index; the builder never falls back
/// to a partial tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexBuildError {
    /// A path segment sanitizes to its parent's id (e.g. `a/-`)
    #[error(
        "invalid part '{segment}' in title '{title}': it leads to id '{id}', which equals its parent id"
    )]
    InvalidPathSegment {
        title: String,
        segment: String,
        id: String,
    },

    /// A path segment sanitizes to nothing
    #[error("entry '{entry_id}' has an empty path segment in title '{title}'")]
    EmptyPathSegment { entry_id: String, title: String },

    /// The same id names two different things
    #[error("id '{id}' is claimed by a {existing} and a {requested}")]
    IdConflict {
        id: String,
        existing: EntryKind,
        requested: EntryKind,
    },

    /// One container id is reached through two different parents (e.g. `A-B`
    /// and `a/b`)
    #[error("container '{id}' (a {existing}) is reached again as a {requested} under another parent")]
    ContainerConflict {
        id: String,
        existing: EntryKind,
        requested: EntryKind,
    },
}

impl IndexBuildError {
    /// Id of the offending entry or container
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::InvalidPathSegment { id, .. }
            | Self::IdConflict { id, .. }
            | Self::ContainerConflict { id, .. } => id,
            Self::EmptyPathSegment { entry_id, .. } => entry_id,
        }
    }
}

/// Index payloads that match no supported protocol version
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Payload is not a JSON object
    #[error("index payload is not a JSON object")]
    NotAnObject,

    /// Payload has neither a version nor a legacy `stories` field
    #[error("index payload has no version field")]
    MissingVersion,

    /// Version field names an unknown protocol
    #[error("unsupported index version: v{0}")]
    UnsupportedVersion(u64),

    /// Payload matches a version but its body does not parse
    #[error("malformed v{version} index: {message}")]
    Malformed { version: u64, message: String },

    /// A v3 entry has neither `title` nor `kind`
    #[error("v3 entry '{0}' has neither a title nor a kind")]
    MissingTitle(String),
}

impl ProtocolError {
    pub(crate) fn malformed(version: u64, err: &serde_json::Error) -> Self {
        Self::Malformed {
            version,
            message: err.to_string(),
        }
    }
}

/// Story ids that cannot be derived from a kind and a name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Kind sanitizes to an empty string
    #[error("invalid kind '{0}', must include alphanumeric characters")]
    EmptyKind(String),

    /// Name sanitizes to an empty string
    #[error("invalid name '{0}', must include alphanumeric characters")]
    EmptyName(String),
}
