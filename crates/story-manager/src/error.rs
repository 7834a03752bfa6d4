//! Error types for the stories manager
//!
//! Index errors themselves live in `story-store`, where they are kept as
//! state; these cover setting the manager up.

use story_channel::ChannelError;
use story_store::IndexError;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parses but cannot work
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Manager setup and driving errors
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// The HTTP client could not be created
    #[error("http client error: {0}")]
    Client(String),
}

impl ManagerError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Index(e) => e.is_retryable(),
            Self::Config(_) | Self::Channel(_) | Self::Client(_) => false,
        }
    }
}
