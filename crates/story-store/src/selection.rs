//! Current selection

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How the selected entry is shown
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewMode {
    Story,
    Docs,
    Settings,
    Other(String),
}

impl ViewMode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Story => "story",
            Self::Docs => "docs",
            Self::Settings => "settings",
            Self::Other(other) => other,
        }
    }

    /// Story and docs views render the preview canvas
    #[inline]
    #[must_use]
    pub fn is_canvas(&self) -> bool {
        matches!(self, Self::Story | Self::Docs)
    }
}

impl From<&str> for ViewMode {
    fn from(value: &str) -> Self {
        match value {
            "story" => Self::Story,
            "docs" => Self::Docs,
            "settings" => Self::Settings,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ViewMode {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ViewMode> for String {
    fn from(value: ViewMode) -> Self {
        value.as_str().to_string()
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected entry and view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub story_id: String,
    pub view_mode: ViewMode,
}

impl Selection {
    #[must_use]
    pub fn new(story_id: impl Into<String>, view_mode: impl Into<ViewMode>) -> Self {
        Self {
            story_id: story_id.into(),
            view_mode: view_mode.into(),
        }
    }
}
