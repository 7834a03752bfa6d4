//! Host seam
//!
//! The manager does not own routing, UI options or the ref registry; it
//! drives them through [`ManagerHost`].

use crate::navigation::Route;
use indexmap::IndexMap;
use serde_json::Value;

/// Change to a composed ref's registry entry
#[derive(Debug, Clone, PartialEq)]
pub enum RefUpdate {
    /// Replace the ref's flat index
    Index(IndexMap<String, Value>),
    /// The ref's preview reported it is up
    PreviewInitialized,
}

/// Full data to register for a composed ref
#[derive(Debug, Clone, PartialEq)]
pub enum RefData {
    /// Index payload pushed by the ref
    Index(Value),
    /// Stories from a legacy v1/v2 payload, parameters already combined
    SetStoriesData(IndexMap<String, Value>),
}

/// Services the surrounding UI provides to the manager
#[cfg_attr(test, mockall::automock)]
pub trait ManagerHost: Send {
    /// Apply UI options taken from story parameters
    fn set_options(&mut self, options: Value);

    /// Change the current route
    fn navigate(&mut self, route: &Route);

    /// Whether a settings screen currently replaces the canvas
    fn is_settings_screen_active(&self) -> bool;

    /// Patch a composed ref
    fn update_ref(&mut self, ref_id: &str, update: RefUpdate);

    /// Replace a composed ref's data; `ready` marks it loaded
    fn set_ref(&mut self, ref_id: &str, data: RefData, ready: bool);
}
