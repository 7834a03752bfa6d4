//! Story Store - index state for one manager session
//!
//! Owns the installed sidebar tree and what the manager learned about it:
//! - Full re-indexing with prepared-state carry-over
//! - Index errors with stale-but-available trees
//! - Session flags (preview initialized, options applied once)
//! - Current selection

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod selection;
pub mod store;

pub use error::{IndexError, IndexFetchError};
pub use selection::{Selection, ViewMode};
pub use store::{IndexStatus, IndexStore, SessionState, StoryPatch};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
