//! Story Index - sidebar tree construction
//!
//! Turns the flat entry mapping served by a project (or pushed by a preview)
//! into the ordered navigation tree shown in the manager sidebar:
//! - Protocol normalization (v1/v2 legacy payloads, v3 and v4 indexes)
//! - Entry normalization (path splitting, container ids, parent/children/depth)
//! - Tree ordering (rootless components first, depth-first pre-order)
//! - Lookup lists used by keyboard navigation
//!
//! # Example
//!
//! ```rust,ignore
//! use story_index::{build_index, IndexConfig, IndexPayload};
//!
//! let payload = IndexPayload::from_json_str(body)?;
//! if let IndexPayload::Entries(entries) = payload {
//!     let tree = build_index(entries.into_values(), &IndexConfig::default())?;
//!     for (id, entry) in tree.iter() {
//!         println!("{}{id}", "  ".repeat(entry.depth()));
//!     }
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod builder;
pub mod config;
pub mod entry;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod protocol;
pub mod slug;
pub mod tree;

pub use builder::{build_index, order_entries};
pub use config::IndexConfig;
pub use entry::{
    kind_slug, Args, ContainerEntry, EntryId, EntryKind, EntryType, IndexEntry, LeafEntry,
    Parameters, RawEntry,
};
pub use error::{IdError, IndexBuildError, ProtocolError};
pub use normalize::normalize_entries;
pub use protocol::{combine_parameters, IndexPayload, LegacyStories};
pub use slug::{sanitize, split_title, to_id};
pub use tree::IndexTree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
