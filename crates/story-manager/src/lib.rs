//! Stories Manager - keeps the sidebar index in sync with a preview
//!
//! Drives a [`story_store::IndexStore`] from channel events:
//! - Index fetching over HTTP or from a file, with invalidation
//! - Local and composed-ref handling of preview events
//! - Story selection and keyboard navigation
//! - The args update/reset request protocol
//!
//! # Example
//!
//! ```rust,ignore
//! use story_channel::Channel;
//! use story_manager::{ManagerConfig, StoriesManager};
//!
//! let channel = Channel::new();
//! let subscription = channel.subscribe();
//! let mut manager = StoriesManager::from_config(&ManagerConfig::new(), channel, host)?;
//! manager.run(subscription).await;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod manager;
pub mod navigation;
pub mod protocol;
pub mod source;

pub use config::{DocsOptions, ManagerConfig, SidebarConfig};
pub use controller::{apply_payload, FetchController, FetchState};
pub use error::{ConfigError, ManagerError};
pub use host::{ManagerHost, RefData, RefUpdate};
pub use manager::StoriesManager;
pub use navigation::{resolve_story, NavOutcome, Route};
pub use source::{FileIndexSource, HttpIndexSource, IndexSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
