//! Story Channel - typed message bus
//!
//! Carries events between the manager, its local preview and composed refs:
//! - [`Event`]: tagged union of every inbound and outbound message
//! - [`Source`]: whether an event came from the local context or a ref
//! - [`Channel`] / [`Subscription`]: fan-out bus with unregister-on-drop
//!
//! # Example
//!
//! ```rust,ignore
//! use story_channel::{Channel, Event};
//!
//! let channel = Channel::new();
//! let mut subscription = channel.subscribe();
//! channel.emit_local(Event::StoryIndexInvalidated);
//! let envelope = subscription.recv().await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod channel;
pub mod error;
pub mod event;

pub use channel::{Channel, Subscription};
pub use error::ChannelError;
pub use event::{Envelope, Event, RefHandle, Source};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
