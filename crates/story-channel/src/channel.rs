//! In-process message bus
//!
//! - Every [`Subscription`] receives every envelope emitted after it was created
//! - Dropping a subscription unregisters it
//! - [`Channel::close`] ends all subscriptions

use crate::error::ChannelError;
use crate::event::{Envelope, Event, RefHandle};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

#[derive(Debug)]
struct Subscriber {
    id: u64,
    sender: mpsc::UnboundedSender<Envelope>,
}

#[derive(Debug, Default)]
struct Shared {
    next_id: AtomicU64,
    closed: AtomicBool,
    subscribers: Mutex<Vec<Subscriber>>,
}

/// Cloneable handle to a message bus
#[derive(Debug, Clone, Default)]
pub struct Channel {
    shared: Arc<Shared>,
}

impl Channel {
    /// Create an open channel with no subscribers
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);

        let mut subscribers = self.shared.subscribers.lock();
        if self.shared.closed.load(Ordering::Acquire) {
            // sender dropped here, so the subscription reports Closed
            return Subscription {
                id,
                receiver,
                shared: Weak::new(),
            };
        }
        subscribers.push(Subscriber { id, sender });
        drop(subscribers);
        tracing::debug!("Subscriber {} registered", id);

        Subscription {
            id,
            receiver,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Deliver an envelope to every live subscriber
    ///
    /// Returns the number of subscribers that received it.
    pub fn emit(&self, envelope: Envelope) -> usize {
        let mut subscribers = self.shared.subscribers.lock();
        subscribers.retain(|s| !s.sender.is_closed());

        let delivered = subscribers
            .iter()
            .filter(|s| s.sender.send(envelope.clone()).is_ok())
            .count();

        tracing::trace!("Emitted {} to {} subscribers", envelope.event.name(), delivered);
        delivered
    }

    /// Emit an event from the local context
    pub fn emit_local(&self, event: Event) -> usize {
        self.emit(Envelope::local(event))
    }

    /// Emit an event on behalf of a composed ref
    pub fn emit_from_ref(&self, event: Event, handle: RefHandle) -> usize {
        self.emit(Envelope::from_ref(event, handle))
    }

    /// Close the channel; pending events are still delivered
    pub fn close(&self) {
        let mut subscribers = self.shared.subscribers.lock();
        self.shared.closed.store(true, Ordering::Release);
        let dropped = std::mem::take(&mut *subscribers);
        drop(subscribers);
        tracing::debug!("Channel closed, {} subscribers released", dropped.len());
    }

    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Number of registered subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }
}

/// Receiving end registered on a [`Channel`]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<Envelope>,
    shared: Weak<Shared>,
}

impl Subscription {
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next envelope
    ///
    /// # Errors
    /// Returns [`ChannelError::Closed`] once the channel is closed and drained.
    pub async fn recv(&mut self) -> Result<Envelope, ChannelError> {
        self.receiver.recv().await.ok_or(ChannelError::Closed)
    }

    /// Take the next envelope if one is queued
    ///
    /// # Errors
    /// Returns [`ChannelError::Empty`] if nothing is queued, or
    /// [`ChannelError::Closed`] once the channel is closed and drained.
    pub fn try_recv(&mut self) -> Result<Envelope, ChannelError> {
        self.receiver.try_recv().map_err(|e| match e {
            mpsc::error::TryRecvError::Empty => ChannelError::Empty,
            mpsc::error::TryRecvError::Disconnected => ChannelError::Closed,
        })
    }

    /// Take every envelope queued right now
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::iter::from_fn(|| self.try_recv().ok()).collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.subscribers.lock().retain(|s| s.id != self.id);
            tracing::debug!("Subscriber {} unregistered", self.id);
        }
    }
}
