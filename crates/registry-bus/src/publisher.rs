//! # Event Publisher
//!
//! Defines the publishing side of the notification bus.

use crate::events::{EventFilter, Notification};
use crate::subscriber::{EventStream, EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Outbound side of the bus, as the registry's sink adapter sees it.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hands `notification` to every live receiver and returns how many there
    /// were. Never blocks on slow receivers.
    async fn publish(&self, notification: Notification) -> usize;

    /// Publish attempts so far.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the notification bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics.
/// Suitable for a single registry process; a replicated deployment would
/// publish from each replica after the shared log has ordered the transaction.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<Notification>,
    /// Publish attempts, including those nobody received.
    events_published: AtomicU64,
    /// Per-receiver buffer; a receiver further behind than this lags.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory bus with specified capacity.
    ///
    /// A zero capacity is raised to 1; `broadcast::channel` rejects zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribes from the next published notification onward.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, callers = filter.callers.len(), "Subscription opened");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Like [`InMemoryEventBus::subscribe`], as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Live receivers, whatever their filter.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, notification: Notification) -> usize {
        let topic = notification.topic();
        let sequence = notification.sequence;

        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(notification) {
            Ok(receiver_count) => {
                debug!(
                    topic = ?topic,
                    sequence,
                    receivers = receiver_count,
                    "Notification published"
                );
                receiver_count
            }
            Err(e) => {
                // No receivers - the notification stays in the registry log only
                warn!(
                    topic = ?topic,
                    sequence,
                    error = %e,
                    "Notification dropped (no receivers)"
                );
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}
