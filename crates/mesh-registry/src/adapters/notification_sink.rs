//! # Notification Sink Adapters
//!
//! - `EventBusSink`: publishes to the registry event bus for indexers
//! - `RecordingSink`: keeps every notification in memory (tests, dry runs)

use crate::ports::outbound::NotificationSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use registry_bus::{EventPublisher, Notification};
use std::sync::Arc;
use tracing::debug;

/// Publishes notifications to an event bus.
pub struct EventBusSink<P: EventPublisher> {
    publisher: Arc<P>,
}

impl<P: EventPublisher> EventBusSink<P> {
    pub fn new(publisher: Arc<P>) -> Self {
        Self { publisher }
    }

    /// The underlying publisher, for subscribing indexers.
    #[must_use]
    pub fn publisher(&self) -> &Arc<P> {
        &self.publisher
    }
}

#[async_trait]
impl<P: EventPublisher> NotificationSink for EventBusSink<P> {
    async fn deliver(&self, notification: &Notification) {
        let receivers = self.publisher.publish(notification.clone()).await;
        debug!(
            sequence = notification.sequence,
            event = notification.event.name(),
            receivers,
            "Notification delivered to bus"
        );
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.delivered.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delivered.lock().is_empty()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: &Notification) {
        self.delivered.lock().push(notification.clone());
    }
}

#[async_trait]
impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    async fn deliver(&self, notification: &Notification) {
        (**self).deliver(notification).await;
    }
}
