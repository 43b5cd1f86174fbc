//! # Event Subscriber
//!
//! Receiving side of the notification bus. The bus hands every notification
//! to every receiver; each subscription applies its own `EventFilter`.
//!
//! A receiver that falls more than the channel capacity behind skips the
//! oldest notifications. The skip is counted in `lagged()` and shows up as a
//! gap in `Notification::sequence`.

use crate::events::{EventFilter, Notification};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every publisher handle was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Anything a consumer can subscribe to.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// A filtered receiver on the bus.
pub struct Subscription {
    receiver: broadcast::Receiver<Notification>,
    filter: EventFilter,
    lagged: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<Notification>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            lagged: 0,
        }
    }

    /// Waits for the next matching notification.
    ///
    /// Returns `None` once the bus is gone and the buffer is drained.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) if self.filter.matches(&notification) => {
                    return Some(notification)
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(count)) => self.record_lag(count),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching notification if one is already buffered.
    ///
    /// # Errors
    ///
    /// `SubscriptionError::Closed` once the bus is gone and the buffer is
    /// drained.
    pub fn try_recv(&mut self) -> Result<Option<Notification>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(notification) if self.filter.matches(&notification) => {
                    return Ok(Some(notification))
                }
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(count)) => self.record_lag(count),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Notifications skipped so far because this receiver fell behind.
    #[must_use]
    pub fn lagged(&self) -> u64 {
        self.lagged
    }

    fn record_lag(&mut self, count: u64) {
        warn!(lagged = count, "Subscriber lagged, notifications skipped");
        self.lagged += count;
    }
}

/// A subscription as a `tokio_stream::Stream`.
///
/// Built on `BroadcastStream`, so an idle stream parks until the bus
/// publishes instead of polling.
pub struct EventStream {
    inner: BroadcastStream<Notification>,
    filter: EventFilter,
    lagged: u64,
}

impl EventStream {
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        let Subscription {
            receiver,
            filter,
            lagged,
        } = subscription;
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
            lagged,
        }
    }

    /// The filter applied to this stream.
    ///
    /// Named apart from `StreamExt::filter`, which would otherwise win method
    /// resolution.
    #[must_use]
    pub fn event_filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Notifications skipped so far because this stream fell behind.
    #[must_use]
    pub fn lagged(&self) -> u64 {
        self.lagged
    }
}

impl Stream for EventStream {
    type Item = Notification;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(notification))) => {
                    if this.filter.matches(&notification) {
                        return Poll::Ready(Some(notification));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    warn!(lagged = count, "Event stream lagged, notifications skipped");
                    this.lagged += count;
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
