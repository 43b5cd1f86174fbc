//! Outbound (Driven) ports for the registry.
//!
//! The registry depends on one external system: whatever carries committed
//! notifications to indexers and mesh daemons.

use async_trait::async_trait;
use registry_bus::Notification;

/// Receives every committed notification, in commit order.
///
/// Delivery happens after the transition is applied, so a sink cannot veto
/// or roll back a transition. Slow consumers are the sink's concern.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification.
    async fn deliver(&self, notification: &Notification);
}
