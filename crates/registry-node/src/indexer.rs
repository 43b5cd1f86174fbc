//! # Indexer Task
//!
//! A bus consumer standing in for an external indexer: logs every
//! notification and checks that sequences arrive without gaps.

use registry_bus::{EventTopic, Subscription};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// What the indexer saw before the bus closed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IndexerSummary {
    pub indexed: u64,
    pub clients: u64,
    pub exits: u64,
    pub admins: u64,
    /// Newest sequence seen.
    pub last_sequence: u64,
    /// Notifications missed, from sequence gaps and lag.
    pub missed: u64,
}

/// Consumes `subscription` until the bus is dropped.
pub fn spawn_indexer(mut subscription: Subscription) -> JoinHandle<IndexerSummary> {
    tokio::spawn(async move {
        info!("Indexer started");
        let mut summary = IndexerSummary::default();

        while let Some(notification) = subscription.recv().await {
            let expected = summary.last_sequence + 1;
            if summary.last_sequence > 0 && notification.sequence != expected {
                warn!(
                    expected,
                    received = notification.sequence,
                    "Indexer observed a sequence gap"
                );
                summary.missed += notification.sequence.saturating_sub(expected);
            }
            summary.last_sequence = notification.sequence;
            summary.indexed += 1;

            match notification.topic() {
                EventTopic::Clients => summary.clients += 1,
                EventTopic::Exits => summary.exits += 1,
                EventTopic::Admins | EventTopic::All => summary.admins += 1,
            }

            let subject = notification
                .event
                .identity()
                .map(ToString::to_string)
                .or_else(|| notification.event.admin().map(|(a, _)| a.to_string()))
                .unwrap_or_default();
            info!(
                sequence = notification.sequence,
                event = notification.event.name(),
                caller = %notification.caller,
                subject = %subject,
                "Indexed notification"
            );
        }

        summary.missed = summary.missed.max(subscription.lagged());
        info!(indexed = summary.indexed, "Indexer stopped: bus closed");
        summary
    })
}
