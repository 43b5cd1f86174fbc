//! # Registry Bus - Notifications for External Indexers
//!
//! Every committed registry transition produces exactly one `Notification`.
//! The registry publishes it here; indexers and the mesh daemons subscribe
//! and rebuild their caches from the full records each notification carries.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Registry   │                    │   Indexer    │
//! │   Service    │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Ordering
//!
//! Notifications are published in commit order and carry a gap-free
//! `sequence`. A subscriber that lags past the channel capacity skips
//! notifications; it can detect the gap from the sequence numbers and
//! re-read the registry's notification log.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, Notification, RegistryEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum notifications to buffer per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
