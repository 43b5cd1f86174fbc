//! # Registry Events
//!
//! Defines the notifications that flow through the bus. Each one carries the
//! full affected record so consumers never need to re-query the registry.

use registry_types::{Address, ExitIdentity, Identity, Role};
use serde::{Deserialize, Serialize};

/// A committed registry transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryEvent {
    // =========================================================================
    // CLIENTS
    // =========================================================================
    /// A client identity was registered.
    ClientRegistered(Identity),

    /// A client identity was removed. Carries the stored record.
    ClientRemoved(Identity),

    // =========================================================================
    // EXITS
    // =========================================================================
    /// An exit was registered, metadata included.
    ExitRegistered(ExitIdentity),

    /// An exit was removed. Carries the stored record, metadata included.
    ExitRemoved(ExitIdentity),

    // =========================================================================
    // ADMIN LISTS
    // =========================================================================
    /// An address was added to the user-admin list.
    UserAdminAdded(Address),

    /// An address was removed from the user-admin list.
    UserAdminRemoved(Address),

    /// An address was added to the exit-admin list.
    ExitAdminAdded(Address),

    /// An address was removed from the exit-admin list.
    ExitAdminRemoved(Address),
}

impl RegistryEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ClientRegistered(_) | Self::ClientRemoved(_) => EventTopic::Clients,
            Self::ExitRegistered(_) | Self::ExitRemoved(_) => EventTopic::Exits,
            Self::UserAdminAdded(_)
            | Self::UserAdminRemoved(_)
            | Self::ExitAdminAdded(_)
            | Self::ExitAdminRemoved(_) => EventTopic::Admins,
        }
    }

    /// Stable event name for logs and indexer schemas.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClientRegistered(_) => "client_registered",
            Self::ClientRemoved(_) => "client_removed",
            Self::ExitRegistered(_) => "exit_registered",
            Self::ExitRemoved(_) => "exit_removed",
            Self::UserAdminAdded(_) => "user_admin_added",
            Self::UserAdminRemoved(_) => "user_admin_removed",
            Self::ExitAdminAdded(_) => "exit_admin_added",
            Self::ExitAdminRemoved(_) => "exit_admin_removed",
        }
    }

    /// The core identity touched by this event, if it concerns a record.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::ClientRegistered(id) | Self::ClientRemoved(id) => Some(id),
            Self::ExitRegistered(exit) | Self::ExitRemoved(exit) => Some(&exit.identity),
            _ => None,
        }
    }

    /// The admin address and list touched by this event, if any.
    #[must_use]
    pub fn admin(&self) -> Option<(Address, Role)> {
        match self {
            Self::UserAdminAdded(a) | Self::UserAdminRemoved(a) => Some((*a, Role::UserAdmin)),
            Self::ExitAdminAdded(a) | Self::ExitAdminRemoved(a) => Some((*a, Role::ExitAdmin)),
            _ => None,
        }
    }
}

/// One entry of the registry's append-only notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Position in the log. Starts at 1, strictly increasing, no gaps.
    pub sequence: u64,
    /// Principal whose transaction produced the event.
    pub caller: Address,
    /// The committed transition.
    pub event: RegistryEvent,
}

impl Notification {
    /// Get the topic of the carried event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        self.event.topic()
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Client registrations and removals.
    Clients,
    /// Exit registrations and removals.
    Exits,
    /// Admin list changes.
    Admins,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific notifications.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Callers to include. Empty means all callers.
    pub callers: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all notifications.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            callers: Vec::new(),
        }
    }

    /// Create a filter for notifications produced by specific callers.
    #[must_use]
    pub fn from_callers(callers: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            callers,
        }
    }

    /// Check if a notification matches this filter.
    #[must_use]
    pub fn matches(&self, notification: &Notification) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&notification.topic());

        let caller_match = self.callers.is_empty() || self.callers.contains(&notification.caller);

        topic_match && caller_match
    }
}
