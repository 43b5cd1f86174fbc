//! # Notification Log
//!
//! Append-only record of committed transitions. Sequence numbers start at 1
//! and increase by exactly one per entry. There is no removal API.

use registry_bus::{Notification, RegistryEvent};
use registry_types::Address;

/// Ordered list of notifications produced by the registry.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    /// Sequence number preceding the first retained entry.
    base: u64,
    entries: Vec<Notification>,
}

impl NotificationLog {
    /// Creates an empty log whose first entry will carry sequence 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty log that continues after `last_sequence`.
    ///
    /// Used when restoring from a snapshot: entries before the snapshot are
    /// not retained, but numbering carries on without a gap.
    #[must_use]
    pub fn starting_after(last_sequence: u64) -> Self {
        Self {
            base: last_sequence,
            entries: Vec::new(),
        }
    }

    /// Appends `event` and returns the stored notification.
    pub fn append(&mut self, caller: Address, event: RegistryEvent) -> Notification {
        let notification = Notification {
            sequence: self.last_sequence() + 1,
            caller,
            event,
        };
        self.entries.push(notification.clone());
        notification
    }

    /// Retained entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Entries with a sequence strictly greater than `sequence`.
    #[must_use]
    pub fn since(&self, sequence: u64) -> &[Notification] {
        let skip = sequence.saturating_sub(self.base);
        let skip = usize::try_from(skip).unwrap_or(usize::MAX).min(self.entries.len());
        &self.entries[skip..]
    }

    /// Sequence of the newest entry, or the restore point if none were added.
    #[must_use]
    pub fn last_sequence(&self) -> u64 {
        self.base + self.entries.len() as u64
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
