//! # Domain Layer (Inner Hexagon)
//!
//! Pure registry logic: the identity store, the admin allowlists, the
//! registration protocol and its read-only query view.
//! NO I/O, NO async, NO logging.
//!
//! ## Components
//!
//! - `identity_store`: clients, exits and the three uniqueness indices
//! - `admin_registry`: user-admin and exit-admin allowlists, super-admin
//! - `roles`: operation to required-role table
//! - `protocol`: `RegistryState` with prepare/commit transitions
//! - `query`: sentinel-returning lookups
//! - `notification_log`: append-only, gap-free notification sequence
//! - `invariants`: state checks used by tests and snapshot restore
//! - `snapshot`: serializable state with Keccak-256 fingerprint

pub mod admin_registry;
pub mod identity_store;
pub mod invariants;
pub mod notification_log;
pub mod protocol;
pub mod query;
pub mod roles;
pub mod snapshot;

pub use admin_registry::*;
pub use identity_store::*;
pub use invariants::*;
pub use notification_log::*;
pub use protocol::*;
pub use query::*;
pub use roles::*;
pub use snapshot::*;
