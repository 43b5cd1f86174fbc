//! # Mesh Membership Registry
//!
//! The authoritative list of network identities (clients and exit nodes)
//! allowed on the mesh, and the access-control layer deciding who may add or
//! remove them.
//!
//! ## Purpose
//!
//! Mesh daemons call the mutation API when provisioning a node, the query
//! API when selecting peers, and follow the notification stream to keep
//! local caches in sync.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Mesh address, public key and chain address unique across clients AND exits | `domain/protocol.rs` - `check_registrable()` |
//! | One index entry per attribute per record | `domain/identity_store.rs` - `insert_*` / `remove_*_at` |
//! | No address twice in one allowlist | `domain/admin_registry.rs` - `check_grant()` |
//! | Super-admin fixed at construction | `domain/admin_registry.rs` - no setter |
//! | Sentinel identity never registered | `domain/protocol.rs` - `ReservedIdentity` |
//! | Notification sequence starts at 1, no gaps | `domain/notification_log.rs` - `append()` |
//!
//! ## Role Capability Table
//!
//! | Operation | Required role |
//! |-----------|---------------|
//! | `add_client`, `remove_client` | user-admin |
//! | `add_exit`, `remove_exit` | exit-admin |
//! | `add/remove_user_admin`, `add/remove_exit_admin` | super-admin |
//!
//! The super-admin does not implicitly hold the other two roles.
//!
//! ## Transaction Flow
//!
//! ```text
//! RegistryTransaction ──→ RegistryService::submit (write lock)
//!                              │
//!                              ├── prepare: authorize → reserved → duplicate/existence
//!                              │        └── Err → rejected, nothing emitted
//!                              ├── commit: store + indices + admin lists
//!                              ├── NotificationLog::append (sequence n)
//!                              └── NotificationSink::deliver ──→ registry-bus ──→ indexers
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - EventBusSink, RecordingSink                        │
//! │  service.rs - RegistryService (tokio RwLock, tracing)           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - RegistryApi, RegistryQueries               │
//! │  ports/outbound.rs - NotificationSink                           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/ - store, admins, roles, protocol, query, log, snapshot │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use mesh_registry::prelude::*;
//!
//! let config = RegistryConfig::new(super_admin).with_user_admins([provisioner]);
//! let service = RegistryService::bootstrap(&config, RecordingSink::new()).await?;
//!
//! service.add_client(provisioner, identity).await?;
//! assert_eq!(service.find_client_by_public_key(identity.public_key).await, identity);
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapters::{EventBusSink, RecordingSink};
    pub use crate::config::RegistryConfig;
    pub use crate::domain::{
        AdminList, AdminRegistry, IdentityStore, InvariantCheckResult, NotificationLog,
        RegistryCall, RegistryOperation, RegistryQuery, RegistrySnapshot, RegistryState,
        RegistryTransaction,
    };
    pub use crate::errors::{ConfigError, ErrorKind, RegistryError, SnapshotError};
    pub use crate::ports::{NotificationSink, RegistryApi, RegistryQueries};
    pub use crate::service::{Receipt, ReceiptOutcome, RegistryService, ServiceStats};

    pub use registry_bus::{Notification, RegistryEvent};
    pub use registry_types::{Address, ExitIdentity, Identity, Role, WgKey, U128, U256};
}
