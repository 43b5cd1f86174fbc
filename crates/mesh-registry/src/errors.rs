//! # Error Types
//!
//! Errors of the service, configuration and snapshot layers. The domain
//! taxonomy (`RegistryError`) lives in `registry-types`.

use crate::domain::InvariantViolation;
use registry_types::{Address, Role};
use std::path::PathBuf;
use thiserror::Error;

pub use registry_types::{ErrorKind, RegistryError};

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors loading or validating a `RegistryConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The genesis file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The genesis JSON is malformed.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value}")]
    InvalidOverride { var: &'static str, value: String },

    /// The super-admin is the zero address.
    #[error("super_admin must not be the zero address")]
    ZeroSuperAdmin,

    /// The notification channel capacity is zero.
    #[error("event_channel_capacity must be at least 1")]
    ZeroChannelCapacity,

    /// The same address appears twice in one genesis allowlist.
    #[error("{address} listed twice as {role}")]
    DuplicateAdmin { address: Address, role: Role },

    /// Seeding a genesis admin was rejected by the protocol.
    #[error("genesis seeding failed: {0}")]
    Genesis(#[from] RegistryError),
}

// =============================================================================
// SNAPSHOT ERRORS
// =============================================================================

/// Errors encoding, decoding or restoring a `RegistrySnapshot`.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Binary encoding failed.
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    /// JSON encoding failed.
    #[error("snapshot JSON failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot describes a state the protocol could never produce.
    #[error("snapshot violates registry invariants: {}", join(.0))]
    InvariantViolation(Vec<InvariantViolation>),
}

fn join(violations: &[InvariantViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
