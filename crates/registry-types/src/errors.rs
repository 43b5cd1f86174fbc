//! # Error Types
//!
//! Defines the registry error taxonomy. Every variant is terminal for the
//! attempted transition: nothing is retried and nothing is partially applied.

use crate::entities::{Address, Identity, IdentityAttribute, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by registry mutations.
///
/// Queries never fail; absence is reported through the sentinel identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The caller does not hold the role the operation requires.
    #[error("Unauthorized caller {caller}: requires {required}")]
    UnauthorizedCaller { caller: Address, required: Role },

    /// An attribute of the identity is already registered to a client or exit.
    #[error("Duplicate user {identity}: {attribute} already registered")]
    DuplicateUser {
        identity: Identity,
        attribute: IdentityAttribute,
    },

    /// The address is already present in the target allowlist.
    #[error("Duplicate admin: {address} is already a {role}")]
    DuplicateAdmin { address: Address, role: Role },

    /// The identity is not present in the relevant collection.
    #[error("Identity not found: {0}")]
    IdentityNotFound(Identity),

    /// The address is absent from the target allowlist.
    #[error("Admin not found: {address} is not a {role}")]
    AdminNotFound { address: Address, role: Role },

    /// The all-zero identity is reserved for "not found" lookups.
    #[error("Reserved identity: the all-zero identity cannot be registered")]
    ReservedIdentity,
}

/// Fieldless view of `RegistryError` for matching and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnauthorizedCaller,
    DuplicateUser,
    DuplicateAdmin,
    IdentityNotFound,
    AdminNotFound,
    ReservedIdentity,
}

impl RegistryError {
    /// Returns the fieldless kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnauthorizedCaller { .. } => ErrorKind::UnauthorizedCaller,
            Self::DuplicateUser { .. } => ErrorKind::DuplicateUser,
            Self::DuplicateAdmin { .. } => ErrorKind::DuplicateAdmin,
            Self::IdentityNotFound(_) => ErrorKind::IdentityNotFound,
            Self::AdminNotFound { .. } => ErrorKind::AdminNotFound,
            Self::ReservedIdentity => ErrorKind::ReservedIdentity,
        }
    }

    /// Returns true if the failure was an authorization check.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::UnauthorizedCaller { .. })
    }
}
