//! # Role Capability Table
//!
//! Every mutating operation requires exactly one role. This table is the
//! only place that maps operations to roles; `AdminRegistry::authorize`
//! is the only place that compares a caller against it.
//!
//! | Operation | Required role |
//! |-----------|---------------|
//! | `AddClient`, `RemoveClient` | user-admin |
//! | `AddExit`, `RemoveExit` | exit-admin |
//! | `Add/RemoveUserAdmin`, `Add/RemoveExitAdmin` | super-admin |

use registry_types::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutating operations exposed by the registration protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryOperation {
    AddClient,
    RemoveClient,
    AddExit,
    RemoveExit,
    AddUserAdmin,
    RemoveUserAdmin,
    AddExitAdmin,
    RemoveExitAdmin,
}

impl RegistryOperation {
    /// Every operation, in table order.
    pub const ALL: [Self; 8] = [
        Self::AddClient,
        Self::RemoveClient,
        Self::AddExit,
        Self::RemoveExit,
        Self::AddUserAdmin,
        Self::RemoveUserAdmin,
        Self::AddExitAdmin,
        Self::RemoveExitAdmin,
    ];

    /// The role a caller must hold to perform this operation.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::AddClient | Self::RemoveClient => Role::UserAdmin,
            Self::AddExit | Self::RemoveExit => Role::ExitAdmin,
            Self::AddUserAdmin
            | Self::RemoveUserAdmin
            | Self::AddExitAdmin
            | Self::RemoveExitAdmin => Role::SuperAdmin,
        }
    }

    /// Returns true if the operation only touches the admin lists.
    #[must_use]
    pub const fn is_admin_operation(self) -> bool {
        matches!(self.required_role(), Role::SuperAdmin)
    }

    /// Stable operation name, matching the transaction `op` tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddClient => "add_client",
            Self::RemoveClient => "remove_client",
            Self::AddExit => "add_exit",
            Self::RemoveExit => "remove_exit",
            Self::AddUserAdmin => "add_user_admin",
            Self::RemoveUserAdmin => "remove_user_admin",
            Self::AddExitAdmin => "add_exit_admin",
            Self::RemoveExitAdmin => "remove_exit_admin",
        }
    }
}

impl fmt::Display for RegistryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations granted to a role.
pub fn capabilities(role: Role) -> impl Iterator<Item = RegistryOperation> {
    RegistryOperation::ALL
        .into_iter()
        .filter(move |op| op.required_role() == role)
}
