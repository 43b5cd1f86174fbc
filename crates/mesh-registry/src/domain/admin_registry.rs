//! # Admin Registry
//!
//! Two allowlists (user-admins, exit-admins) and the immutable super-admin.
//! Lists hold tens of entries, so membership is a linear scan and removal
//! preserves list order. Writes are crate-private: every change goes through
//! `RegistryState` so it reaches the notification log.

use super::roles::RegistryOperation;
use registry_types::{Address, RegistryError, Role};
use serde::{Deserialize, Serialize};

/// One of the two mutable allowlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminList {
    /// Principals holding the user-admin role.
    UserAdmins,
    /// Principals holding the exit-admin role.
    ExitAdmins,
}

impl AdminList {
    /// The role granted by membership in this list.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::UserAdmins => Role::UserAdmin,
            Self::ExitAdmins => Role::ExitAdmin,
        }
    }
}

/// Allowlists plus the immutable super-admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRegistry {
    /// Fixed at construction.
    super_admin: Address,
    user_admins: Vec<Address>,
    exit_admins: Vec<Address>,
}

impl AdminRegistry {
    /// Creates a registry with empty allowlists.
    #[must_use]
    pub fn new(super_admin: Address) -> Self {
        Self {
            super_admin,
            user_admins: Vec::new(),
            exit_admins: Vec::new(),
        }
    }

    /// The super-admin address.
    #[must_use]
    pub fn super_admin(&self) -> Address {
        self.super_admin
    }

    /// Current members of a list, in insertion order.
    #[must_use]
    pub fn members(&self, list: AdminList) -> &[Address] {
        match list {
            AdminList::UserAdmins => &self.user_admins,
            AdminList::ExitAdmins => &self.exit_admins,
        }
    }

    fn members_mut(&mut self, list: AdminList) -> &mut Vec<Address> {
        match list {
            AdminList::UserAdmins => &mut self.user_admins,
            AdminList::ExitAdmins => &mut self.exit_admins,
        }
    }

    #[must_use]
    pub fn is_user_admin(&self, address: Address) -> bool {
        self.user_admins.contains(&address)
    }

    #[must_use]
    pub fn is_exit_admin(&self, address: Address) -> bool {
        self.exit_admins.contains(&address)
    }

    /// Returns true if `address` holds `role`.
    #[must_use]
    pub fn has_role(&self, address: Address, role: Role) -> bool {
        match role {
            Role::SuperAdmin => address == self.super_admin,
            Role::UserAdmin => self.is_user_admin(address),
            Role::ExitAdmin => self.is_exit_admin(address),
        }
    }

    /// Checks `caller` against the role `operation` requires.
    ///
    /// # Errors
    ///
    /// `UnauthorizedCaller` if the caller lacks the required role.
    pub fn authorize(
        &self,
        caller: Address,
        operation: RegistryOperation,
    ) -> Result<(), RegistryError> {
        let required = operation.required_role();
        if self.has_role(caller, required) {
            Ok(())
        } else {
            Err(RegistryError::UnauthorizedCaller { caller, required })
        }
    }

    // =========================================================================
    // VALIDATION (no writes)
    // =========================================================================

    /// Validates that `address` can be added to `list`.
    ///
    /// # Errors
    ///
    /// `DuplicateAdmin` if already present.
    pub fn check_grant(&self, list: AdminList, address: Address) -> Result<(), RegistryError> {
        if self.members(list).contains(&address) {
            return Err(RegistryError::DuplicateAdmin {
                address,
                role: list.role(),
            });
        }
        Ok(())
    }

    /// Validates that `address` can be removed from `list` and returns its
    /// position.
    ///
    /// # Errors
    ///
    /// `AdminNotFound` if absent.
    pub fn check_revoke(&self, list: AdminList, address: Address) -> Result<usize, RegistryError> {
        self.members(list)
            .iter()
            .position(|a| *a == address)
            .ok_or(RegistryError::AdminNotFound {
                address,
                role: list.role(),
            })
    }

    // =========================================================================
    // APPLICATION (validated input only)
    // =========================================================================

    pub(crate) fn grant(&mut self, list: AdminList, address: Address) {
        self.members_mut(list).push(address);
    }

    pub(crate) fn revoke_at(&mut self, list: AdminList, index: usize) -> Option<Address> {
        let members = self.members_mut(list);
        (index < members.len()).then(|| members.remove(index))
    }
}
