//! # Registration Protocol
//!
//! The transition functions of the registry. Every call runs in two phases:
//!
//! ```text
//! RegistryCall ──prepare(&self)──→ PreparedMutation ──commit(&mut self)──→ RegistryEvent
//!                     │
//!                     └── Err(RegistryError): nothing written
//! ```
//!
//! `prepare` performs every check in a fixed order (authorization, reserved
//! identity, duplicate/existence) and resolves removal slots. `commit` only
//! applies what `prepare` validated and cannot fail, so a transition is
//! either fully applied or not applied at all.

use super::admin_registry::{AdminList, AdminRegistry};
use super::identity_store::IdentityStore;
use super::query::RegistryQuery;
use super::roles::RegistryOperation;
use registry_bus::RegistryEvent;
use registry_types::{Address, ExitIdentity, Identity, RegistryError};
use serde::{Deserialize, Serialize};

// =============================================================================
// CALLS
// =============================================================================

/// A mutating request against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryCall {
    AddClient { identity: Identity },
    RemoveClient { identity: Identity },
    AddExit { exit: ExitIdentity },
    RemoveExit { exit: ExitIdentity },
    AddUserAdmin { address: Address },
    RemoveUserAdmin { address: Address },
    AddExitAdmin { address: Address },
    RemoveExitAdmin { address: Address },
}

impl RegistryCall {
    /// The operation this call performs.
    #[must_use]
    pub const fn operation(&self) -> RegistryOperation {
        match self {
            Self::AddClient { .. } => RegistryOperation::AddClient,
            Self::RemoveClient { .. } => RegistryOperation::RemoveClient,
            Self::AddExit { .. } => RegistryOperation::AddExit,
            Self::RemoveExit { .. } => RegistryOperation::RemoveExit,
            Self::AddUserAdmin { .. } => RegistryOperation::AddUserAdmin,
            Self::RemoveUserAdmin { .. } => RegistryOperation::RemoveUserAdmin,
            Self::AddExitAdmin { .. } => RegistryOperation::AddExitAdmin,
            Self::RemoveExitAdmin { .. } => RegistryOperation::RemoveExitAdmin,
        }
    }
}

/// A call together with the principal submitting it.
///
/// JSON form: `{"caller": "0x..", "op": "add_client", "identity": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryTransaction {
    pub caller: Address,
    #[serde(flatten)]
    pub call: RegistryCall,
}

impl RegistryTransaction {
    #[must_use]
    pub fn new(caller: Address, call: RegistryCall) -> Self {
        Self { caller, call }
    }
}

// =============================================================================
// PREPARED MUTATIONS
// =============================================================================

/// A validated mutation, ready to be committed.
///
/// Only `RegistryState::prepare` builds one. It is valid for the state it was
/// prepared against and must be committed before any other mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMutation {
    operation: RegistryOperation,
    change: Change,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    InsertClient(Identity),
    RemoveClient { index: usize, stored: Identity },
    InsertExit(ExitIdentity),
    RemoveExit { index: usize, stored: ExitIdentity },
    Grant { list: AdminList, address: Address },
    Revoke { list: AdminList, index: usize, address: Address },
}

impl PreparedMutation {
    /// The operation that was validated.
    #[must_use]
    pub fn operation(&self) -> RegistryOperation {
        self.operation
    }
}

// =============================================================================
// REGISTRY STATE
// =============================================================================

/// Identity store and admin registry, mutated only through this protocol.
#[derive(Debug, Clone)]
pub struct RegistryState {
    pub(crate) store: IdentityStore,
    pub(crate) admins: AdminRegistry,
}

impl RegistryState {
    /// Creates an empty registry owned by `super_admin`.
    #[must_use]
    pub fn new(super_admin: Address) -> Self {
        Self {
            store: IdentityStore::new(),
            admins: AdminRegistry::new(super_admin),
        }
    }

    #[must_use]
    pub fn store(&self) -> &IdentityStore {
        &self.store
    }

    #[must_use]
    pub fn admins(&self) -> &AdminRegistry {
        &self.admins
    }

    /// Read-only view over the current state.
    #[must_use]
    pub fn query(&self) -> RegistryQuery<'_> {
        RegistryQuery::new(&self.store, &self.admins)
    }

    /// Validates `call` from `caller` without writing anything.
    ///
    /// # Errors
    ///
    /// The first failing check, in order: `UnauthorizedCaller`,
    /// `ReservedIdentity`, then `DuplicateUser` / `IdentityNotFound` /
    /// `DuplicateAdmin` / `AdminNotFound`.
    pub fn prepare(
        &self,
        caller: Address,
        call: &RegistryCall,
    ) -> Result<PreparedMutation, RegistryError> {
        let operation = call.operation();
        self.admins.authorize(caller, operation)?;

        let change = match call {
            RegistryCall::AddClient { identity } => {
                self.check_registrable(identity)?;
                Change::InsertClient(*identity)
            }
            RegistryCall::RemoveClient { identity } => {
                let index = self
                    .store
                    .client_position(identity)
                    .ok_or(RegistryError::IdentityNotFound(*identity))?;
                Change::RemoveClient {
                    index,
                    stored: self.store.clients()[index],
                }
            }
            RegistryCall::AddExit { exit } => {
                self.check_registrable(&exit.identity)?;
                Change::InsertExit(exit.clone())
            }
            RegistryCall::RemoveExit { exit } => {
                let index = self
                    .store
                    .exit_position(&exit.identity)
                    .ok_or(RegistryError::IdentityNotFound(exit.identity))?;
                Change::RemoveExit {
                    index,
                    stored: self.store.exits()[index].clone(),
                }
            }
            RegistryCall::AddUserAdmin { address } => {
                self.prepare_grant(AdminList::UserAdmins, *address)?
            }
            RegistryCall::RemoveUserAdmin { address } => {
                self.prepare_revoke(AdminList::UserAdmins, *address)?
            }
            RegistryCall::AddExitAdmin { address } => {
                self.prepare_grant(AdminList::ExitAdmins, *address)?
            }
            RegistryCall::RemoveExitAdmin { address } => {
                self.prepare_revoke(AdminList::ExitAdmins, *address)?
            }
        };

        Ok(PreparedMutation { operation, change })
    }

    fn check_registrable(&self, identity: &Identity) -> Result<(), RegistryError> {
        if identity.is_sentinel() {
            return Err(RegistryError::ReservedIdentity);
        }
        match self.store.first_collision(identity) {
            Some(attribute) => Err(RegistryError::DuplicateUser {
                identity: *identity,
                attribute,
            }),
            None => Ok(()),
        }
    }

    fn prepare_grant(&self, list: AdminList, address: Address) -> Result<Change, RegistryError> {
        self.admins.check_grant(list, address)?;
        Ok(Change::Grant { list, address })
    }

    fn prepare_revoke(&self, list: AdminList, address: Address) -> Result<Change, RegistryError> {
        let index = self.admins.check_revoke(list, address)?;
        Ok(Change::Revoke {
            list,
            index,
            address,
        })
    }

    /// Applies a prepared mutation and returns the event it produced.
    pub(crate) fn commit(&mut self, prepared: PreparedMutation) -> RegistryEvent {
        match prepared.change {
            Change::InsertClient(identity) => {
                self.store.insert_client(identity);
                RegistryEvent::ClientRegistered(identity)
            }
            Change::RemoveClient { index, stored } => {
                let removed = self.store.remove_client_at(index);
                debug_assert_eq!(removed, Some(stored));
                RegistryEvent::ClientRemoved(stored)
            }
            Change::InsertExit(exit) => {
                self.store.insert_exit(exit.clone());
                RegistryEvent::ExitRegistered(exit)
            }
            Change::RemoveExit { index, stored } => {
                let removed = self.store.remove_exit_at(index);
                debug_assert_eq!(removed.as_ref(), Some(&stored));
                RegistryEvent::ExitRemoved(stored)
            }
            Change::Grant { list, address } => {
                self.admins.grant(list, address);
                match list {
                    AdminList::UserAdmins => RegistryEvent::UserAdminAdded(address),
                    AdminList::ExitAdmins => RegistryEvent::ExitAdminAdded(address),
                }
            }
            Change::Revoke {
                list,
                index,
                address,
            } => {
                self.admins.revoke_at(list, index);
                match list {
                    AdminList::UserAdmins => RegistryEvent::UserAdminRemoved(address),
                    AdminList::ExitAdmins => RegistryEvent::ExitAdminRemoved(address),
                }
            }
        }
    }

    /// Prepares and commits `call` as one step.
    ///
    /// # Errors
    ///
    /// Any error from [`RegistryState::prepare`]; the state is unchanged.
    pub fn execute(
        &mut self,
        caller: Address,
        call: &RegistryCall,
    ) -> Result<RegistryEvent, RegistryError> {
        let prepared = self.prepare(caller, call)?;
        Ok(self.commit(prepared))
    }

    // =========================================================================
    // CONVENIENCE TRANSITIONS
    // =========================================================================

    /// Registers a client. Requires user-admin.
    ///
    /// # Errors
    ///
    /// `UnauthorizedCaller`, `ReservedIdentity`, `DuplicateUser`.
    pub fn add_client(
        &mut self,
        caller: Address,
        identity: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        self.execute(caller, &RegistryCall::AddClient { identity })
    }

    /// Removes the client equal to `identity` on all three attributes.
    ///
    /// # Errors
    ///
    /// `UnauthorizedCaller`, `IdentityNotFound`.
    pub fn remove_client(
        &mut self,
        caller: Address,
        identity: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        self.execute(caller, &RegistryCall::RemoveClient { identity })
    }

    /// Registers an exit. Requires exit-admin.
    ///
    /// # Errors
    ///
    /// `UnauthorizedCaller`, `ReservedIdentity`, `DuplicateUser`.
    pub fn add_exit(
        &mut self,
        caller: Address,
        exit: ExitIdentity,
    ) -> Result<RegistryEvent, RegistryError> {
        self.execute(caller, &RegistryCall::AddExit { exit })
    }

    /// Removes the exit whose embedded identity equals `exit.identity`.
    ///
    /// # Errors
    ///
    /// `UnauthorizedCaller`, `IdentityNotFound`.
    pub fn remove_exit(
        &mut self,
        caller: Address,
        exit: ExitIdentity,
    ) -> Result<RegistryEvent, RegistryError> {
        self.execute(caller, &RegistryCall::RemoveExit { exit })
    }
}
