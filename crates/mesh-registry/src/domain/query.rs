//! # Query Service
//!
//! Read-only lookups. Nothing here fails: a missing record is reported as
//! the sentinel identity (or sentinel exit).

use super::admin_registry::{AdminList, AdminRegistry};
use super::identity_store::IdentityStore;
use registry_types::{Address, ExitIdentity, Identity, WgKey, U128, U256};
use std::net::Ipv6Addr;

/// Borrowed view over the registry state.
#[derive(Debug, Clone, Copy)]
pub struct RegistryQuery<'a> {
    store: &'a IdentityStore,
    admins: &'a AdminRegistry,
}

impl<'a> RegistryQuery<'a> {
    #[must_use]
    pub fn new(store: &'a IdentityStore, admins: &'a AdminRegistry) -> Self {
        Self { store, admins }
    }

    // =========================================================================
    // LISTS
    // =========================================================================

    /// All registered clients. Order may change after any removal.
    #[must_use]
    pub fn list_clients(&self) -> Vec<Identity> {
        self.store.clients().to_vec()
    }

    /// All registered exits. Order may change after any removal.
    #[must_use]
    pub fn list_exits(&self) -> Vec<ExitIdentity> {
        self.store.exits().to_vec()
    }

    #[must_use]
    pub fn client_count(&self) -> usize {
        self.store.client_count()
    }

    #[must_use]
    pub fn exit_count(&self) -> usize {
        self.store.exit_count()
    }

    // =========================================================================
    // CLIENT LOOKUPS
    // =========================================================================

    #[must_use]
    pub fn find_client_by_mesh_address(&self, mesh_address: U128) -> Identity {
        self.store.find_client_by_mesh_address(mesh_address)
    }

    #[must_use]
    pub fn find_client_by_public_key(&self, public_key: U256) -> Identity {
        self.store.find_client_by_public_key(public_key)
    }

    #[must_use]
    pub fn find_client_by_chain_address(&self, chain_address: Address) -> Identity {
        self.store.find_client_by_chain_address(chain_address)
    }

    /// Client lookup by the mesh IPv6 address.
    #[must_use]
    pub fn find_client_by_mesh_ip(&self, mesh_ip: Ipv6Addr) -> Identity {
        self.find_client_by_mesh_address(U128::from(u128::from(mesh_ip)))
    }

    /// Client lookup by WireGuard key.
    #[must_use]
    pub fn find_client_by_wg_key(&self, key: WgKey) -> Identity {
        self.find_client_by_public_key(U256::from(key))
    }

    // =========================================================================
    // EXIT LOOKUPS
    // =========================================================================

    #[must_use]
    pub fn find_exit_by_mesh_address(&self, mesh_address: U128) -> ExitIdentity {
        self.store.find_exit_by_mesh_address(mesh_address)
    }

    #[must_use]
    pub fn find_exit_by_public_key(&self, public_key: U256) -> ExitIdentity {
        self.store.find_exit_by_public_key(public_key)
    }

    #[must_use]
    pub fn find_exit_by_chain_address(&self, chain_address: Address) -> ExitIdentity {
        self.store.find_exit_by_chain_address(chain_address)
    }

    #[must_use]
    pub fn find_exit_by_mesh_ip(&self, mesh_ip: Ipv6Addr) -> ExitIdentity {
        self.find_exit_by_mesh_address(U128::from(u128::from(mesh_ip)))
    }

    #[must_use]
    pub fn find_exit_by_wg_key(&self, key: WgKey) -> ExitIdentity {
        self.find_exit_by_public_key(U256::from(key))
    }

    // =========================================================================
    // ADMINS
    // =========================================================================

    #[must_use]
    pub fn is_user_admin(&self, address: Address) -> bool {
        self.admins.is_user_admin(address)
    }

    #[must_use]
    pub fn is_exit_admin(&self, address: Address) -> bool {
        self.admins.is_exit_admin(address)
    }

    #[must_use]
    pub fn super_admin(&self) -> Address {
        self.admins.super_admin()
    }

    #[must_use]
    pub fn user_admins(&self) -> Vec<Address> {
        self.admins.members(AdminList::UserAdmins).to_vec()
    }

    #[must_use]
    pub fn exit_admins(&self) -> Vec<Address> {
        self.admins.members(AdminList::ExitAdmins).to_vec()
    }
}
