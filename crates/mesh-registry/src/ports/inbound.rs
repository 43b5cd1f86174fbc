//! # Driving Ports (API - Inbound)
//!
//! The interfaces mesh daemons use: mutations when provisioning a node,
//! queries when selecting peers.
//!
//! ## Authorization
//!
//! | Method | Required role |
//! |--------|---------------|
//! | `add_client`, `remove_client` | user-admin |
//! | `add_exit`, `remove_exit` | exit-admin |
//! | `add_user_admin`, `remove_user_admin`, `add_exit_admin`, `remove_exit_admin` | super-admin |
//! | every `RegistryQueries` method | anyone |

use crate::domain::RegistryCall;
use async_trait::async_trait;
use registry_bus::Notification;
use registry_types::{Address, ExitIdentity, Identity, RegistryError, WgKey, U128, U256};
use std::net::Ipv6Addr;

/// Mutating API. Each method is one atomic transaction.
///
/// Implementors supply [`RegistryApi::execute`]; the named methods are
/// shorthands for the corresponding `RegistryCall`.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Applies `call` on behalf of `caller` and returns the committed
    /// notification.
    ///
    /// # Errors
    ///
    /// Any `RegistryError`; on error nothing was applied or emitted.
    async fn execute(
        &self,
        caller: Address,
        call: RegistryCall,
    ) -> Result<Notification, RegistryError>;

    async fn add_client(
        &self,
        caller: Address,
        identity: Identity,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::AddClient { identity }).await
    }

    async fn remove_client(
        &self,
        caller: Address,
        identity: Identity,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::RemoveClient { identity })
            .await
    }

    async fn add_exit(
        &self,
        caller: Address,
        exit: ExitIdentity,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::AddExit { exit }).await
    }

    async fn remove_exit(
        &self,
        caller: Address,
        exit: ExitIdentity,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::RemoveExit { exit }).await
    }

    async fn add_user_admin(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::AddUserAdmin { address })
            .await
    }

    async fn remove_user_admin(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::RemoveUserAdmin { address })
            .await
    }

    async fn add_exit_admin(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::AddExitAdmin { address })
            .await
    }

    async fn remove_exit_admin(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<Notification, RegistryError> {
        self.execute(caller, RegistryCall::RemoveExitAdmin { address })
            .await
    }
}

/// Read-only API. Never fails; absence is the sentinel value.
#[async_trait]
pub trait RegistryQueries: Send + Sync {
    /// Snapshot of registered clients. Order is not stable across removals.
    async fn list_clients(&self) -> Vec<Identity>;

    /// Snapshot of registered exits. Order is not stable across removals.
    async fn list_exits(&self) -> Vec<ExitIdentity>;

    async fn find_client_by_mesh_address(&self, mesh_address: U128) -> Identity;
    async fn find_client_by_public_key(&self, public_key: U256) -> Identity;
    async fn find_client_by_chain_address(&self, chain_address: Address) -> Identity;
    /// Lookup by the IPv6 form of the mesh address, as a mesh daemon sees a peer.
    async fn find_client_by_mesh_ip(&self, mesh_ip: Ipv6Addr) -> Identity;
    /// Lookup by the base64 WireGuard key form of the public key.
    async fn find_client_by_wg_key(&self, key: WgKey) -> Identity;

    async fn find_exit_by_mesh_address(&self, mesh_address: U128) -> ExitIdentity;
    async fn find_exit_by_public_key(&self, public_key: U256) -> ExitIdentity;
    async fn find_exit_by_chain_address(&self, chain_address: Address) -> ExitIdentity;
    async fn find_exit_by_mesh_ip(&self, mesh_ip: Ipv6Addr) -> ExitIdentity;
    async fn find_exit_by_wg_key(&self, key: WgKey) -> ExitIdentity;

    async fn is_user_admin(&self, address: Address) -> bool;
    async fn is_exit_admin(&self, address: Address) -> bool;
    async fn super_admin(&self) -> Address;
}
