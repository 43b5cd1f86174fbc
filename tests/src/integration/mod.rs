//! # Integration Tests
//!
//! Shared fixtures plus the three test groups.

pub mod bus_consumers;
pub mod properties;
pub mod scenarios;

use mesh_registry::prelude::*;
use std::sync::Arc;

/// Super-admin used by every fixture.
pub const SUPER_ADMIN: u64 = 0x5A;
/// User-admin granted at genesis.
pub const USER_ADMIN: u64 = 0x11;
/// Exit-admin granted at genesis.
pub const EXIT_ADMIN: u64 = 0x22;

pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

/// Identity from small integers, matching the `{mesh, key, chain}` notation.
pub fn identity(mesh: u128, key: u64, chain: u64) -> Identity {
    Identity::new(U128::from(mesh), U256::from(key), addr(chain))
}

pub fn exit(mesh: u128, key: u64, chain: u64) -> ExitIdentity {
    ExitIdentity::new(identity(mesh, key, chain), 4875, 59999)
}

pub fn genesis() -> RegistryConfig {
    RegistryConfig::new(addr(SUPER_ADMIN))
        .with_user_admins([addr(USER_ADMIN)])
        .with_exit_admins([addr(EXIT_ADMIN)])
}

/// Registry with one user-admin and one exit-admin, recording notifications.
pub async fn recording_registry() -> RegistryService<Arc<RecordingSink>> {
    let sink = Arc::new(RecordingSink::new());
    match RegistryService::bootstrap(&genesis(), sink).await {
        Ok(service) => service,
        Err(e) => panic!("genesis rejected: {e}"),
    }
}
