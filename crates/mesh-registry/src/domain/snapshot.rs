//! # Registry Snapshots
//!
//! A complete, serializable copy of the registry state. Two replicas that
//! applied the same transactions produce byte-identical encodings, so the
//! Keccak-256 digest of the encoding is a cheap state fingerprint.
//!
//! Restoring goes through `RegistryState::from_snapshot`, which rebuilds the
//! indices and re-checks every invariant before accepting the data.

use super::admin_registry::{AdminList, AdminRegistry};
use super::identity_store::IdentityStore;
use super::invariants::{check_all_invariants, InvariantCheckResult};
use super::protocol::RegistryState;
use crate::errors::SnapshotError;
use registry_types::{Address, ExitIdentity, Identity};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Point-in-time copy of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub super_admin: Address,
    pub user_admins: Vec<Address>,
    pub exit_admins: Vec<Address>,
    /// Clients in storage order.
    pub clients: Vec<Identity>,
    /// Exits in storage order, metadata included.
    pub exits: Vec<ExitIdentity>,
    /// Sequence of the last notification reflected in this state.
    pub last_sequence: u64,
}

impl RegistrySnapshot {
    /// Canonical binary encoding.
    ///
    /// # Errors
    ///
    /// `SnapshotError::Encoding` if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a snapshot produced by [`RegistrySnapshot::to_bytes`].
    ///
    /// Decoding does not validate invariants; restore through
    /// `RegistryState::from_snapshot` for that.
    ///
    /// # Errors
    ///
    /// `SnapshotError::Encoding` on malformed input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Keccak-256 of the canonical encoding.
    ///
    /// # Errors
    ///
    /// `SnapshotError::Encoding` if serialization fails.
    pub fn digest(&self) -> Result<[u8; 32], SnapshotError> {
        let bytes = self.to_bytes()?;
        Ok(Keccak256::digest(&bytes).into())
    }

    /// `0x`-prefixed hex form of [`RegistrySnapshot::digest`].
    ///
    /// # Errors
    ///
    /// `SnapshotError::Encoding` if serialization fails.
    pub fn digest_hex(&self) -> Result<String, SnapshotError> {
        Ok(format!("0x{}", hex::encode(self.digest()?)))
    }
}

impl RegistryState {
    /// Captures the current state, stamped with `last_sequence`.
    #[must_use]
    pub fn snapshot(&self, last_sequence: u64) -> RegistrySnapshot {
        RegistrySnapshot {
            super_admin: self.admins.super_admin(),
            user_admins: self.admins.members(AdminList::UserAdmins).to_vec(),
            exit_admins: self.admins.members(AdminList::ExitAdmins).to_vec(),
            clients: self.store.clients().to_vec(),
            exits: self.store.exits().to_vec(),
            last_sequence,
        }
    }

    /// Rebuilds a state from `snapshot`, preserving storage order.
    ///
    /// # Errors
    ///
    /// `SnapshotError::InvariantViolation` if the snapshot shares attributes
    /// across records, lists an admin twice, stores the sentinel, or names
    /// the zero address as super-admin.
    pub fn from_snapshot(snapshot: &RegistrySnapshot) -> Result<Self, SnapshotError> {
        let mut store = IdentityStore::new();
        for client in &snapshot.clients {
            store.insert_client(*client);
        }
        for exit in &snapshot.exits {
            store.insert_exit(exit.clone());
        }

        let mut admins = AdminRegistry::new(snapshot.super_admin);
        for address in &snapshot.user_admins {
            admins.grant(AdminList::UserAdmins, *address);
        }
        for address in &snapshot.exit_admins {
            admins.grant(AdminList::ExitAdmins, *address);
        }

        match check_all_invariants(&store, &admins) {
            InvariantCheckResult::Valid => Ok(Self { store, admins }),
            InvariantCheckResult::Invalid(violations) => {
                Err(SnapshotError::InvariantViolation(violations))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariants::InvariantViolation;
    use crate::domain::protocol::RegistryCall;
    use registry_types::{U128, U256};

    const SUPER: u64 = 0x5A;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn id(n: u64) -> Identity {
        Identity::new(U128::from(n), U256::from(n), addr(n))
    }

    fn populated() -> RegistryState {
        let mut state = RegistryState::new(addr(SUPER));
        state
            .execute(addr(SUPER), &RegistryCall::AddUserAdmin { address: addr(1) })
            .unwrap();
        state
            .execute(addr(SUPER), &RegistryCall::AddExitAdmin { address: addr(2) })
            .unwrap();
        for n in 10..15 {
            state.add_client(addr(1), id(n)).unwrap();
        }
        state
            .add_exit(
                addr(2),
                ExitIdentity::new(id(20), 4875, 59999).with_regions([U256::from(7u8)]),
            )
            .unwrap();
        state.remove_client(addr(1), id(11)).unwrap();
        state
    }

    #[test]
    fn test_binary_round_trip_preserves_digest() {
        let snapshot = populated().snapshot(9);
        let bytes = snapshot.to_bytes().unwrap();
        let decoded = RegistrySnapshot::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.digest().unwrap(), snapshot.digest().unwrap());
        // Metadata survives even though equality ignores it
        assert_eq!(decoded.exits[0].allowed_regions, vec![U256::from(7u8)]);
    }

    #[test]
    fn test_restore_preserves_order_and_indices() {
        let state = populated();
        let snapshot = state.snapshot(9);
        let restored = RegistryState::from_snapshot(&snapshot).unwrap();

        assert_eq!(restored.store().clients(), state.store().clients());
        assert_eq!(restored.snapshot(9).digest_hex().unwrap(), snapshot.digest_hex().unwrap());
        assert!(restored.store().contains_any_of(&id(12)));
        assert!(!restored.store().contains_any_of(&id(11)));
    }

    #[test]
    fn test_digest_changes_with_state() {
        let mut state = populated();
        let before = state.snapshot(9).digest().unwrap();
        state.add_client(addr(1), id(30)).unwrap();
        assert_ne!(state.snapshot(10).digest().unwrap(), before);
        assert!(state.snapshot(10).digest_hex().unwrap().starts_with("0x"));
    }

    #[test]
    fn test_restore_rejects_shared_attribute() {
        let mut snapshot = populated().snapshot(9);
        // Exit reuses a client's public key
        let mut forged = id(40);
        forged.public_key = U256::from(10u8);
        snapshot.exits.push(ExitIdentity::new(forged, 1, 1));

        let Err(SnapshotError::InvariantViolation(violations)) =
            RegistryState::from_snapshot(&snapshot)
        else {
            panic!("expected invariant violation");
        };
        assert!(violations
            .iter()
            .any(|v| matches!(v, InvariantViolation::SharedAttribute { .. })));
    }

    #[test]
    fn test_restore_rejects_zero_super_admin_and_duplicate_admin() {
        let mut snapshot = populated().snapshot(9);
        snapshot.super_admin = Address::ZERO;
        snapshot.user_admins.push(addr(1));

        let err = RegistryState::from_snapshot(&snapshot).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("zero address"));
        assert!(message.contains("listed twice"));
    }

    #[test]
    fn test_malformed_bytes_rejected() {
        assert!(matches!(
            RegistrySnapshot::from_bytes(&[0xFF, 0x01]),
            Err(SnapshotError::Encoding(_))
        ));
    }
}
