//! # Domain Invariants
//!
//! Checks that must hold for every reachable registry state. The protocol
//! maintains them by construction; these functions verify it, and
//! `RegistryState::from_snapshot` uses them to reject tampered state.
//!
//! - Attribute uniqueness: no two records across clients and exits share a
//!   mesh address, public key or chain address
//! - Index consistency: every index holds exactly the attributes of the
//!   stored records
//! - Admin uniqueness: no address appears twice in the same allowlist
//! - No registered sentinel
//! - Non-zero super-admin

use super::admin_registry::{AdminList, AdminRegistry};
use super::identity_store::IdentityStore;
use registry_types::{Address, Identity, IdentityAttribute, Role};
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

fn all_identities(store: &IdentityStore) -> impl Iterator<Item = &Identity> {
    store
        .clients()
        .iter()
        .chain(store.exits().iter().map(|e| &e.identity))
}

/// Attribute uniqueness across the union of clients and exits.
#[must_use]
pub fn check_attribute_uniqueness(store: &IdentityStore) -> Vec<InvariantViolation> {
    let mut mesh = HashSet::new();
    let mut keys = HashSet::new();
    let mut chain = HashSet::new();
    let mut violations = Vec::new();

    for identity in all_identities(store) {
        if !mesh.insert(identity.mesh_address) {
            violations.push(InvariantViolation::SharedAttribute {
                attribute: IdentityAttribute::MeshAddress,
                identity: *identity,
            });
        }
        if !keys.insert(identity.public_key) {
            violations.push(InvariantViolation::SharedAttribute {
                attribute: IdentityAttribute::PublicKey,
                identity: *identity,
            });
        }
        if !chain.insert(identity.chain_address) {
            violations.push(InvariantViolation::SharedAttribute {
                attribute: IdentityAttribute::ChainAddress,
                identity: *identity,
            });
        }
    }
    violations
}

/// Each index has exactly one entry per stored record.
#[must_use]
pub fn check_index_consistency(store: &IdentityStore) -> Vec<InvariantViolation> {
    let records = store.client_count() + store.exit_count();
    let mut violations = Vec::new();

    for attribute in [
        IdentityAttribute::MeshAddress,
        IdentityAttribute::PublicKey,
        IdentityAttribute::ChainAddress,
    ] {
        let indexed = store.index_len(attribute);
        let all_present = all_identities(store).all(|id| store.is_indexed(attribute, id));
        if indexed != records || !all_present {
            violations.push(InvariantViolation::IndexMismatch {
                attribute,
                indexed,
                records,
            });
        }
    }
    violations
}

/// No address appears twice within one allowlist.
#[must_use]
pub fn check_admin_uniqueness(admins: &AdminRegistry) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for list in [AdminList::UserAdmins, AdminList::ExitAdmins] {
        let mut seen = HashSet::new();
        for address in admins.members(list) {
            if !seen.insert(*address) {
                violations.push(InvariantViolation::DuplicateAdmin {
                    address: *address,
                    role: list.role(),
                });
            }
        }
    }
    violations
}

/// The sentinel identity is never stored.
#[must_use]
pub fn check_no_registered_sentinel(store: &IdentityStore) -> bool {
    !all_identities(store).any(Identity::is_sentinel)
}

/// The super-admin is a real address.
#[must_use]
pub fn check_super_admin(admins: &AdminRegistry) -> bool {
    !admins.super_admin().is_zero()
}

/// Runs every check.
#[must_use]
pub fn check_all_invariants(store: &IdentityStore, admins: &AdminRegistry) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_super_admin(admins) {
        violations.push(InvariantViolation::ZeroSuperAdmin);
    }
    if !check_no_registered_sentinel(store) {
        violations.push(InvariantViolation::SentinelRegistered);
    }
    violations.extend(check_attribute_uniqueness(store));
    violations.extend(check_index_consistency(store));
    violations.extend(check_admin_uniqueness(admins));

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Violations found; empty when valid.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(v) => v,
        }
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A second record reuses an attribute value.
    SharedAttribute {
        attribute: IdentityAttribute,
        identity: Identity,
    },
    /// An index disagrees with the stored records.
    IndexMismatch {
        attribute: IdentityAttribute,
        indexed: usize,
        records: usize,
    },
    /// An allowlist contains the same address twice.
    DuplicateAdmin { address: Address, role: Role },
    /// The all-zero identity is stored.
    SentinelRegistered,
    /// The super-admin is the zero address.
    ZeroSuperAdmin,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedAttribute {
                attribute,
                identity,
            } => write!(f, "{attribute} of {identity} is shared with another record"),
            Self::IndexMismatch {
                attribute,
                indexed,
                records,
            } => write!(
                f,
                "{attribute} index holds {indexed} entries for {records} records"
            ),
            Self::DuplicateAdmin { address, role } => {
                write!(f, "{address} listed twice as {role}")
            }
            Self::SentinelRegistered => f.write_str("sentinel identity is registered"),
            Self::ZeroSuperAdmin => f.write_str("super-admin is the zero address"),
        }
    }
}
