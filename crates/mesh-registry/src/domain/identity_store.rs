//! # Identity Store
//!
//! Holds registered clients and exits plus three membership indices.
//!
//! ## Data Structures
//!
//! - `clients`, `exits`: dense vectors, swap-and-pop on removal
//! - `by_mesh_address`, `by_public_key`, `by_chain_address`: one shared set
//!   per attribute covering BOTH collections
//!
//! ## Ordering
//!
//! Removal moves the last record into the vacated slot, so iteration order
//! is unordered after any removal. Consumers must not rely on positions.
//!
//! ## Preconditions
//!
//! `insert_*` does not re-check uniqueness; the registration protocol
//! validates before inserting.

use registry_types::{Address, ExitIdentity, Identity, IdentityAttribute, U128, U256};
use std::collections::HashSet;

/// Registered clients and exits with cross-collection uniqueness indices.
#[derive(Debug, Clone, Default)]
pub struct IdentityStore {
    /// Registered clients.
    clients: Vec<Identity>,

    /// Registered exits.
    exits: Vec<ExitIdentity>,

    /// Mesh addresses in use by any client or exit.
    by_mesh_address: HashSet<U128>,

    /// Public keys in use by any client or exit.
    by_public_key: HashSet<U256>,

    /// Chain addresses in use by any client or exit.
    by_chain_address: HashSet<Address>,
}

impl IdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered clients.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Number of registered exits.
    #[must_use]
    pub fn exit_count(&self) -> usize {
        self.exits.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.exits.is_empty()
    }

    /// Registered clients, in storage order.
    #[must_use]
    pub fn clients(&self) -> &[Identity] {
        &self.clients
    }

    /// Registered exits, in storage order.
    #[must_use]
    pub fn exits(&self) -> &[ExitIdentity] {
        &self.exits
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Appends a client and indexes its three attributes.
    pub fn insert_client(&mut self, identity: Identity) {
        self.index(&identity);
        self.clients.push(identity);
    }

    /// Appends an exit and indexes its three attributes.
    pub fn insert_exit(&mut self, exit: ExitIdentity) {
        self.index(&exit.identity);
        self.exits.push(exit);
    }

    /// Removes the client at `index` by swap-and-pop and clears its index
    /// entries. Returns `None` if `index` is out of bounds.
    pub fn remove_client_at(&mut self, index: usize) -> Option<Identity> {
        if index >= self.clients.len() {
            return None;
        }
        let removed = self.clients.swap_remove(index);
        self.unindex(&removed);
        Some(removed)
    }

    /// Removes the exit at `index` by swap-and-pop and clears its index
    /// entries. Returns `None` if `index` is out of bounds.
    pub fn remove_exit_at(&mut self, index: usize) -> Option<ExitIdentity> {
        if index >= self.exits.len() {
            return None;
        }
        let removed = self.exits.swap_remove(index);
        self.unindex(&removed.identity);
        Some(removed)
    }

    fn index(&mut self, identity: &Identity) {
        self.by_mesh_address.insert(identity.mesh_address);
        self.by_public_key.insert(identity.public_key);
        self.by_chain_address.insert(identity.chain_address);
    }

    fn unindex(&mut self, identity: &Identity) {
        self.by_mesh_address.remove(&identity.mesh_address);
        self.by_public_key.remove(&identity.public_key);
        self.by_chain_address.remove(&identity.chain_address);
    }

    // =========================================================================
    // DUPLICATE DETECTION
    // =========================================================================

    /// Returns true if any attribute of `identity` is already registered to a
    /// client or an exit.
    #[must_use]
    pub fn contains_any_of(&self, identity: &Identity) -> bool {
        self.first_collision(identity).is_some()
    }

    /// The first attribute of `identity` already in use, checked in the order
    /// mesh address, public key, chain address.
    #[must_use]
    pub fn first_collision(&self, identity: &Identity) -> Option<IdentityAttribute> {
        if self.by_mesh_address.contains(&identity.mesh_address) {
            Some(IdentityAttribute::MeshAddress)
        } else if self.by_public_key.contains(&identity.public_key) {
            Some(IdentityAttribute::PublicKey)
        } else if self.by_chain_address.contains(&identity.chain_address) {
            Some(IdentityAttribute::ChainAddress)
        } else {
            None
        }
    }

    /// Returns true if the attribute value of `identity` is in its index.
    #[must_use]
    pub fn is_indexed(&self, attribute: IdentityAttribute, identity: &Identity) -> bool {
        match attribute {
            IdentityAttribute::MeshAddress => self.by_mesh_address.contains(&identity.mesh_address),
            IdentityAttribute::PublicKey => self.by_public_key.contains(&identity.public_key),
            IdentityAttribute::ChainAddress => {
                self.by_chain_address.contains(&identity.chain_address)
            }
        }
    }

    /// Number of values in the index for `attribute`.
    #[must_use]
    pub fn index_len(&self, attribute: IdentityAttribute) -> usize {
        match attribute {
            IdentityAttribute::MeshAddress => self.by_mesh_address.len(),
            IdentityAttribute::PublicKey => self.by_public_key.len(),
            IdentityAttribute::ChainAddress => self.by_chain_address.len(),
        }
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Position of the client equal to `identity` on all three attributes.
    #[must_use]
    pub fn client_position(&self, identity: &Identity) -> Option<usize> {
        self.clients.iter().position(|c| c == identity)
    }

    /// Position of the exit whose embedded identity equals `identity`.
    #[must_use]
    pub fn exit_position(&self, identity: &Identity) -> Option<usize> {
        self.exits.iter().position(|e| e.identity == *identity)
    }

    /// Client with the given mesh address, or the sentinel.
    #[must_use]
    pub fn find_client_by_mesh_address(&self, mesh_address: U128) -> Identity {
        self.find_client(|c| c.mesh_address == mesh_address)
    }

    /// Client with the given public key, or the sentinel.
    #[must_use]
    pub fn find_client_by_public_key(&self, public_key: U256) -> Identity {
        self.find_client(|c| c.public_key == public_key)
    }

    /// Client with the given chain address, or the sentinel.
    #[must_use]
    pub fn find_client_by_chain_address(&self, chain_address: Address) -> Identity {
        self.find_client(|c| c.chain_address == chain_address)
    }

    /// Exit with the given mesh address, or the sentinel exit.
    #[must_use]
    pub fn find_exit_by_mesh_address(&self, mesh_address: U128) -> ExitIdentity {
        self.find_exit(|e| e.mesh_address == mesh_address)
    }

    /// Exit with the given public key, or the sentinel exit.
    #[must_use]
    pub fn find_exit_by_public_key(&self, public_key: U256) -> ExitIdentity {
        self.find_exit(|e| e.public_key == public_key)
    }

    /// Exit with the given chain address, or the sentinel exit.
    #[must_use]
    pub fn find_exit_by_chain_address(&self, chain_address: Address) -> ExitIdentity {
        self.find_exit(|e| e.chain_address == chain_address)
    }

    fn find_client(&self, pred: impl Fn(&Identity) -> bool) -> Identity {
        self.clients
            .iter()
            .find(|&c| pred(c))
            .copied()
            .unwrap_or(Identity::SENTINEL)
    }

    fn find_exit(&self, pred: impl Fn(&Identity) -> bool) -> ExitIdentity {
        self.exits
            .iter()
            .find(|e| pred(&e.identity))
            .cloned()
            .unwrap_or_else(ExitIdentity::sentinel)
    }
}
