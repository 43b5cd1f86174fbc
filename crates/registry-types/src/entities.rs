//! # Core Registry Entities
//!
//! Defines the records held by the membership registry.
//!
//! ## Clusters
//!
//! - **Principals**: `Address`, `Role`
//! - **Records**: `Identity`, `ExitIdentity`, `IdentityAttribute`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

// Re-export the wide integers from primitive-types for use across all crates
pub use primitive_types::{U128, U256};

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte ledger account address.
///
/// Serialized as a `0x`-prefixed, 40 hex digit string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address whose low-order 8 bytes hold `value` (big-endian).
    #[must_use]
    pub fn from_low_u64_be(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 20] = slice.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; 20] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

/// Error returned when parsing an `Address` from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// The input was not valid hex.
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),

    /// The input decoded to the wrong number of bytes.
    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes).ok_or(AddressParseError::InvalidLength(bytes.len()))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Privilege tiers recognized by the registry.
///
/// The super-admin does not implicitly hold the other two roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The single immutable principal that manages both admin lists.
    SuperAdmin,
    /// May register and remove clients.
    UserAdmin,
    /// May register and remove exits.
    ExitAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SuperAdmin => "super-admin",
            Self::UserAdmin => "user-admin",
            Self::ExitAdmin => "exit-admin",
        };
        f.write_str(name)
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// The three identity-defining attributes of a mesh participant.
///
/// The all-zero value is the sentinel returned by lookups that find nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Identity {
    /// Address within the routing mesh (an IPv6 address as a 128-bit integer).
    pub mesh_address: U128,
    /// Network-layer public key (the WireGuard key as a 256-bit integer).
    pub public_key: U256,
    /// Ledger account used for payment settlement.
    pub chain_address: Address,
}

impl Identity {
    /// The reserved "not found" identity.
    pub const SENTINEL: Self = Self {
        mesh_address: U128([0; 2]),
        public_key: U256([0; 4]),
        chain_address: Address::ZERO,
    };

    /// Creates an identity from its three attributes.
    #[must_use]
    pub fn new(mesh_address: U128, public_key: U256, chain_address: Address) -> Self {
        Self {
            mesh_address,
            public_key,
            chain_address,
        }
    }

    /// Creates an identity whose mesh address is taken from an IPv6 address.
    #[must_use]
    pub fn with_mesh_ip(mesh_ip: Ipv6Addr, public_key: U256, chain_address: Address) -> Self {
        Self::new(U128::from(u128::from(mesh_ip)), public_key, chain_address)
    }

    /// Returns true for the reserved all-zero identity.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Interprets the mesh address as an IPv6 address.
    #[must_use]
    pub fn mesh_ip(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.mesh_address.as_u128())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{mesh={}, key=0x{:x}, addr={}}}",
            self.mesh_ip(),
            self.public_key,
            self.chain_address
        )
    }
}

/// One of the three uniquely indexed identity attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityAttribute {
    /// `Identity::mesh_address`.
    MeshAddress,
    /// `Identity::public_key`.
    PublicKey,
    /// `Identity::chain_address`.
    ChainAddress,
}

impl fmt::Display for IdentityAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MeshAddress => "mesh address",
            Self::PublicKey => "public key",
            Self::ChainAddress => "chain address",
        };
        f.write_str(name)
    }
}

// =============================================================================
// EXIT IDENTITY
// =============================================================================

/// A mesh participant that also offers internet egress.
///
/// Equality looks only at `identity`; ports, regions and payment types are
/// advisory metadata and never participate in duplicate detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExitIdentity {
    /// Core identity attributes.
    pub identity: Identity,
    /// Port clients use to register with the exit.
    pub registration_port: u16,
    /// Port the exit tunnel listens on.
    pub listen_port: u16,
    /// Region codes the exit serves.
    #[serde(default)]
    pub allowed_regions: Vec<U256>,
    /// Payment-method codes the exit accepts.
    #[serde(default)]
    pub payment_types: Vec<U256>,
}

impl ExitIdentity {
    /// Creates an exit with ports and no region or payment metadata.
    #[must_use]
    pub fn new(identity: Identity, registration_port: u16, listen_port: u16) -> Self {
        Self {
            identity,
            registration_port,
            listen_port,
            allowed_regions: Vec::new(),
            payment_types: Vec::new(),
        }
    }

    /// The reserved "not found" exit.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::default()
    }

    /// Returns true if the embedded identity is the sentinel.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.identity.is_sentinel()
    }

    /// Adds region codes.
    #[must_use]
    pub fn with_regions(mut self, regions: impl IntoIterator<Item = U256>) -> Self {
        self.allowed_regions.extend(regions);
        self
    }

    /// Adds payment-method codes.
    #[must_use]
    pub fn with_payment_types(mut self, payment_types: impl IntoIterator<Item = U256>) -> Self {
        self.payment_types.extend(payment_types);
        self
    }
}

impl PartialEq for ExitIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for ExitIdentity {}

impl fmt::Display for ExitIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ports={}/{}",
            self.identity, self.registration_port, self.listen_port
        )
    }
}
