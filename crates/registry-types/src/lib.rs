//! # Registry Types Crate
//!
//! This crate contains the records, addresses and error taxonomy shared by
//! every crate of the mesh membership registry.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Identity`, `ExitIdentity`, `Address` and
//!   `RegistryError` are defined once here.
//! - **Core-Attribute Equality**: exits compare only on their embedded
//!   `Identity`; region and payment metadata is advisory.
//! - **Sentinel Lookups**: the all-zero `Identity` means "not found" and can
//!   never be registered.

pub mod entities;
pub mod errors;
pub mod wg_key;

pub use entities::*;
pub use errors::*;
pub use wg_key::{KeyParseError, WgKey};
