//! # Mesh Registry Test Suite
//!
//! Cross-crate tests for the registry, its service and the notification bus.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs      # Provisioning scenarios A-D
//!     ├── properties.rs     # Seeded randomized invariant sweeps
//!     └── bus_consumers.rs  # Indexers following the notification bus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p registry-tests
//!
//! # By category
//! cargo test -p registry-tests integration::properties::
//! ```

#![allow(dead_code)]

pub mod integration;
