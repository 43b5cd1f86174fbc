//! Ports layer for the mesh registry.
//!
//! Defines the hexagonal architecture port traits:
//! - Inbound (Driving) ports: mutation and query API for mesh daemons
//! - Outbound (Driven) ports: notification delivery

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
