//! # Adapters (Outer Hexagon)
//!
//! Implementations of the outbound ports.

pub mod notification_sink;

pub use notification_sink::{EventBusSink, RecordingSink};
