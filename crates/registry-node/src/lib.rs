//! # Mesh Registry Node
//!
//! Runs a mesh membership registry end to end: loads genesis, replays an
//! ordered transaction log, follows the notification bus the way an external
//! indexer would, and fingerprints the final state.
//!
//! ## Modular Structure
//!
//! - `cli` - command-line arguments (`clap`)
//! - `indexer` - bus consumer task
//! - `runtime` - startup sequence and transaction replay

pub mod cli;
pub mod indexer;
pub mod runtime;

pub use cli::Args;
pub use runtime::{run, RunReport};
