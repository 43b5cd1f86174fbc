//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Replays an ordered transaction log against a fresh mesh registry.
#[derive(Parser, Debug, Clone)]
#[command(name = "registry-node")]
#[command(about = "Mesh membership registry node: genesis, transaction replay, snapshots")]
pub struct Args {
    /// Genesis configuration (JSON: super_admin, user_admins, exit_admins)
    #[arg(short, long)]
    pub genesis: PathBuf,

    /// Ordered transaction list (JSON array of {caller, op, ...})
    #[arg(short, long)]
    pub transactions: Option<PathBuf>,

    /// Write the final snapshot here as JSON
    #[arg(long)]
    pub snapshot_out: Option<PathBuf>,

    /// Validate each transaction against the genesis state without applying it
    #[arg(long)]
    pub dry_run: bool,
}
