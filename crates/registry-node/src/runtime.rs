//! # Node Runtime
//!
//! ## Startup Sequence
//!
//! 1. Load genesis configuration (file, then `MESH_REGISTRY_*` env overrides)
//! 2. Create the notification bus and start the indexer on it
//! 3. Bootstrap the registry (genesis admins become sequences 1..=n)
//! 4. Replay or dry-run the transaction list, one receipt per transaction
//! 5. Snapshot, fingerprint, optionally write the snapshot out
//! 6. Drop the bus and wait for the indexer to drain

use crate::cli::Args;
use crate::indexer::{spawn_indexer, IndexerSummary};

use anyhow::{Context, Result};
use mesh_registry::prelude::*;
use registry_bus::{EventFilter, InMemoryEventBus};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of one node run.
#[derive(Debug)]
pub struct RunReport {
    /// One per transaction; empty when none were given.
    pub receipts: Vec<Receipt>,
    pub snapshot: RegistrySnapshot,
    /// `0x`-prefixed Keccak-256 of the snapshot encoding.
    pub digest: String,
    pub indexer: IndexerSummary,
}

/// Loads and validates the genesis configuration.
///
/// # Errors
///
/// Unreadable or malformed file, bad override, or invalid configuration.
pub async fn load_config(path: &Path) -> Result<RegistryConfig> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("loading genesis {}", path.display()))?;
    let mut config = RegistryConfig::from_json_str(&json)
        .with_context(|| format!("parsing genesis {}", path.display()))?;
    config
        .apply_env_overrides()
        .context("applying environment overrides")?;
    config.validate().context("validating genesis")?;
    Ok(config)
}

/// Loads an ordered transaction list.
///
/// # Errors
///
/// Unreadable or malformed file.
pub async fn load_transactions(path: &Path) -> Result<Vec<RegistryTransaction>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading transactions {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing transactions {}", path.display()))
}

/// Runs the node to completion.
///
/// # Errors
///
/// I/O and parse failures at the boundaries. Rejected transactions are not
/// errors; they are reported in the receipts.
pub async fn run(args: &Args) -> Result<RunReport> {
    let config = load_config(&args.genesis).await?;
    let transactions = match &args.transactions {
        Some(path) => load_transactions(path).await?,
        None => Vec::new(),
    };

    let bus = Arc::new(InMemoryEventBus::with_capacity(config.event_channel_capacity));
    let indexer = spawn_indexer(bus.subscribe(EventFilter::all()));

    let service = RegistryService::bootstrap(&config, EventBusSink::new(Arc::clone(&bus)))
        .await
        .context("bootstrapping registry")?;
    drop(bus);

    let receipts = if args.dry_run {
        service.dry_run_batch(transactions).await
    } else {
        service.apply_batch(transactions).await
    };
    for receipt in &receipts {
        log_receipt(receipt);
    }

    let snapshot = service.snapshot().await;
    let digest = snapshot.digest_hex().context("hashing snapshot")?;

    if let Some(path) = &args.snapshot_out {
        let json = serde_json::to_string_pretty(&snapshot).context("encoding snapshot")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        info!(path = %path.display(), "Snapshot written");
    }

    let stats = service.stats().await;
    info!(
        committed = stats.committed,
        rejected = stats.rejected,
        clients = stats.clients,
        exits = stats.exits,
        last_sequence = stats.last_sequence,
        digest = %digest,
        "Run complete"
    );

    // Last bus handle lives in the sink; dropping it closes the indexer's stream
    drop(service);
    let indexer = indexer.await.context("indexer task failed")?;

    Ok(RunReport {
        receipts,
        snapshot,
        digest,
        indexer,
    })
}

fn log_receipt(receipt: &Receipt) {
    match &receipt.outcome {
        ReceiptOutcome::Committed { sequence } => info!(
            index = receipt.index,
            op = %receipt.operation,
            caller = %receipt.caller,
            sequence,
            "Receipt: committed"
        ),
        ReceiptOutcome::Accepted => info!(
            index = receipt.index,
            op = %receipt.operation,
            caller = %receipt.caller,
            "Receipt: would commit"
        ),
        ReceiptOutcome::Rejected { kind, reason } => warn!(
            index = receipt.index,
            op = %receipt.operation,
            caller = %receipt.caller,
            kind = ?kind,
            reason = %reason,
            "Receipt: rejected"
        ),
    }
}
