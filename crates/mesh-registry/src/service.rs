//! # Registry Service
//!
//! Async front of the registry: serializes transactions, records
//! notifications, and hands them to the outbound sink.
//!
//! ## Transaction Boundary
//!
//! State and notification log share one `tokio::sync::RwLock`. A submission
//! holds the write lock across prepare → commit → log append → sink delivery,
//! so sink order equals commit order. Queries take the read lock and never
//! observe a half-applied transition.

use crate::config::RegistryConfig;
use crate::domain::{
    InvariantCheckResult, NotificationLog, RegistryCall, RegistryOperation, RegistryQuery,
    RegistrySnapshot, RegistryState, RegistryTransaction,
};
use crate::errors::{ConfigError, SnapshotError};
use crate::ports::inbound::{RegistryApi, RegistryQueries};
use crate::ports::outbound::NotificationSink;

use async_trait::async_trait;
use registry_bus::Notification;
use registry_types::{
    Address, ErrorKind, ExitIdentity, Identity, RegistryError, WgKey, U128, U256,
};
use std::net::Ipv6Addr;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Counters for the registry service.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Transactions committed.
    pub committed: u64,
    /// Transactions rejected by the protocol.
    pub rejected: u64,
    /// Registered clients.
    pub clients: usize,
    /// Registered exits.
    pub exits: usize,
    /// Sequence of the newest notification.
    pub last_sequence: u64,
}

/// Outcome of one transaction in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the submitted batch.
    pub index: usize,
    pub caller: Address,
    pub operation: RegistryOperation,
    pub outcome: ReceiptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReceiptOutcome {
    /// Applied and logged under `sequence`.
    Committed { sequence: u64 },
    /// Would commit in a dry run; nothing was applied.
    Accepted,
    Rejected { kind: ErrorKind, reason: String },
}

impl ReceiptOutcome {
    fn rejected(error: &RegistryError) -> Self {
        Self::Rejected {
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

impl Receipt {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self.outcome, ReceiptOutcome::Committed { .. })
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, ReceiptOutcome::Rejected { .. })
    }
}

struct Ledger {
    state: RegistryState,
    log: NotificationLog,
    committed: u64,
    rejected: u64,
}

/// The registry service.
///
/// Shared via `Arc`; every method takes `&self`.
pub struct RegistryService<N: NotificationSink> {
    ledger: RwLock<Ledger>,
    sink: N,
}

impl<N: NotificationSink> RegistryService<N> {
    /// Builds a registry from genesis configuration.
    ///
    /// Genesis admins are granted through the protocol by the super-admin,
    /// so they appear in the notification log as sequences 1..=n.
    ///
    /// # Errors
    ///
    /// Any `ConfigError` from `RegistryConfig::validate`.
    pub async fn bootstrap(config: &RegistryConfig, sink: N) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            super_admin = %config.super_admin,
            user_admins = config.user_admins.len(),
            exit_admins = config.exit_admins.len(),
            "Bootstrapping mesh registry"
        );

        let service = Self::with_parts(
            RegistryState::new(config.super_admin),
            NotificationLog::new(),
            sink,
        );

        let grants = config
            .user_admins
            .iter()
            .map(|&address| RegistryCall::AddUserAdmin { address })
            .chain(
                config
                    .exit_admins
                    .iter()
                    .map(|&address| RegistryCall::AddExitAdmin { address }),
            );
        for call in grants {
            service.apply(config.super_admin, call).await?;
        }
        Ok(service)
    }

    /// Restores a registry from a snapshot. Numbering continues after
    /// `snapshot.last_sequence`.
    ///
    /// # Errors
    ///
    /// `SnapshotError::InvariantViolation` for an inconsistent snapshot.
    pub fn from_snapshot(snapshot: &RegistrySnapshot, sink: N) -> Result<Self, SnapshotError> {
        let state = RegistryState::from_snapshot(snapshot)?;
        info!(
            clients = snapshot.clients.len(),
            exits = snapshot.exits.len(),
            last_sequence = snapshot.last_sequence,
            "Restored mesh registry from snapshot"
        );
        Ok(Self::with_parts(
            state,
            NotificationLog::starting_after(snapshot.last_sequence),
            sink,
        ))
    }

    fn with_parts(state: RegistryState, log: NotificationLog, sink: N) -> Self {
        Self {
            ledger: RwLock::new(Ledger {
                state,
                log,
                committed: 0,
                rejected: 0,
            }),
            sink,
        }
    }

    /// The outbound sink.
    pub fn sink(&self) -> &N {
        &self.sink
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Applies one serialized transaction.
    ///
    /// # Errors
    ///
    /// Any `RegistryError`; nothing is applied or emitted on error.
    #[instrument(
        skip(self, transaction),
        fields(
            caller = %transaction.caller,
            op = %transaction.call.operation(),
            correlation_id = %Uuid::new_v4(),
        )
    )]
    pub async fn submit(
        &self,
        transaction: RegistryTransaction,
    ) -> Result<Notification, RegistryError> {
        self.apply(transaction.caller, transaction.call).await
    }

    async fn apply(
        &self,
        caller: Address,
        call: RegistryCall,
    ) -> Result<Notification, RegistryError> {
        let mut ledger = self.ledger.write().await;

        let prepared = match ledger.state.prepare(caller, &call) {
            Ok(prepared) => prepared,
            Err(e) => {
                ledger.rejected += 1;
                warn!(
                    caller = %caller,
                    op = %call.operation(),
                    kind = ?e.kind(),
                    error = %e,
                    "Transaction rejected"
                );
                return Err(e);
            }
        };

        let event = ledger.state.commit(prepared);
        let notification = ledger.log.append(caller, event);
        ledger.committed += 1;

        info!(
            sequence = notification.sequence,
            event = notification.event.name(),
            caller = %caller,
            "Transaction committed"
        );

        // Delivered under the write lock: sink order is commit order
        self.sink.deliver(&notification).await;

        Ok(notification)
    }

    /// Applies `transactions` in order, each as its own atomic step.
    /// A rejected transaction does not stop the batch.
    pub async fn apply_batch(
        &self,
        transactions: impl IntoIterator<Item = RegistryTransaction>,
    ) -> Vec<Receipt> {
        let mut receipts = Vec::new();
        for (index, transaction) in transactions.into_iter().enumerate() {
            let caller = transaction.caller;
            let operation = transaction.call.operation();
            let outcome = match self.submit(transaction).await {
                Ok(notification) => ReceiptOutcome::Committed {
                    sequence: notification.sequence,
                },
                Err(e) => ReceiptOutcome::rejected(&e),
            };
            receipts.push(Receipt {
                index,
                caller,
                operation,
                outcome,
            });
        }
        debug!(
            total = receipts.len(),
            committed = receipts.iter().filter(|r| r.is_committed()).count(),
            "Batch applied"
        );
        receipts
    }

    /// Runs `transactions` in order against a scratch copy of the current
    /// state. Effects accumulate across the batch, so each receipt says what
    /// the same batch would do through [`RegistryService::apply_batch`].
    /// Nothing is applied, logged or delivered.
    pub async fn dry_run_batch(
        &self,
        transactions: impl IntoIterator<Item = RegistryTransaction>,
    ) -> Vec<Receipt> {
        let mut scratch = self.ledger.read().await.state.clone();

        let receipts: Vec<Receipt> = transactions
            .into_iter()
            .enumerate()
            .map(|(index, transaction)| {
                let operation = transaction.call.operation();
                let outcome = match scratch.execute(transaction.caller, &transaction.call) {
                    Ok(_) => ReceiptOutcome::Accepted,
                    Err(e) => ReceiptOutcome::rejected(&e),
                };
                Receipt {
                    index,
                    caller: transaction.caller,
                    operation,
                    outcome,
                }
            })
            .collect();

        debug!(
            total = receipts.len(),
            accepted = receipts.iter().filter(|r| !r.is_rejected()).count(),
            "Dry run complete"
        );
        receipts
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Runs `f` against a consistent read view.
    pub async fn with_query<R>(&self, f: impl FnOnce(RegistryQuery<'_>) -> R + Send) -> R {
        let ledger = self.ledger.read().await;
        f(ledger.state.query())
    }

    /// Captures the current state.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        let ledger = self.ledger.read().await;
        ledger.state.snapshot(ledger.log.last_sequence())
    }

    /// Logged notifications with a sequence greater than `sequence`.
    pub async fn notifications_since(&self, sequence: u64) -> Vec<Notification> {
        self.ledger.read().await.log.since(sequence).to_vec()
    }

    pub async fn last_sequence(&self) -> u64 {
        self.ledger.read().await.log.last_sequence()
    }

    pub async fn stats(&self) -> ServiceStats {
        let ledger = self.ledger.read().await;
        ServiceStats {
            committed: ledger.committed,
            rejected: ledger.rejected,
            clients: ledger.state.store().client_count(),
            exits: ledger.state.store().exit_count(),
            last_sequence: ledger.log.last_sequence(),
        }
    }

    /// Verifies every domain invariant against the live state.
    pub async fn check_invariants(&self) -> InvariantCheckResult {
        let ledger = self.ledger.read().await;
        crate::domain::check_all_invariants(ledger.state.store(), ledger.state.admins())
    }
}

#[async_trait]
impl<N: NotificationSink> RegistryApi for RegistryService<N> {
    async fn execute(
        &self,
        caller: Address,
        call: RegistryCall,
    ) -> Result<Notification, RegistryError> {
        self.submit(RegistryTransaction::new(caller, call)).await
    }
}

#[async_trait]
impl<N: NotificationSink> RegistryQueries for RegistryService<N> {
    async fn list_clients(&self) -> Vec<Identity> {
        self.with_query(|q| q.list_clients()).await
    }

    async fn list_exits(&self) -> Vec<ExitIdentity> {
        self.with_query(|q| q.list_exits()).await
    }

    async fn find_client_by_mesh_address(&self, mesh_address: U128) -> Identity {
        self.with_query(|q| q.find_client_by_mesh_address(mesh_address))
            .await
    }

    async fn find_client_by_public_key(&self, public_key: U256) -> Identity {
        self.with_query(|q| q.find_client_by_public_key(public_key))
            .await
    }

    async fn find_client_by_chain_address(&self, chain_address: Address) -> Identity {
        self.with_query(|q| q.find_client_by_chain_address(chain_address))
            .await
    }

    async fn find_client_by_mesh_ip(&self, mesh_ip: Ipv6Addr) -> Identity {
        self.with_query(|q| q.find_client_by_mesh_ip(mesh_ip)).await
    }

    async fn find_client_by_wg_key(&self, key: WgKey) -> Identity {
        self.with_query(|q| q.find_client_by_wg_key(key)).await
    }

    async fn find_exit_by_mesh_address(&self, mesh_address: U128) -> ExitIdentity {
        self.with_query(|q| q.find_exit_by_mesh_address(mesh_address))
            .await
    }

    async fn find_exit_by_public_key(&self, public_key: U256) -> ExitIdentity {
        self.with_query(|q| q.find_exit_by_public_key(public_key))
            .await
    }

    async fn find_exit_by_chain_address(&self, chain_address: Address) -> ExitIdentity {
        self.with_query(|q| q.find_exit_by_chain_address(chain_address))
            .await
    }

    async fn find_exit_by_mesh_ip(&self, mesh_ip: Ipv6Addr) -> ExitIdentity {
        self.with_query(|q| q.find_exit_by_mesh_ip(mesh_ip)).await
    }

    async fn find_exit_by_wg_key(&self, key: WgKey) -> ExitIdentity {
        self.with_query(|q| q.find_exit_by_wg_key(key)).await
    }

    async fn is_user_admin(&self, address: Address) -> bool {
        self.with_query(|q| q.is_user_admin(address)).await
    }

    async fn is_exit_admin(&self, address: Address) -> bool {
        self.with_query(|q| q.is_exit_admin(address)).await
    }

    async fn super_admin(&self) -> Address {
        self.with_query(|q| q.super_admin()).await
    }
}
