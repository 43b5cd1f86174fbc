//! # Registry Properties
//!
//! Seeded random sweeps over the transaction space. Pools are kept small so
//! attribute collisions, repeated grants and removals of absent records are
//! frequent.
//!
//! Checked after every transaction:
//! - every invariant in `check_all_invariants` holds
//! - a rejection leaves the snapshot unchanged and emits nothing
//! - a commit takes exactly the next sequence number

#[cfg(test)]
mod tests {
    use super::super::*;
    use mesh_registry::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    const SEEDS: [u64; 4] = [1, 7, 42, 0xC0FFEE];
    const STEPS: usize = 300;

    /// Callers that may or may not hold a role as the sweep progresses.
    const CALLERS: [u64; 5] = [SUPER_ADMIN, USER_ADMIN, EXIT_ADMIN, 0x33, 0x44];

    fn random_identity(rng: &mut StdRng) -> Identity {
        // Occasionally the all-zero identity
        if rng.gen_ratio(1, 40) {
            return Identity::SENTINEL;
        }
        identity(
            rng.gen_range(1..=6),
            rng.gen_range(1..=6),
            rng.gen_range(0xA0..=0xA5),
        )
    }

    fn random_call(rng: &mut StdRng) -> RegistryCall {
        let address = addr(*CALLERS.choose(rng).unwrap_or(&0x33));
        match rng.gen_range(0..8) {
            0 => RegistryCall::AddClient {
                identity: random_identity(rng),
            },
            1 => RegistryCall::RemoveClient {
                identity: random_identity(rng),
            },
            2 => RegistryCall::AddExit {
                exit: ExitIdentity::new(random_identity(rng), 4875, rng.gen()),
            },
            3 => RegistryCall::RemoveExit {
                exit: ExitIdentity::new(random_identity(rng), 0, 0),
            },
            4 => RegistryCall::AddUserAdmin { address },
            5 => RegistryCall::RemoveUserAdmin { address },
            6 => RegistryCall::AddExitAdmin { address },
            _ => RegistryCall::RemoveExitAdmin { address },
        }
    }

    fn random_transaction(rng: &mut StdRng) -> RegistryTransaction {
        let caller = addr(*CALLERS.choose(rng).unwrap_or(&SUPER_ADMIN));
        RegistryTransaction::new(caller, random_call(rng))
    }

    #[tokio::test]
    async fn random_sweeps_preserve_invariants() {
        for seed in SEEDS {
            let mut rng = StdRng::seed_from_u64(seed);
            let service = recording_registry().await;
            let mut committed = 0usize;

            for step in 0..STEPS {
                let before = service.snapshot().await;
                let transaction = random_transaction(&mut rng);

                match service.submit(transaction.clone()).await {
                    Ok(notification) => {
                        committed += 1;
                        assert_eq!(
                            notification.sequence,
                            before.last_sequence + 1,
                            "seed {seed} step {step}: {transaction:?}"
                        );
                    }
                    Err(e) => {
                        assert_eq!(
                            service.snapshot().await,
                            before,
                            "seed {seed} step {step}: rejected {e} changed state"
                        );
                    }
                }

                let check = service.check_invariants().await;
                assert!(
                    check.is_valid(),
                    "seed {seed} step {step}: {:?}",
                    check.violations()
                );
            }

            // Two genesis grants precede the sweep
            assert_eq!(service.last_sequence().await, committed as u64 + 2);
            assert_eq!(service.sink().len(), committed + 2);
            assert!(committed > 0, "seed {seed} committed nothing");
        }
    }

    #[tokio::test]
    async fn non_admins_are_always_rejected() {
        let mut rng = StdRng::seed_from_u64(99);
        let service = recording_registry().await;
        let before = service.snapshot().await;
        let outsider = addr(0xDEAD);

        for _ in 0..200 {
            let err = service
                .execute(outsider, random_call(&mut rng))
                .await
                .unwrap_err();
            assert!(err.is_unauthorized(), "unexpected {err}");
        }

        assert_eq!(service.snapshot().await, before);
        assert_eq!(service.stats().await.rejected, 200);
    }

    #[tokio::test]
    async fn removed_identity_can_register_again() {
        let service = recording_registry().await;
        let client = identity(1, 100, 0xAA);

        service.add_client(addr(USER_ADMIN), client).await.unwrap();
        service.remove_client(addr(USER_ADMIN), client).await.unwrap();
        assert!(service.find_client_by_mesh_address(U128::from(1u8)).await.is_sentinel());

        // Freed attributes are free for exits too
        service
            .add_exit(addr(EXIT_ADMIN), exit(1, 100, 0xAA))
            .await
            .unwrap();
        service
            .remove_exit(addr(EXIT_ADMIN), exit(1, 100, 0xAA))
            .await
            .unwrap();
        service.add_client(addr(USER_ADMIN), client).await.unwrap();

        assert_eq!(service.list_clients().await, vec![client]);
        assert!(service.check_invariants().await.is_valid());
    }

    #[tokio::test]
    async fn removing_unknown_client_is_not_found() {
        let service = recording_registry().await;
        service
            .add_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap();

        // Shares every attribute but one with the stored client
        let near_miss = identity(1, 100, 0xAB);
        let err = service
            .remove_client(addr(USER_ADMIN), near_miss)
            .await
            .unwrap_err();

        assert_eq!(err, RegistryError::IdentityNotFound(near_miss));
        assert_eq!(service.list_clients().await.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_restore_preserves_digest() {
        let mut rng = StdRng::seed_from_u64(2024);
        let service = recording_registry().await;
        let batch: Vec<_> = (0..100).map(|_| random_transaction(&mut rng)).collect();
        service.apply_batch(batch).await;

        let snapshot = service.snapshot().await;
        let bytes = snapshot.to_bytes().unwrap();
        let decoded = RegistrySnapshot::from_bytes(&bytes).unwrap();
        let restored = RegistryService::from_snapshot(&decoded, RecordingSink::new()).unwrap();

        let again = restored.snapshot().await;
        assert_eq!(again, snapshot);
        assert_eq!(again.digest().unwrap(), snapshot.digest().unwrap());
        assert_eq!(restored.list_clients().await, service.list_clients().await);
        assert_eq!(restored.list_exits().await, service.list_exits().await);
    }

    #[tokio::test]
    async fn inconsistent_snapshot_is_rejected() {
        let service = recording_registry().await;
        service
            .add_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap();

        let mut snapshot = service.snapshot().await;
        // Exit reusing the client's public key
        snapshot.exits.push(exit(9, 100, 0xEE));

        let result = RegistryService::from_snapshot(&snapshot, RecordingSink::new());
        assert!(matches!(result, Err(SnapshotError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn identical_histories_share_a_digest() {
        let transactions: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(5);
            (0..150).map(|_| random_transaction(&mut rng)).collect()
        };

        let left = recording_registry().await;
        let right = recording_registry().await;
        let left_receipts = left.apply_batch(transactions.clone()).await;
        let right_receipts = right.apply_batch(transactions).await;

        assert_eq!(left_receipts, right_receipts);
        assert_eq!(
            left.snapshot().await.digest_hex().unwrap(),
            right.snapshot().await.digest_hex().unwrap()
        );
    }
}
