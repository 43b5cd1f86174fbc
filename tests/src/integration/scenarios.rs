//! # Provisioning Scenarios
//!
//! End-to-end flows through `RegistryService` as mesh daemons drive it.
//!
//! | Scenario | Flow |
//! |----------|------|
//! | A | user-admin registers a client, then a second one sharing its mesh address |
//! | B | exit-admin registers an exit, user-admin registers a client sharing its mesh address |
//! | C | lookup on an empty registry |
//! | D | super-admin revokes a user-admin, who can no longer register clients |

#[cfg(test)]
mod tests {
    use super::super::*;
    use mesh_registry::prelude::*;
    use std::sync::Arc;

    // =========================================================================
    // SCENARIO A: duplicate client
    // =========================================================================

    #[tokio::test]
    async fn scenario_a_duplicate_client_rejected() {
        let service = RegistryService::bootstrap(
            &RegistryConfig::new(addr(SUPER_ADMIN)),
            Arc::new(RecordingSink::new()),
        )
        .await
        .unwrap();
        let u = addr(0x75);

        service.add_user_admin(addr(SUPER_ADMIN), u).await.unwrap();
        service.add_client(u, identity(1, 100, 0xAA)).await.unwrap();

        let err = service.add_client(u, identity(1, 200, 0xBB)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateUser);
        assert_eq!(service.list_clients().await, vec![identity(1, 100, 0xAA)]);
    }

    // =========================================================================
    // SCENARIO B: client colliding with an exit
    // =========================================================================

    #[tokio::test]
    async fn scenario_b_client_colliding_with_exit_rejected() {
        let service = recording_registry().await;

        service
            .add_exit(addr(EXIT_ADMIN), exit(5, 500, 0xCC))
            .await
            .unwrap();
        let err = service
            .add_client(addr(USER_ADMIN), identity(5, 501, 0xDD))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateUser);
        assert!(service.list_clients().await.is_empty());
        assert_eq!(service.list_exits().await, vec![exit(5, 500, 0xCC)]);
    }

    // =========================================================================
    // SCENARIO C: sentinel on empty registry
    // =========================================================================

    #[tokio::test]
    async fn scenario_c_empty_lookup_returns_sentinel() {
        let service = recording_registry().await;

        let found = service.find_client_by_public_key(U256::from(999u32)).await;
        assert_eq!(found, Identity::SENTINEL);
        assert!(found.is_sentinel());
        assert!(service
            .find_exit_by_chain_address(addr(0xCC))
            .await
            .is_sentinel());
    }

    // =========================================================================
    // SCENARIO D: revoked user-admin
    // =========================================================================

    #[tokio::test]
    async fn scenario_d_revoked_admin_loses_rights() {
        let service = recording_registry().await;

        service
            .remove_user_admin(addr(SUPER_ADMIN), addr(USER_ADMIN))
            .await
            .unwrap();
        let err = service
            .add_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::UnauthorizedCaller {
                caller: addr(USER_ADMIN),
                required: Role::UserAdmin,
            }
        );
        assert!(!service.is_user_admin(addr(USER_ADMIN)).await);
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn exit_lifecycle_emits_full_records() {
        let service = recording_registry().await;
        let stored = exit(5, 500, 0xCC)
            .with_regions([U256::from(840u32)])
            .with_payment_types([U256::from(1u8)]);

        service.add_exit(addr(EXIT_ADMIN), stored.clone()).await.unwrap();
        let found = service.find_exit_by_public_key(U256::from(500u32)).await;
        assert_eq!(found.allowed_regions, stored.allowed_regions);

        let removed = service
            .remove_exit(addr(EXIT_ADMIN), ExitIdentity::new(identity(5, 500, 0xCC), 0, 0))
            .await
            .unwrap();

        let RegistryEvent::ExitRemoved(record) = removed.event else {
            panic!("expected ExitRemoved, got {:?}", removed.event);
        };
        assert_eq!(record.payment_types, stored.payment_types);
        assert_eq!(record.listen_port, 59999);
        assert!(service.list_exits().await.is_empty());
    }

    #[tokio::test]
    async fn super_admin_cannot_register_clients() {
        let service = recording_registry().await;
        let err = service
            .add_client(addr(SUPER_ADMIN), identity(1, 1, 1))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn mesh_daemon_lookups_by_ip_and_key() {
        let service = recording_registry().await;
        let key: WgKey = "8BeCExnthLe5ou0EYec5jNqJ/PduZ1x2o7lpXJOpgXk=".parse().unwrap();
        let ip: std::net::Ipv6Addr = "fd00::1337:1e0f".parse().unwrap();
        let node = Identity::with_mesh_ip(ip, U256::from(key), addr(0xAA));

        let exit_key = WgKey::new([7; 32]);
        let exit_ip: std::net::Ipv6Addr = "fd00::e417".parse().unwrap();
        let gateway = ExitIdentity::new(
            Identity::with_mesh_ip(exit_ip, U256::from(exit_key), addr(0xCC)),
            4875,
            59999,
        );

        service.add_client(addr(USER_ADMIN), node).await.unwrap();
        service
            .add_exit(addr(EXIT_ADMIN), gateway.clone())
            .await
            .unwrap();

        assert_eq!(service.find_client_by_mesh_ip(ip).await, node);
        assert_eq!(service.find_client_by_wg_key(key).await, node);
        assert_eq!(node.mesh_ip(), ip);
        assert_eq!(service.find_exit_by_mesh_ip(exit_ip).await, gateway);
        assert_eq!(service.find_exit_by_wg_key(exit_key).await, gateway);

        // A client key never resolves to an exit
        assert!(service.find_exit_by_wg_key(key).await.is_sentinel());
        let (by_ip, by_key) = service
            .with_query(|q| (q.find_client_by_mesh_ip(exit_ip), q.find_client_by_wg_key(exit_key)))
            .await;
        assert!(by_ip.is_sentinel() && by_key.is_sentinel());
    }
}
