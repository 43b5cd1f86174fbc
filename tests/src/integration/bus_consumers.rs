//! # Bus Consumers
//!
//! The registry publishing through `EventBusSink` to the in-memory bus, as an
//! indexer or mesh daemon would consume it.

#[cfg(test)]
mod tests {
    use super::super::*;
    use mesh_registry::prelude::*;
    use registry_bus::{EventFilter, EventPublisher, EventTopic, InMemoryEventBus};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    type BusRegistry = RegistryService<EventBusSink<InMemoryEventBus>>;

    async fn bus_registry(capacity: usize) -> (Arc<InMemoryEventBus>, BusRegistry) {
        let bus = Arc::new(InMemoryEventBus::with_capacity(capacity));
        let service = RegistryService::bootstrap(&genesis(), EventBusSink::new(Arc::clone(&bus)))
            .await
            .unwrap();
        (bus, service)
    }

    #[tokio::test]
    async fn subscribers_see_commit_order_with_full_records() {
        let (bus, service) = bus_registry(64).await;
        let mut all = bus.subscribe(EventFilter::all());

        service
            .add_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap();
        service
            .add_exit(addr(EXIT_ADMIN), exit(5, 500, 0xCC).with_regions([U256::from(840u32)]))
            .await
            .unwrap();
        service
            .remove_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap();

        let mut received = Vec::new();
        for _ in 0..3 {
            let notification = timeout(Duration::from_millis(100), all.recv())
                .await
                .expect("timeout")
                .expect("notification");
            received.push(notification);
        }

        assert_eq!(
            received.iter().map(|n| n.sequence).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );
        let RegistryEvent::ExitRegistered(ref registered) = received[1].event else {
            panic!("expected ExitRegistered, got {:?}", received[1].event);
        };
        assert_eq!(registered.allowed_regions, vec![U256::from(840u32)]);
        assert_eq!(received, service.notifications_since(2).await);
        // Genesis grants went out before anyone subscribed
        assert_eq!(bus.events_published(), 5);
    }

    #[tokio::test]
    async fn topic_filter_skips_other_collections() {
        let (bus, service) = bus_registry(64).await;
        let mut exits_only = bus.subscribe(EventFilter::topics(vec![EventTopic::Exits]));

        service
            .add_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap();
        service
            .add_exit_admin(addr(SUPER_ADMIN), addr(0x33))
            .await
            .unwrap();
        service
            .add_exit(addr(0x33), exit(5, 500, 0xCC))
            .await
            .unwrap();

        let notification = timeout(Duration::from_millis(100), exits_only.recv())
            .await
            .expect("timeout")
            .expect("notification");

        assert_eq!(notification.sequence, 5);
        assert_eq!(notification.caller, addr(0x33));
        assert!(matches!(exits_only.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn caller_filter_follows_one_admin() {
        let (bus, service) = bus_registry(64).await;
        let mut super_only = bus.subscribe(EventFilter::from_callers(vec![addr(SUPER_ADMIN)]));

        service
            .add_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap();
        service
            .remove_exit_admin(addr(SUPER_ADMIN), addr(EXIT_ADMIN))
            .await
            .unwrap();

        let notification = timeout(Duration::from_millis(100), super_only.recv())
            .await
            .expect("timeout")
            .expect("notification");

        assert_eq!(notification.event, RegistryEvent::ExitAdminRemoved(addr(EXIT_ADMIN)));
        assert_eq!(notification.event.admin(), Some((addr(EXIT_ADMIN), Role::ExitAdmin)));
    }

    #[tokio::test]
    async fn rejected_transactions_publish_nothing() {
        let (bus, service) = bus_registry(64).await;
        let mut all = bus.subscribe(EventFilter::all());

        service
            .add_client(addr(EXIT_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap_err();
        service
            .add_client(addr(USER_ADMIN), Identity::SENTINEL)
            .await
            .unwrap_err();

        assert!(matches!(all.try_recv(), Ok(None)));
        assert_eq!(bus.events_published(), 2);
    }

    #[tokio::test]
    async fn event_stream_consumer() {
        let (bus, service) = bus_registry(64).await;
        let stream = bus.event_stream(EventFilter::topics(vec![EventTopic::Clients]));

        for n in 1..=3u64 {
            service
                .add_client(addr(USER_ADMIN), identity(u128::from(n), n, 0xA0 + n))
                .await
                .unwrap();
        }

        let keys: Vec<U256> = timeout(
            Duration::from_millis(200),
            stream
                .take(3)
                .filter_map(|n| n.event.identity().map(|id| id.public_key))
                .collect::<Vec<_>>(),
        )
        .await
        .expect("timeout");

        assert_eq!(keys, vec![U256::from(1u8), U256::from(2u8), U256::from(3u8)]);
    }

    #[tokio::test]
    async fn lagging_consumer_recovers_from_log() {
        let (bus, service) = bus_registry(2).await;
        let mut slow = bus.subscribe(EventFilter::all());

        for n in 1..=4u64 {
            service
                .add_client(addr(USER_ADMIN), identity(u128::from(n), n, 0xA0 + n))
                .await
                .unwrap();
        }

        // Sequences 3 and 4 were overwritten before the first read
        let first = slow.try_recv().unwrap().unwrap();
        assert_eq!(first.sequence, 5);
        assert_eq!(slow.lagged(), 2);

        let missed = service.notifications_since(2).await;
        assert_eq!(
            missed.iter().map(|n| n.sequence).collect::<Vec<_>>(),
            vec![3, 4, 5, 6]
        );
        assert_eq!(missed[2], first);
    }

    #[tokio::test]
    async fn dropping_registry_closes_subscriptions() {
        let (bus, service) = bus_registry(64).await;
        let mut all = bus.subscribe(EventFilter::all());
        drop(bus);

        service
            .add_client(addr(USER_ADMIN), identity(1, 100, 0xAA))
            .await
            .unwrap();
        drop(service);

        assert_eq!(all.recv().await.map(|n| n.sequence), Some(3));
        assert!(all.recv().await.is_none());
    }
}
