//! Concurrent access to a single queue
//!
//! Joins and removals race on a multi-threaded runtime; positions must stay
//! unique and contiguous and the size counter must match the entry count.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use waitlist_core::application::{QueueService, QueueServiceConfig};
use waitlist_core::domain::{Customer, QueueSettings};
use waitlist_core::port::event_sink::mocks::RecordingEventSink;
use waitlist_core::port::id_provider::mocks::SequentialIdProvider;
use waitlist_core::port::time_provider::mocks::MockTimeProvider;
use waitlist_core::port::QueueRepository;
use waitlist_core::AppError;
use waitlist_infra_memory::InMemoryQueueRepository;

fn setup() -> (Arc<QueueService>, Arc<InMemoryQueueRepository>) {
    let repo = Arc::new(InMemoryQueueRepository::new());
    let service = QueueService::new(
        repo.clone(),
        Arc::new(SequentialIdProvider::new("id")),
        Arc::new(MockTimeProvider::new(1_700_000_000_000)),
        Arc::new(RecordingEventSink::new()),
        QueueServiceConfig::default(),
    );
    (Arc::new(service), repo)
}

fn settings(max_party_size: u32) -> QueueSettings {
    QueueSettings {
        max_party_size,
        min_party_size: 1,
        allowed_over_capacity: 10,
        default_estimated_wait_time: 30,
        notification_threshold: 2,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_get_unique_positions() {
    let (service, repo) = setup();
    let queue = service.create_queue("Main", settings(8)).await.unwrap();

    let mut tasks = JoinSet::new();
    for i in 0..30 {
        let service = service.clone();
        let queue_id = queue.id.clone();
        tasks.spawn(async move {
            let customer = Customer::new(format!("customer-{}", i), "Guest");
            service.add_customer_to_queue(&queue_id, &customer, 2).await
        });
    }

    let mut positions = HashSet::new();
    while let Some(joined) = tasks.join_next().await {
        let entry = joined.unwrap().unwrap();
        assert!(positions.insert(entry.position), "duplicate position {}", entry.position);
    }
    assert_eq!(positions, (1..=30).collect::<HashSet<u32>>());

    let stored = repo.find_by_id(&queue.id).await.unwrap().unwrap();
    assert_eq!(stored.current_size, 30);
    assert_eq!(stored.entry_count(), 30);
    assert!(stored.has_contiguous_positions());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_never_exceed_capacity() {
    let (service, repo) = setup();
    let queue = service.create_queue("Small", settings(2)).await.unwrap();
    assert_eq!(queue.max_capacity, 20);

    let mut tasks = JoinSet::new();
    for i in 0..30 {
        let service = service.clone();
        let queue_id = queue.id.clone();
        tasks.spawn(async move {
            let customer = Customer::new(format!("customer-{}", i), "Guest");
            service.add_customer_to_queue(&queue_id, &customer, 1).await
        });
    }

    let mut accepted = 0;
    let mut rejected = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => accepted += 1,
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Queue is at maximum capacity");
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(accepted, 20);
    assert_eq!(rejected, 10);

    let stored = repo.find_by_id(&queue.id).await.unwrap().unwrap();
    assert_eq!(stored.entry_count(), 20);
    assert_eq!(stored.current_size, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_and_removals_keep_positions_contiguous() {
    let (service, repo) = setup();
    let queue = service.create_queue("Main", settings(8)).await.unwrap();

    let mut initial = Vec::new();
    for i in 0..10 {
        let customer = Customer::new(format!("seed-{}", i), "Guest");
        let entry = service
            .add_customer_to_queue(&queue.id, &customer, 2)
            .await
            .unwrap();
        initial.push(entry.id);
    }

    let mut tasks = JoinSet::new();
    for (i, entry_id) in initial.iter().step_by(2).cloned().enumerate() {
        let remover = service.clone();
        let queue_id = queue.id.clone();
        tasks.spawn(async move {
            remover
                .remove_customer_from_queue(&queue_id, &entry_id)
                .await
                .map(|_| ())
        });

        let joiner = service.clone();
        let queue_id = queue.id.clone();
        tasks.spawn(async move {
            let customer = Customer::new(format!("late-{}", i), "Guest");
            joiner
                .add_customer_to_queue(&queue_id, &customer, 3)
                .await
                .map(|_| ())
        });
    }

    while let Some(done) = tasks.join_next().await {
        done.unwrap().unwrap();
    }

    let stored = repo.find_by_id(&queue.id).await.unwrap().unwrap();
    assert_eq!(stored.entry_count(), 10);
    assert_eq!(stored.current_size, 10);
    assert!(stored.has_contiguous_positions());

    let ids: HashSet<&str> = stored.entries.iter().map(|e| e.id.as_str()).collect();
    for removed in initial.iter().step_by(2) {
        assert!(!ids.contains(removed.as_str()));
    }
    for kept in initial.iter().skip(1).step_by(2) {
        assert!(ids.contains(kept.as_str()));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_operations_on_different_queues_run_independently() {
    let (service, repo) = setup();
    let main = service.create_queue("Main", settings(8)).await.unwrap();
    let patio = service.create_queue("Patio", settings(8)).await.unwrap();

    let mut tasks = JoinSet::new();
    for i in 0..20 {
        let service = service.clone();
        let queue_id = if i % 2 == 0 { main.id.clone() } else { patio.id.clone() };
        tasks.spawn(async move {
            let customer = Customer::new(format!("customer-{}", i), "Guest");
            service.add_customer_to_queue(&queue_id, &customer, 2).await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    for queue_id in [&main.id, &patio.id] {
        let stored = repo.find_by_id(queue_id).await.unwrap().unwrap();
        assert_eq!(stored.entry_count(), 10);
        assert_eq!(stored.current_size, 10);
        assert!(stored.has_contiguous_positions());
    }
}
