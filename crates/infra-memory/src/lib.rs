// Waitlist Infrastructure - In-Memory Adapters
// Implements: QueueRepository, QueueEventSink

mod broadcast_sink;
mod queue_repository;

pub use broadcast_sink::{to_wire, BroadcastEventSink, DEFAULT_EVENT_CAPACITY};
pub use queue_repository::InMemoryQueueRepository;
