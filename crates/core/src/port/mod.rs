// Port Layer - Interfaces for external dependencies

pub mod event_sink;
pub mod id_provider; // For deterministic testing
pub mod notifier;
pub mod queue_repository;
pub mod time_provider;

// Re-exports
pub use event_sink::{NoopEventSink, QueueEventSink};
pub use id_provider::IdProvider;
pub use notifier::{Notification, NotificationKind, Notifier};
pub use queue_repository::QueueRepository;
pub use time_provider::TimeProvider;
