// Domain Layer - Pure business logic and entities

pub mod customer;
pub mod entry;
pub mod error;
pub mod event;
pub mod queue;

// Re-exports
pub use customer::{Customer, CustomerId};
pub use entry::{EntryId, EntryPatch, EntryStatus, Minutes, Position, QueueEntry};
pub use error::DomainError;
pub use event::QueueEvent;
pub use queue::{BusinessHours, Queue, QueueId, QueuePatch, QueueSettings};
