// Queue Repository Port (Interface)

use crate::domain::{EntryPatch, Minutes, Position, Queue, QueueEntry, QueuePatch};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Queue aggregates and their entries
///
/// Implementations must never hand out references into their internal
/// state: every returned value is an independent copy, and every stored value
/// is copied on the way in.
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Find queue by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Queue>>;

    /// All stored queues (order unspecified)
    async fn find_all(&self) -> Result<Vec<Queue>>;

    /// Store a copy of the aggregate (entries included) and return the stored copy
    async fn save(&self, queue: &Queue) -> Result<Queue>;

    /// Merge the set fields into the stored aggregate
    ///
    /// # Errors
    /// - AppError::NotFound if the queue does not exist
    async fn update(&self, id: &str, patch: QueuePatch) -> Result<Queue>;

    /// Remove the aggregate (no error if absent)
    async fn delete(&self, id: &str) -> Result<()>;

    /// Append an entry, then re-sort entries by position
    async fn add_entry(&self, queue_id: &str, entry: &QueueEntry) -> Result<QueueEntry>;

    /// Remove an entry
    ///
    /// # Errors
    /// - AppError::NotFound if the queue or the entry does not exist
    async fn remove_entry(&self, queue_id: &str, entry_id: &str) -> Result<()>;

    /// Merge the set fields into an entry (re-sorts when the position changes)
    async fn update_entry(
        &self,
        queue_id: &str,
        entry_id: &str,
        patch: EntryPatch,
    ) -> Result<QueueEntry>;

    /// Find entry by ID (None when the queue or entry is absent)
    async fn find_entry_by_id(&self, queue_id: &str, entry_id: &str)
        -> Result<Option<QueueEntry>>;

    /// Historical average wait (minutes) over seated entries
    ///
    /// Falls back to the queue's default estimated wait time when nobody has
    /// been seated yet.
    async fn get_average_wait_time(&self, queue_id: &str) -> Result<Minutes>;

    /// Current position of an entry
    async fn get_current_position(&self, queue_id: &str, entry_id: &str) -> Result<Position>;
}
