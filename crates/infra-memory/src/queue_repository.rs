// In-memory QueueRepository Implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use waitlist_core::domain::{
    EntryPatch, Minutes, Position, Queue, QueueEntry, QueueId, QueuePatch,
};
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::QueueRepository;

/// Queue aggregates keyed by ID.
///
/// Values are cloned on every write and every read, so no caller ever holds
/// a handle into the stored state.
#[derive(Default)]
pub struct InMemoryQueueRepository {
    queues: RwLock<HashMap<QueueId, Queue>>,
}

impl InMemoryQueueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the stored queue under the write lock
    async fn with_queue_mut<T>(
        &self,
        queue_id: &str,
        f: impl FnOnce(&mut Queue) -> Result<T>,
    ) -> Result<T> {
        let mut queues = self.queues.write().await;
        let queue = queues
            .get_mut(queue_id)
            .ok_or_else(|| AppError::queue_not_found(queue_id))?;
        f(queue)
    }
}

#[async_trait]
impl QueueRepository for InMemoryQueueRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Queue>> {
        Ok(self.queues.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Queue>> {
        Ok(self.queues.read().await.values().cloned().collect())
    }

    async fn save(&self, queue: &Queue) -> Result<Queue> {
        let stored = queue.clone();
        self.queues
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        debug!(queue_id = %queue.id, entries = queue.entries.len(), "Queue saved");
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: QueuePatch) -> Result<Queue> {
        self.with_queue_mut(id, |queue| {
            patch.apply_to(queue);
            Ok(queue.clone())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if self.queues.write().await.remove(id).is_some() {
            debug!(queue_id = %id, "Queue deleted");
        }
        Ok(())
    }

    async fn add_entry(&self, queue_id: &str, entry: &QueueEntry) -> Result<QueueEntry> {
        self.with_queue_mut(queue_id, |queue| {
            queue.entries.push(entry.clone());
            queue.sort_entries();
            Ok(entry.clone())
        })
        .await
    }

    async fn remove_entry(&self, queue_id: &str, entry_id: &str) -> Result<()> {
        self.with_queue_mut(queue_id, |queue| {
            let index = queue
                .entry_index(entry_id)
                .ok_or_else(|| AppError::entry_not_found(queue_id, entry_id))?;
            queue.entries.remove(index);
            Ok(())
        })
        .await
    }

    async fn update_entry(
        &self,
        queue_id: &str,
        entry_id: &str,
        patch: EntryPatch,
    ) -> Result<QueueEntry> {
        self.with_queue_mut(queue_id, |queue| {
            let entry = queue
                .find_entry_mut(entry_id)
                .ok_or_else(|| AppError::entry_not_found(queue_id, entry_id))?;
            patch.apply_to(entry);
            let updated = entry.clone();

            if patch.changes_position() {
                queue.sort_entries();
            }
            Ok(updated)
        })
        .await
    }

    async fn find_entry_by_id(
        &self,
        queue_id: &str,
        entry_id: &str,
    ) -> Result<Option<QueueEntry>> {
        let queues = self.queues.read().await;
        Ok(queues
            .get(queue_id)
            .and_then(|queue| queue.find_entry(entry_id))
            .cloned())
    }

    async fn get_average_wait_time(&self, queue_id: &str) -> Result<Minutes> {
        let queues = self.queues.read().await;
        let queue = queues
            .get(queue_id)
            .ok_or_else(|| AppError::queue_not_found(queue_id))?;

        let waits: Vec<f64> = queue
            .entries
            .iter()
            .filter_map(|e| e.seated_wait_minutes())
            .collect();

        if waits.is_empty() {
            return Ok(queue.settings.default_estimated_wait_time);
        }

        let total: f64 = waits.iter().sum();
        Ok((total / waits.len() as f64).round() as Minutes)
    }

    async fn get_current_position(&self, queue_id: &str, entry_id: &str) -> Result<Position> {
        self.find_entry_by_id(queue_id, entry_id)
            .await?
            .map(|e| e.position)
            .ok_or_else(|| AppError::entry_not_found(queue_id, entry_id))
    }
}
