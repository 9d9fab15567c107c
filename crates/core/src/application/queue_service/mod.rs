// Queue Service - waitlist use cases

pub mod constants;
pub mod estimate;
mod locks;

pub use estimate::estimate_wait_time;
pub use locks::{QueueLockGuard, QueueLocks};

use crate::domain::{
    BusinessHours, Customer, EntryPatch, EntryStatus, Minutes, Position, Queue,
    QueueEntry, QueueEvent, QueuePatch, QueueSettings,
};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, QueueEventSink, QueueRepository, TimeProvider};
use constants::CAPACITY_PER_MAX_PARTY_SIZE;
use estimate::{elapsed_minutes, rolling_average};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Service behaviour switches
#[derive(Debug, Clone)]
pub struct QueueServiceConfig {
    /// Reject status changes outside the entry transition table
    pub strict_transitions: bool,
    /// Hours stamped on newly created queues
    pub default_business_hours: BusinessHours,
}

impl Default for QueueServiceConfig {
    fn default() -> Self {
        Self {
            strict_transitions: false,
            default_business_hours: BusinessHours::default(),
        }
    }
}

/// Snapshot returned by `get_queue_status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub current_size: u32,
    pub average_wait_time: Minutes,
    pub is_active: bool,
}

impl From<&Queue> for QueueStatus {
    fn from(queue: &Queue) -> Self {
        Self {
            current_size: queue.current_size,
            average_wait_time: queue.average_wait_time,
            is_active: queue.is_active,
        }
    }
}

/// Snapshot returned by `get_customer_position`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPosition {
    pub position: Position,
    pub estimated_wait_time: Minutes,
}

/// Admin dashboard figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_queues: usize,
    /// WAITING or NOTIFIED entries across all queues
    pub total_customers: usize,
    /// Mean of the active queues' rolling averages (0 when none)
    pub average_wait_time: Minutes,
}

/// Queue Service
///
/// Every mutating call holds the queue's lock for its whole
/// read-compute-write sequence (see `QueueLocks`).
pub struct QueueService {
    queue_repo: Arc<dyn QueueRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    event_sink: Arc<dyn QueueEventSink>,
    config: QueueServiceConfig,
    locks: QueueLocks,
}

impl QueueService {
    pub fn new(
        queue_repo: Arc<dyn QueueRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        event_sink: Arc<dyn QueueEventSink>,
        config: QueueServiceConfig,
    ) -> Self {
        Self {
            queue_repo,
            id_provider,
            time_provider,
            event_sink,
            config,
            locks: QueueLocks::new(),
        }
    }

    /// Create an empty, active queue
    ///
    /// Capacity is `max_party_size * 10`; the rolling average starts at the
    /// configured default wait.
    pub async fn create_queue(
        &self,
        name: impl Into<String>,
        settings: QueueSettings,
    ) -> Result<Queue> {
        let name = name.into();
        settings.validate()?;
        self.config.default_business_hours.validate()?;

        let queue = Queue {
            id: self.id_provider.generate_id(),
            name,
            max_capacity: settings
                .max_party_size
                .saturating_mul(CAPACITY_PER_MAX_PARTY_SIZE),
            current_size: 0,
            entries: Vec::new(),
            average_wait_time: settings.default_estimated_wait_time,
            is_active: true,
            business_hours: self.config.default_business_hours.clone(),
            settings,
        };

        let queue = self.queue_repo.save(&queue).await?;

        info!(
            queue_id = %queue.id,
            name = %queue.name,
            max_capacity = queue.max_capacity,
            "Queue created"
        );

        Ok(queue)
    }

    /// Add a party to the tail of the queue
    ///
    /// # Errors
    /// - AppError::NotFound if the queue does not exist
    /// - AppError::Validation if the queue is inactive, the party size is out
    ///   of bounds, or the queue is full
    pub async fn add_customer_to_queue(
        &self,
        queue_id: &str,
        customer: &Customer,
        party_size: u32,
    ) -> Result<QueueEntry> {
        let _guard = self.locks.acquire(queue_id).await;
        let queue = self.load_queue(queue_id).await?;

        if !queue.is_active {
            warn!(queue_id = %queue_id, "Join rejected: queue inactive");
            return Err(AppError::Validation(
                "Queue is not currently active".to_string(),
            ));
        }

        if !queue.settings.accepts_party_size(party_size) {
            warn!(queue_id = %queue_id, party_size, "Join rejected: party size");
            return Err(AppError::Validation(format!(
                "Party size must be between {} and {}",
                queue.settings.min_party_size, queue.settings.max_party_size
            )));
        }

        // Capacity counts entries, not the current_size counter
        if queue.entry_count() >= queue.max_capacity as usize {
            warn!(queue_id = %queue_id, max_capacity = queue.max_capacity, "Join rejected: full");
            return Err(AppError::Validation(
                "Queue is at maximum capacity".to_string(),
            ));
        }

        let historical_average = self.queue_repo.get_average_wait_time(&queue.id).await?;
        let estimated_wait_time =
            estimate_wait_time(historical_average, party_size, queue.current_size);
        let position = queue.entry_count() as Position + 1;

        let entry = QueueEntry::new(
            self.id_provider.generate_id(),
            customer.id.clone(),
            queue.id.clone(),
            party_size,
            estimated_wait_time,
            self.time_provider.now_millis(),
            position,
        );

        // No rollback: a failing add_entry leaves the counter incremented
        self.queue_repo
            .update(
                &queue.id,
                QueuePatch::current_size(queue.current_size.saturating_add(1)),
            )
            .await?;
        let entry = self.queue_repo.add_entry(&queue.id, &entry).await?;

        info!(
            queue_id = %queue.id,
            entry_id = %entry.id,
            customer_id = %entry.customer_id,
            position = entry.position,
            estimated_wait_time = entry.estimated_wait_time,
            "Customer joined queue"
        );

        self.event_sink.publish(QueueEvent::CustomerJoined {
            queue_id: queue.id,
            entry_id: entry.id.clone(),
            customer_id: entry.customer_id.clone(),
            position: entry.position,
            estimated_wait_time: entry.estimated_wait_time,
        });

        Ok(entry)
    }

    /// Remove an entry and close the gap it leaves
    ///
    /// Remaining entries keep their relative order and are renumbered 1..N.
    pub async fn remove_customer_from_queue(&self, queue_id: &str, entry_id: &str) -> Result<()> {
        let _guard = self.locks.acquire(queue_id).await;
        let queue = self.load_queue(queue_id).await?;
        self.load_entry(queue_id, entry_id).await?;

        self.queue_repo
            .update(
                queue_id,
                QueuePatch::current_size(queue.current_size.saturating_sub(1)),
            )
            .await?;
        self.queue_repo.remove_entry(queue_id, entry_id).await?;

        let mut events = vec![QueueEvent::CustomerLeft {
            queue_id: queue_id.to_string(),
            entry_id: entry_id.to_string(),
        }];

        if let Some(remaining) = self.queue_repo.find_by_id(queue_id).await? {
            for (index, entry) in remaining.entries.iter().enumerate() {
                let expected = index as Position + 1;
                if entry.position == expected {
                    continue;
                }
                self.queue_repo
                    .update_entry(queue_id, &entry.id, EntryPatch::position(expected))
                    .await?;
                events.push(QueueEvent::PositionChanged {
                    queue_id: queue_id.to_string(),
                    entry_id: entry.id.clone(),
                    old_position: entry.position,
                    new_position: expected,
                });
            }
        }

        info!(
            queue_id = %queue_id,
            entry_id = %entry_id,
            renumbered = events.len() - 1,
            "Customer removed from queue"
        );

        for event in events {
            self.event_sink.publish(event);
        }

        Ok(())
    }

    /// Apply a status to an entry
    ///
    /// NOTIFIED stamps `notified_at`. SEATED stamps `seated_at` and folds the
    /// actual wait into the queue's rolling average.
    ///
    /// # Errors
    /// - AppError::NotFound if the entry does not exist
    /// - AppError::Domain if strict transitions are enabled and the change is
    ///   not allowed
    pub async fn update_entry_status(
        &self,
        queue_id: &str,
        entry_id: &str,
        status: EntryStatus,
    ) -> Result<QueueEntry> {
        let _guard = self.locks.acquire(queue_id).await;
        let entry = self.load_entry(queue_id, entry_id).await?;

        if self.config.strict_transitions {
            entry.status.ensure_transition(status)?;
        }

        let now = self.time_provider.now_millis();
        let mut patch = EntryPatch::status(status);

        match status {
            EntryStatus::Notified => patch.notified_at = Some(now),
            EntryStatus::Seated => {
                patch.seated_at = Some(now);
                let actual_wait_time = elapsed_minutes(entry.joined_at, now);

                if let Some(queue) = self.queue_repo.find_by_id(queue_id).await? {
                    let new_average = rolling_average(queue.average_wait_time, actual_wait_time);
                    self.queue_repo
                        .update(queue_id, QueuePatch::average_wait_time(new_average))
                        .await?;
                    debug!(
                        queue_id = %queue_id,
                        actual_wait_time,
                        old_average = queue.average_wait_time,
                        new_average,
                        "Rolling average updated"
                    );
                }
            }
            _ => {}
        }

        let updated = self.queue_repo.update_entry(queue_id, entry_id, patch).await?;

        info!(
            queue_id = %queue_id,
            entry_id = %entry_id,
            from = %entry.status,
            to = %status,
            "Entry status updated"
        );

        self.event_sink.publish(QueueEvent::StatusChanged {
            queue_id: queue_id.to_string(),
            entry_id: entry_id.to_string(),
            status,
        });

        Ok(updated)
    }

    pub async fn get_queue_status(&self, queue_id: &str) -> Result<QueueStatus> {
        let queue = self.load_queue(queue_id).await?;
        Ok(QueueStatus::from(&queue))
    }

    pub async fn get_customer_position(
        &self,
        queue_id: &str,
        entry_id: &str,
    ) -> Result<CustomerPosition> {
        let entry = self.load_entry(queue_id, entry_id).await?;
        Ok(CustomerPosition {
            position: entry.position,
            estimated_wait_time: entry.estimated_wait_time,
        })
    }

    /// Open or close a queue for new joins
    pub async fn set_queue_active(&self, queue_id: &str, is_active: bool) -> Result<QueueStatus> {
        let _guard = self.locks.acquire(queue_id).await;
        self.load_queue(queue_id).await?;

        let queue = self
            .queue_repo
            .update(queue_id, QueuePatch::is_active(is_active))
            .await?;

        info!(queue_id = %queue_id, is_active, "Queue activity changed");

        self.event_sink.publish(QueueEvent::QueueActivityChanged {
            queue_id: queue_id.to_string(),
            is_active,
        });

        Ok(QueueStatus::from(&queue))
    }

    pub async fn list_queues(&self) -> Result<Vec<Queue>> {
        self.queue_repo.find_all().await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let queues = self.queue_repo.find_all().await?;

        let active: Vec<&Queue> = queues.iter().filter(|q| q.is_active).collect();
        let total_customers = queues
            .iter()
            .flat_map(|q| q.entries.iter())
            .filter(|e| e.status.is_active())
            .count();
        let average_wait_time = if active.is_empty() {
            0
        } else {
            let sum: Minutes = active.iter().map(|q| q.average_wait_time).sum();
            (sum as f64 / active.len() as f64).round() as Minutes
        };

        Ok(DashboardStats {
            active_queues: active.len(),
            total_customers,
            average_wait_time,
        })
    }

    async fn load_queue(&self, queue_id: &str) -> Result<Queue> {
        self.queue_repo
            .find_by_id(queue_id)
            .await?
            .ok_or_else(|| AppError::queue_not_found(queue_id))
    }

    async fn load_entry(&self, queue_id: &str, entry_id: &str) -> Result<QueueEntry> {
        self.queue_repo
            .find_entry_by_id(queue_id, entry_id)
            .await?
            .ok_or_else(|| AppError::entry_not_found(queue_id, entry_id))
    }
}
