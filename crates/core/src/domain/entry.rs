// Queue Entry Domain Model

use super::customer::CustomerId;
use super::error::{DomainError, Result};
use super::queue::QueueId;
use serde::{Deserialize, Serialize};

/// Entry ID (UUID v4)
pub type EntryId = String;

/// 1-based rank inside a queue
pub type Position = u32;

/// Wait durations are expressed in whole minutes
pub type Minutes = i64;

pub const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Entry lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Waiting,
    Notified,
    Seated,
    NoShow,
    Cancelled,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Waiting => write!(f, "WAITING"),
            EntryStatus::Notified => write!(f, "NOTIFIED"),
            EntryStatus::Seated => write!(f, "SEATED"),
            EntryStatus::NoShow => write!(f, "NO_SHOW"),
            EntryStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl EntryStatus {
    /// Seated, no-show and cancelled entries never move again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EntryStatus::Seated | EntryStatus::NoShow | EntryStatus::Cancelled
        )
    }

    /// Entries still holding a claim on the queue
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Transition table used when strict transitions are enabled.
    ///
    /// Re-applying the current status is always allowed.
    pub fn can_transition_to(&self, next: EntryStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            EntryStatus::Waiting => true,
            EntryStatus::Notified => next != EntryStatus::Waiting,
            EntryStatus::Seated | EntryStatus::NoShow | EntryStatus::Cancelled => false,
        }
    }

    pub fn ensure_transition(&self, next: EntryStatus) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

/// One customer's claim on a queue slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub customer_id: CustomerId,
    pub queue_id: QueueId,
    pub party_size: u32,
    pub status: EntryStatus,
    pub estimated_wait_time: Minutes,

    pub joined_at: i64, // epoch ms
    pub notified_at: Option<i64>,
    pub seated_at: Option<i64>,

    pub position: Position,
}

impl QueueEntry {
    /// Create a WAITING entry
    ///
    /// ID and join time are injected by the caller (IdProvider / TimeProvider).
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        queue_id: impl Into<String>,
        party_size: u32,
        estimated_wait_time: Minutes,
        joined_at: i64,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            queue_id: queue_id.into(),
            party_size,
            status: EntryStatus::Waiting,
            estimated_wait_time,
            joined_at,
            notified_at: None,
            seated_at: None,
            position,
        }
    }

    /// Elapsed minutes between joining and being seated (unrounded)
    pub fn seated_wait_minutes(&self) -> Option<f64> {
        self.seated_at
            .map(|seated_at| (seated_at - self.joined_at) as f64 / MILLIS_PER_MINUTE)
    }
}

/// Partial update of a queue entry. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub status: Option<EntryStatus>,
    pub estimated_wait_time: Option<Minutes>,
    pub notified_at: Option<i64>,
    pub seated_at: Option<i64>,
    pub position: Option<Position>,
}

impl EntryPatch {
    pub fn status(status: EntryStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// True when applying this patch can break the position ordering
    pub fn changes_position(&self) -> bool {
        self.position.is_some()
    }

    pub fn apply_to(&self, entry: &mut QueueEntry) {
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(estimated) = self.estimated_wait_time {
            entry.estimated_wait_time = estimated;
        }
        if let Some(notified_at) = self.notified_at {
            entry.notified_at = Some(notified_at);
        }
        if let Some(seated_at) = self.seated_at {
            entry.seated_at = Some(seated_at);
        }
        if let Some(position) = self.position {
            entry.position = position;
        }
    }
}
