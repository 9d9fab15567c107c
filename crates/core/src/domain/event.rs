// Queue Events - pushed to real-time subscribers after successful changes

use super::customer::CustomerId;
use super::entry::{EntryId, EntryStatus, Minutes, Position};
use super::queue::QueueId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueEvent {
    CustomerJoined {
        queue_id: QueueId,
        entry_id: EntryId,
        customer_id: CustomerId,
        position: Position,
        estimated_wait_time: Minutes,
    },
    CustomerLeft {
        queue_id: QueueId,
        entry_id: EntryId,
    },
    PositionChanged {
        queue_id: QueueId,
        entry_id: EntryId,
        old_position: Position,
        new_position: Position,
    },
    StatusChanged {
        queue_id: QueueId,
        entry_id: EntryId,
        status: EntryStatus,
    },
    QueueActivityChanged {
        queue_id: QueueId,
        is_active: bool,
    },
}

impl QueueEvent {
    pub fn queue_id(&self) -> &str {
        match self {
            QueueEvent::CustomerJoined { queue_id, .. }
            | QueueEvent::CustomerLeft { queue_id, .. }
            | QueueEvent::PositionChanged { queue_id, .. }
            | QueueEvent::StatusChanged { queue_id, .. }
            | QueueEvent::QueueActivityChanged { queue_id, .. } => queue_id,
        }
    }
}
