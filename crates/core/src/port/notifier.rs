// Notifier Port - customer message delivery (SMS / push / email)

use crate::domain::{CustomerId, EntryId, Position, QueueId};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Why the customer is being contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Entry was moved to NOTIFIED: the table is ready
    TableReady,
    /// Entry moved within the queue's notification threshold
    PositionApproaching,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::TableReady => write!(f, "TABLE_READY"),
            NotificationKind::PositionApproaching => write!(f, "POSITION_APPROACHING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub queue_id: QueueId,
    pub entry_id: EntryId,
    pub customer_id: CustomerId,
    pub position: Position,
}

/// Notification delivery interface
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification
    ///
    /// # Errors
    /// - AppError::Notification if the channel rejected the message
    async fn send(&self, notification: &Notification) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    /// Records delivered notifications, optionally failing every send
    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Arc<Mutex<Vec<Notification>>>,
        fail: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn new_failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: &Notification) -> Result<()> {
            if self.fail {
                return Err(AppError::Notification("mock channel down".to_string()));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }
}
