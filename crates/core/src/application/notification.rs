//! Notification Dispatcher - turns queue events into customer notifications
//!
//! - STATUS_CHANGED to NOTIFIED: table ready
//! - POSITION_CHANGED into the queue's notification threshold while still
//!   WAITING: position approaching

use crate::application::shutdown::ShutdownToken;
use crate::domain::{EntryStatus, QueueEntry, QueueEvent};
use crate::error::Result;
use crate::port::{Notification, NotificationKind, Notifier, QueueRepository};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

pub struct NotificationDispatcher {
    queue_repo: Arc<dyn QueueRepository>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(queue_repo: Arc<dyn QueueRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            queue_repo,
            notifier,
        }
    }

    /// Handle one event, returning the notification that was sent (if any)
    pub async fn handle(&self, event: &QueueEvent) -> Result<Option<Notification>> {
        let notification = match event {
            QueueEvent::StatusChanged {
                queue_id,
                entry_id,
                status: EntryStatus::Notified,
            } => self
                .queue_repo
                .find_entry_by_id(queue_id, entry_id)
                .await?
                .map(|e| notification_for(&e, NotificationKind::TableReady)),
            QueueEvent::PositionChanged {
                queue_id,
                entry_id,
                old_position,
                new_position,
            } => {
                let Some(queue) = self.queue_repo.find_by_id(queue_id).await? else {
                    return Ok(None);
                };
                let threshold = queue.settings.notification_threshold;
                // Only the move across the threshold triggers
                if *new_position > threshold || *old_position <= threshold {
                    None
                } else {
                    queue
                        .find_entry(entry_id)
                        .filter(|e| e.status == EntryStatus::Waiting)
                        .map(|e| notification_for(e, NotificationKind::PositionApproaching))
                }
            }
            _ => None,
        };

        if let Some(notification) = &notification {
            self.notifier.send(notification).await?;
            info!(
                kind = %notification.kind,
                queue_id = %notification.queue_id,
                entry_id = %notification.entry_id,
                position = notification.position,
                "Notification sent"
            );
        }

        Ok(notification)
    }

    /// Consume events until shutdown or until the channel closes
    pub async fn run(&self, mut events: broadcast::Receiver<QueueEvent>, mut shutdown: ShutdownToken) {
        info!("Notification dispatcher started");

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                received = events.recv() => match received {
                    Ok(event) => {
                        if let Err(e) = self.handle(&event).await {
                            warn!(error = ?e, queue_id = %event.queue_id(), "Notification failed");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Notification dispatcher lagged behind event stream");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Event stream closed");
                        break;
                    }
                },
            }
        }

        info!("Notification dispatcher stopped");
    }
}

fn notification_for(entry: &QueueEntry, kind: NotificationKind) -> Notification {
    Notification {
        kind,
        queue_id: entry.queue_id.clone(),
        entry_id: entry.id.clone(),
        customer_id: entry.customer_id.clone(),
        position: entry.position,
    }
}
