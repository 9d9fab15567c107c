//! Log-only notifier
//!
//! Message delivery (SMS / push / email) is not wired up; notifications are
//! written to the log so operators can see what would have been sent.

use async_trait::async_trait;
use tracing::info;
use waitlist_core::port::{Notification, Notifier};
use waitlist_core::Result;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        info!(
            kind = %notification.kind,
            customer_id = %notification.customer_id,
            queue_id = %notification.queue_id,
            position = notification.position,
            "Customer notification (log only)"
        );
        Ok(())
    }
}
