// Broadcast Event Sink - in-process fan-out of queue events

use tokio::sync::broadcast;
use tracing::{debug, trace, Level};
use waitlist_core::domain::QueueEvent;
use waitlist_core::error::Result;
use waitlist_core::port::QueueEventSink;

/// Buffered events per subscriber before it starts lagging
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Fans every published event out to all current subscribers
/// (notification dispatcher, real-time push connections).
pub struct BroadcastEventSink {
    tx: broadcast::Sender<QueueEvent>,
}

impl BroadcastEventSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl QueueEventSink for BroadcastEventSink {
    fn publish(&self, event: QueueEvent) {
        if tracing::enabled!(Level::TRACE) {
            if let Ok(payload) = to_wire(&event) {
                trace!(payload = %payload, "Publishing queue event");
            }
        }

        // Err only means nobody is listening right now
        if self.tx.send(event).is_err() {
            debug!("Queue event dropped: no subscribers");
        }
    }
}

/// JSON message pushed to real-time clients
pub fn to_wire(event: &QueueEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}
