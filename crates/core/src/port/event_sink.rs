// Event Sink Port - real-time broadcast of queue changes

use crate::domain::QueueEvent;

/// Receives events after a service call has been persisted.
///
/// Publishing is fire-and-forget: a sink with no listeners must not fail the
/// service call that produced the event.
pub trait QueueEventSink: Send + Sync {
    fn publish(&self, event: QueueEvent);
}

/// Discards every event (default when nothing is subscribed)
pub struct NoopEventSink;

impl QueueEventSink for NoopEventSink {
    fn publish(&self, _event: QueueEvent) {}
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Keeps every published event in order
    #[derive(Default)]
    pub struct RecordingEventSink {
        events: Arc<Mutex<Vec<QueueEvent>>>,
    }

    impl RecordingEventSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<QueueEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn clear(&self) {
            self.events.lock().unwrap().clear();
        }
    }

    impl QueueEventSink for RecordingEventSink {
        fn publish(&self, event: QueueEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
