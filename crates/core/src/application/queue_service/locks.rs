// Per-queue mutual exclusion for multi-step service operations

use std::collections::HashMap;
use std::sync::{Arc, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<Mutex<()>>>;

/// One async mutex per queue ID.
///
/// Held for the whole read-compute-write sequence of a service call, so two
/// calls against the same queue never interleave. Different queues do not
/// contend.
///
/// A queue's mutex only lives in the map while some caller holds or waits for
/// it; the last guard to drop removes the entry.
#[derive(Default)]
pub struct QueueLocks {
    // Never held across an await
    locks: std::sync::Mutex<LockMap>,
}

impl QueueLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, queue_id: &str) -> QueueLockGuard<'_> {
        // Built before waiting so a cancelled acquire still cleans up
        let mut held = QueueLockGuard {
            locks: self,
            queue_id: queue_id.to_string(),
            guard: None,
        };

        let lock = self
            .map()
            .entry(queue_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        held.guard = Some(lock.lock_owned().await);
        held
    }

    fn release(&self, queue_id: &str) {
        let mut locks = self.map();
        if locks
            .get(queue_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(queue_id);
        }
    }

    fn map(&self) -> MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.map().len()
    }
}

/// Exclusive access to one queue until dropped
pub struct QueueLockGuard<'a> {
    locks: &'a QueueLocks,
    queue_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for QueueLockGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own reference no longer counts
        self.guard.take();
        self.locks.release(&self.queue_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_queue_is_exclusive() {
        let locks = Arc::new(QueueLocks::new());
        let guard = locks.acquire("q-1").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("q-1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        assert_eq!(locks.tracked(), 1);

        drop(guard);
        contender.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_different_queues_do_not_block() {
        let locks = QueueLocks::new();
        let _a = locks.acquire("q-1").await;
        let acquired =
            tokio::time::timeout(Duration::from_millis(100), locks.acquire("q-2")).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_released_locks_are_forgotten() {
        let locks = QueueLocks::new();
        for i in 0..1000 {
            let _guard = locks.acquire(&format!("unknown-{}", i)).await;
        }
        assert_eq!(locks.tracked(), 0);

        let held = locks.acquire("q-1").await;
        assert_eq!(locks.tracked(), 1);
        drop(held);
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_acquire_is_forgotten() {
        let locks = QueueLocks::new();
        let held = locks.acquire("q-1").await;

        let waited = tokio::time::timeout(Duration::from_millis(20), locks.acquire("q-1")).await;
        assert!(waited.is_err());
        assert_eq!(locks.tracked(), 1);

        drop(held);
        assert_eq!(locks.tracked(), 0);
    }
}
