use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type LockMap = DashMap<Uuid, Arc<Mutex<()>>>;

/// Per-attempt mutexes serializing answer submission and completion.
///
/// An entry lives only while some caller holds or waits on it.
#[derive(Clone, Debug, Default)]
pub struct AttemptLocks {
    locks: Arc<LockMap>,
}

impl AttemptLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, attempt_id: Uuid) -> AttemptGuard {
        let lock = self
            .locks
            .entry(attempt_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        AttemptGuard {
            attempt_id,
            locks: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Holds an attempt's lock; removes the map entry on drop once no one else needs it.
#[derive(Debug)]
pub struct AttemptGuard {
    attempt_id: Uuid,
    locks: Arc<LockMap>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Only the map's own reference left: nobody holds or waits on this mutex.
        self.locks
            .remove_if(&self.attempt_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
