use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-coordinate single-flight locks
///
/// Concurrent scans of the same coordinate queue behind one async mutex.
/// An entry is removed when its last holder releases it.
#[derive(Debug, Default)]
pub struct CoordinateLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Held for the duration of one coordinate's fetch-and-persist
pub struct CoordinateGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl CoordinateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> CoordinateGuard<'_> {
        // The map entry must be released before awaiting the mutex.
        let mutex = Arc::clone(&self.locks.entry(key.to_string()).or_default());
        let guard = mutex.lock_owned().await;
        CoordinateGuard {
            locks: &self.locks,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of coordinates currently locked or waited on
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for CoordinateGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
