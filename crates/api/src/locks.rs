//! Per-worker mutation locks.
//!
//! The platform delivers a user's events in order, but two requests can
//! still be in flight at once (webhook retry, overlapping batches). Holding
//! the worker's lock across the read-modify-write of a progress row keeps
//! field writes from interleaving. Locks are keyed by platform user id and
//! created on first use; the registry is unbounded, which is fine for a
//! roster-sized key space.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-key async mutexes.
#[derive(Default)]
pub struct WorkerLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl WorkerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one worker, waiting if another task holds it.
    ///
    /// The registry lock is only held long enough to fetch or insert the
    /// per-worker mutex, never across the await on the per-worker lock.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
