//! Per-key operation guards.
//!
//! Two concurrent format-and-mount calls on the same device can race
//! (format, mount, format again). [`DiskManager`](crate::DiskManager) does
//! not lock; callers that may run volume operations concurrently hold a
//! [`VolumeGuard`] for the duration of each mutating operation.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use blockvol_common::error::{BlockvolError, Result};

/// Set of keys (volume IDs, devices, or target paths) currently in use.
#[derive(Debug, Default)]
pub struct VolumeLocks {
    held: Mutex<HashSet<String>>,
}

impl VolumeLocks {
    /// Creates an empty lock set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key` without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvolError::OperationInProgress`] if `key` is already held.
    pub fn try_acquire(&self, key: impl Into<String>) -> Result<VolumeGuard<'_>> {
        let key = key.into();
        if !self.held().insert(key.clone()) {
            tracing::debug!(key = %key, "operation already in progress");
            return Err(BlockvolError::OperationInProgress { key });
        }
        Ok(VolumeGuard { locks: self, key })
    }

    /// Returns `true` if `key` is currently held.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        self.held().contains(key)
    }

    // A panic while holding the set cannot leave it half-updated.
    fn held(&self) -> MutexGuard<'_, HashSet<String>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct VolumeGuard<'a> {
    locks: &'a VolumeLocks,
    key: String,
}

impl VolumeGuard<'_> {
    /// The key this guard holds.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for VolumeGuard<'_> {
    fn drop(&mut self) {
        let _ = self.locks.held().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_of_same_key_fails() {
        let locks = VolumeLocks::new();
        let _guard = locks.try_acquire("vol-1").expect("first acquire");
        let err = locks.try_acquire("vol-1").expect_err("should be held");
        assert!(matches!(err, BlockvolError::OperationInProgress { .. }));
    }

    #[test]
    fn distinct_keys_do_not_conflict() {
        let locks = VolumeLocks::new();
        let a = locks.try_acquire("vol-1").expect("vol-1");
        let b = locks.try_acquire("vol-2").expect("vol-2");
        assert_eq!(a.key(), "vol-1");
        assert_eq!(b.key(), "vol-2");
    }

    #[test]
    fn drop_releases_key() {
        let locks = VolumeLocks::new();
        {
            let _guard = locks.try_acquire("vol-1").expect("acquire");
            assert!(locks.is_held("vol-1"));
        }
        assert!(!locks.is_held("vol-1"));
        assert!(locks.try_acquire("vol-1").is_ok());
    }

    #[test]
    fn only_one_thread_wins_a_key() {
        let locks = VolumeLocks::new();
        let barrier = std::sync::Barrier::new(8);
        let wins = std::sync::atomic::AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let _ = scope.spawn(|| {
                    let guard = locks.try_acquire("vol-1");
                    if guard.is_ok() {
                        let _ = wins.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                    // Hold any winning guard until every thread has tried.
                    let _ = barrier.wait();
                    drop(guard);
                });
            }
        });

        assert_eq!(wins.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(!locks.is_held("vol-1"));
    }
}
