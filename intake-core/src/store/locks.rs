use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per record id.
///
/// Holding the guard serialises read-validate-write sequences on the same
/// id while leaving other ids free to proceed.
#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait for exclusive access to `id`.
    ///
    /// The entry for `id` is released when the returned guard drops, or
    /// when this future is dropped before the lock is acquired.
    pub async fn lock(&self, id: Uuid) -> KeyedLockGuard<'_> {
        let mut held = KeyedLockGuard {
            locks: self,
            id,
            guard: None,
        };
        let lock = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        held.guard = Some(lock.lock_owned().await);
        held
    }

    /// Drop the lock entry for `id` if nobody holds or waits on it
    fn release(&self, id: Uuid) {
        self.locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn tracked(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive access to one id, released on drop
pub struct KeyedLockGuard<'a> {
    locks: &'a KeyedLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.release(self.id);
    }
}
