use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};

const DEFAULT_SHARDS: usize = 64;

/// Sharded per-user advisory locks.
///
/// A fixed shard count keeps memory bounded no matter how many players ever
/// show up; two users hashing to the same shard merely serialize against
/// each other, which is harmless for operations this short.
pub struct LockArena {
    shards: Vec<Mutex<()>>,
}

impl Default for LockArena {
    fn default() -> Self {
        Self::new(DEFAULT_SHARDS)
    }
}

impl LockArena {
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        Self {
            shards: (0..shard_count).map(|_| Mutex::new(())).collect(),
        }
    }

    fn shard_index(&self, user_id: u64) -> usize {
        let mut hasher = DefaultHasher::new();
        user_id.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    /// Holds the user's shard for the duration of a load-mutate-persist
    /// sequence.
    pub fn lock(&self, user_id: u64) -> MutexGuard<'_, ()> {
        self.shards[self.shard_index(user_id)]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
