//! A single bounded cache level.

use crate::error::{Result, TierCacheError};
use crate::policy::{Entries, EvictionPolicy, EvictionStrategy};
use lru::LruCache;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// Lock-protected state of a level.
struct LevelState<K, V> {
    entries: Entries<K, V>,
    evictions: u64,
}

/// Bounded key-value store with one eviction policy.
///
/// Every operation takes the level's mutex for its whole read-modify-write
/// sequence, so concurrent callers never observe a half-applied eviction or
/// reorder. After any public call returns, `len() <= capacity()`.
pub struct CacheLevel<K, V>
where
    K: Clone + Eq + Hash,
{
    capacity: usize,
    strategy: Box<dyn EvictionStrategy<K, V>>,
    state: Mutex<LevelState<K, V>>,
}

impl<K, V> CacheLevel<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Create an empty level.
    ///
    /// Fails with [`TierCacheError::InvalidCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        if capacity == 0 {
            return Err(TierCacheError::invalid_capacity(capacity));
        }

        Ok(Self {
            capacity,
            strategy: policy.strategy(),
            state: Mutex::new(LevelState {
                entries: LruCache::unbounded(),
                evictions: 0,
            }),
        })
    }

    /// Look up `key`, counting a hit as a use.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        self.strategy
            .on_access(&mut state.entries, key)
            .map(|entry| entry.value.clone())
    }

    /// Insert or overwrite `key`.
    ///
    /// Overwriting counts as a use. Inserting into a full level evicts one
    /// entry first, which is returned.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let mut state = self.state.lock();

        if let Some(entry) = self.strategy.on_access(&mut state.entries, &key) {
            entry.value = value;
            return None;
        }

        let evicted = if state.entries.len() >= self.capacity {
            self.evict(&mut state)
        } else {
            None
        };

        self.strategy.on_insert(&mut state.entries, key, value);
        evicted
    }

    /// Remove the policy's victim. Caller holds the lock.
    fn evict(&self, state: &mut LevelState<K, V>) -> Option<(K, V)> {
        let victim = self.strategy.select_victim(&state.entries)?;
        let entry = state.entries.pop(&victim)?;
        state.evictions += 1;

        debug!(
            "Evicted key {:?} ({} policy, {} uses)",
            victim,
            self.strategy.policy(),
            entry.uses
        );

        Some((victim, entry.value))
    }

    /// Remove `key` without counting it as an eviction.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.state.lock().entries.pop(key).map(|entry| entry.value)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Read `key` without affecting order or use counts.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.state.lock().entries.peek(key).map(|entry| entry.value.clone())
    }

    /// Check presence without affecting order or use counts.
    pub fn contains(&self, key: &K) -> bool {
        self.state.lock().entries.contains(key)
    }

    /// Current use count of `key`.
    pub fn use_count(&self, key: &K) -> Option<u64> {
        self.state.lock().entries.peek(key).map(|entry| entry.uses)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.strategy.policy()
    }

    /// Number of entries evicted so far.
    pub fn evictions(&self) -> u64 {
        self.state.lock().evictions
    }

    /// Copy out all entries, next eviction candidate side first.
    ///
    /// Recency levels list least to most recently used; frequency levels list
    /// oldest to newest insert.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let state = self.state.lock();
        state
            .entries
            .iter()
            .rev()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }
}

impl<K, V> Debug for CacheLevel<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLevel")
            .field("capacity", &self.capacity)
            .field("policy", &self.strategy.policy())
            .field("len", &self.state.lock().entries.len())
            .finish()
    }
}
