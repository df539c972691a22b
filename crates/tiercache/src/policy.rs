//! Eviction policies for a single cache level.
//!
//! A level stores its entries in an [`LruCache`] used as a plain ordered map
//! (it is created unbounded; the level enforces capacity itself). Each policy
//! is a strategy object deciding how a use reorders that map and which key
//! is evicted when the level is full:
//!
//! - [`RecencyStrategy`]: a use moves the key to the most-recently-used end;
//!   the victim is the least recently used key.
//! - [`FrequencyStrategy`]: uses never reorder, so the map stays in insertion
//!   order; the victim is the key with the smallest use count, and ties go to
//!   the oldest inserted key.

use crate::error::TierCacheError;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Ordered entry map owned by one level.
pub type Entries<K, V> = LruCache<K, CacheEntry<V>>;

/// A cached value together with its use counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    /// Stored value
    pub value: V,
    /// Number of uses: 1 on insert, +1 per hit or overwrite
    pub uses: u64,
}

impl<V> CacheEntry<V> {
    /// Create a fresh entry with a use count of one.
    pub fn new(value: V) -> Self {
        Self { value, uses: 1 }
    }

    /// Count one more use of this entry.
    pub fn record_use(&mut self) {
        self.uses = self.uses.saturating_add(1);
    }
}

/// Eviction policy of a cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EvictionPolicy {
    /// Evict the least recently used entry (LRU)
    Recency,
    /// Evict the least frequently used entry (LFU)
    Frequency,
}

impl EvictionPolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recency => "recency",
            Self::Frequency => "frequency",
        }
    }

    /// Build the strategy object implementing this policy.
    pub fn strategy<K, V>(self) -> Box<dyn EvictionStrategy<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        match self {
            Self::Recency => Box::new(RecencyStrategy),
            Self::Frequency => Box::new(FrequencyStrategy),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = TierCacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recency" | "lru" => Ok(Self::Recency),
            "frequency" | "lfu" => Ok(Self::Frequency),
            _ => Err(TierCacheError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for EvictionPolicy {
    type Error = TierCacheError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Capability shared by all eviction policies.
///
/// Implementations are stateless: all ordering and counting state lives in
/// the level's [`Entries`] map, which the caller has already locked.
pub trait EvictionStrategy<K, V>: Send + Sync
where
    K: Hash + Eq + Clone,
{
    /// Policy implemented by this strategy
    fn policy(&self) -> EvictionPolicy;

    /// Record a use of `key` and return its entry, or `None` on a miss.
    ///
    /// A miss must leave `entries` untouched.
    fn on_access<'a>(
        &self,
        entries: &'a mut Entries<K, V>,
        key: &K,
    ) -> Option<&'a mut CacheEntry<V>>;

    /// Insert a key known to be absent.
    fn on_insert(&self, entries: &mut Entries<K, V>, key: K, value: V) {
        entries.put(key, CacheEntry::new(value));
    }

    /// Choose the key to evict next, or `None` if `entries` is empty.
    fn select_victim(&self, entries: &Entries<K, V>) -> Option<K>;
}

/// Least-recently-used eviction.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecencyStrategy;

impl<K, V> EvictionStrategy<K, V> for RecencyStrategy
where
    K: Hash + Eq + Clone,
{
    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Recency
    }

    fn on_access<'a>(
        &self,
        entries: &'a mut Entries<K, V>,
        key: &K,
    ) -> Option<&'a mut CacheEntry<V>> {
        // get_mut moves the key to the most-recently-used end
        let entry = entries.get_mut(key)?;
        entry.record_use();
        Some(entry)
    }

    fn select_victim(&self, entries: &Entries<K, V>) -> Option<K> {
        entries.peek_lru().map(|(key, _)| key.clone())
    }
}

/// Least-frequently-used eviction, oldest inserted first on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyStrategy;

impl<K, V> EvictionStrategy<K, V> for FrequencyStrategy
where
    K: Hash + Eq + Clone,
{
    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Frequency
    }

    fn on_access<'a>(
        &self,
        entries: &'a mut Entries<K, V>,
        key: &K,
    ) -> Option<&'a mut CacheEntry<V>> {
        // peek_mut keeps insertion order intact for tie-breaking
        let entry = entries.peek_mut(key)?;
        entry.record_use();
        Some(entry)
    }

    fn select_victim(&self, entries: &Entries<K, V>) -> Option<K> {
        // iter() runs newest to oldest; reversed, min_by_key keeps the first
        // (oldest) of several equal minima.
        entries
            .iter()
            .rev()
            .min_by_key(|(_, entry)| entry.uses)
            .map(|(key, _)| key.clone())
    }
}
