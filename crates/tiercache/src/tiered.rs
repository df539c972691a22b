//! Ordered hierarchy of cache levels with promotion on hit.
//!
//! Architecture:
//! - Level 0 is the fastest and smallest; deeper levels are slower and larger
//! - `put` writes to level 0 only
//! - `get` scans from level 0 down and copies a deep hit into every
//!   shallower level
//!
//! There is no hierarchy-wide lock. The level list sits behind an `RwLock`
//! held just long enough to clone the level handles; each level is then
//! locked on its own. A `get` is therefore not atomic across levels: a
//! concurrent `remove_level` can land between the scan and the promotion, in
//! which case the promotion writes into a level that is already detached.

use crate::config::TieredCacheConfig;
use crate::error::{Result, TierCacheError};
use crate::level::CacheLevel;
use crate::policy::EvictionPolicy;
use crate::stats::{CacheStats, StatsRecorder};
use parking_lot::RwLock;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info};

/// Multi-level cache emulating a memory hierarchy.
pub struct TieredCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Levels, fastest first
    levels: RwLock<Vec<Arc<CacheLevel<K, V>>>>,
    /// Statistics tracking
    stats: StatsRecorder,
}

impl<K, V> TieredCache<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Create a hierarchy with no levels.
    pub fn new() -> Self {
        Self {
            levels: RwLock::new(Vec::new()),
            stats: StatsRecorder::default(),
        }
    }

    /// Build a hierarchy from configuration, levels in configured order.
    pub fn from_config(config: &TieredCacheConfig) -> Result<Self> {
        config.validate()?;

        let cache = Self::new();
        for level in &config.levels {
            cache.add_level(level.capacity, level.policy)?;
        }
        Ok(cache)
    }

    /// Append a level below the current deepest one and return its index.
    pub fn add_level(&self, capacity: usize, policy: EvictionPolicy) -> Result<usize> {
        let level = Arc::new(CacheLevel::new(capacity, policy)?);

        let mut levels = self.levels.write();
        levels.push(level);
        let index = levels.len() - 1;

        info!(
            "Added cache level {} (capacity={}, policy={})",
            index, capacity, policy
        );
        Ok(index)
    }

    /// Remove the level at `index`, discarding everything it holds.
    ///
    /// Deeper levels shift up by one. An out-of-range index returns
    /// [`TierCacheError::InvalidLevelIndex`] and changes nothing.
    pub fn remove_level(&self, index: usize) -> Result<()> {
        let mut levels = self.levels.write();
        if index >= levels.len() {
            return Err(TierCacheError::invalid_level_index(index, levels.len()));
        }

        let removed = levels.remove(index);
        info!(
            "Removed cache level {} (discarded {} entries)",
            index,
            removed.len()
        );
        Ok(())
    }

    /// Look up `key` from the fastest level down.
    ///
    /// On a hit at level `i`, the value is written into every level `j < i`,
    /// shallowest first. Those writes may evict from the shallower levels.
    /// A miss leaves every level untouched.
    pub fn get(&self, key: &K) -> Option<V> {
        let levels = self.current_levels();

        for (depth, level) in levels.iter().enumerate() {
            let Some(value) = level.get(key) else {
                continue;
            };

            debug!("Level {} cache hit for key: {:?}", depth, key);
            self.stats.record_hit();

            for (target, shallower) in levels[..depth].iter().enumerate() {
                if let Some((evicted, _)) = shallower.put(key.clone(), value.clone()) {
                    debug!(
                        "Promotion into level {} evicted key: {:?}",
                        target, evicted
                    );
                }
                debug!("Promoted level {}→{} for key: {:?}", depth, target, key);
            }
            self.stats.record_promotions(depth as u64);

            return Some(value);
        }

        debug!("Cache miss for key: {:?}", key);
        self.stats.record_miss();
        None
    }

    /// Insert into level 0. Deeper levels only fill through promotion.
    ///
    /// Does nothing when the hierarchy has no levels.
    pub fn put(&self, key: K, value: V) {
        let Some(first) = self.levels.read().first().cloned() else {
            debug!("Dropping put for key {:?}: no cache levels", key);
            return;
        };

        self.stats.record_put();
        debug!("Putting key into cache: {:?}", key);

        if let Some((evicted, _)) = first.put(key, value) {
            debug!("Level 0 evicted key: {:?}", evicted);
        }
    }

    /// Remove `key` from every level. Returns whether any level held it.
    pub fn invalidate(&self, key: &K) -> bool {
        debug!("Invalidating key from all cache levels: {:?}", key);

        self.current_levels()
            .iter()
            .fold(false, |found, level| level.remove(key).is_some() || found)
    }

    /// Empty every level and reset statistics; the levels themselves stay.
    pub fn clear(&self) {
        info!("Clearing all cache levels");

        for level in self.current_levels() {
            level.clear();
        }
        self.stats.reset();
    }

    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.levels.read().len()
    }

    /// Whether the hierarchy has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.read().is_empty()
    }

    /// Handle to the level at `index`.
    pub fn level(&self, index: usize) -> Option<Arc<CacheLevel<K, V>>> {
        self.levels.read().get(index).cloned()
    }

    /// Current entry count of every level.
    pub fn sizes(&self) -> Vec<usize> {
        self.current_levels().iter().map(|level| level.len()).collect()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Copy out the contents of every level.
    ///
    /// Each level is locked only while it is copied, so the result is not a
    /// consistent cut across levels under concurrent writes.
    pub fn snapshot(&self) -> HierarchySnapshot<K, V> {
        let levels = self
            .current_levels()
            .iter()
            .enumerate()
            .map(|(index, level)| LevelSnapshot {
                index,
                capacity: level.capacity(),
                policy: level.policy(),
                evictions: level.evictions(),
                entries: level.snapshot(),
            })
            .collect();

        HierarchySnapshot { levels }
    }

    fn current_levels(&self) -> Vec<Arc<CacheLevel<K, V>>> {
        self.levels.read().clone()
    }
}

impl<K, V> Default for TieredCache<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Debug for TieredCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TieredCache")
            .field("levels", &*self.levels.read())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

/// Contents of one level at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSnapshot<K, V> {
    /// Position in the hierarchy, 0 = fastest
    pub index: usize,
    pub capacity: usize,
    pub policy: EvictionPolicy,
    /// Entries evicted by this level so far
    pub evictions: u64,
    /// Entries, next eviction candidate side first
    pub entries: Vec<(K, V)>,
}

impl<K, V> LevelSnapshot<K, V> {
    /// Look up a key in the copied entries.
    pub fn get(&self, key: &K) -> Option<&V>
    where
        K: PartialEq,
    {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }
}

/// Contents of a whole hierarchy; `Display` renders one line per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchySnapshot<K, V> {
    pub levels: Vec<LevelSnapshot<K, V>>,
}

impl<K: Debug, V: Debug> fmt::Display for HierarchySnapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.levels.is_empty() {
            return writeln!(f, "(no cache levels)");
        }

        for level in &self.levels {
            write!(
                f,
                "Cache Level {} ({}, {}/{}): [",
                level.index + 1,
                level.policy,
                level.entries.len(),
                level.capacity
            )?;
            for (i, (key, value)) in level.entries.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}: {:?}", key, value)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level() -> TieredCache<String, String> {
        let cache = TieredCache::new();
        cache.add_level(1, EvictionPolicy::Recency).unwrap();
        cache.add_level(5, EvictionPolicy::Recency).unwrap();
        cache
    }

    fn s(value: &str) -> String {
        value.to_string()
    }

    #[test]
    fn test_add_level_returns_index() {
        let cache = TieredCache::<String, i32>::new();
        assert!(cache.is_empty());
        assert_eq!(cache.add_level(2, EvictionPolicy::Recency).unwrap(), 0);
        assert_eq!(cache.add_level(4, EvictionPolicy::Frequency).unwrap(), 1);
        assert_eq!(cache.level_count(), 2);
    }

    #[test]
    fn test_add_level_rejects_zero_capacity() {
        let cache = TieredCache::<String, i32>::new();
        let err = cache.add_level(0, EvictionPolicy::Frequency).unwrap_err();
        assert!(err.is_invalid_capacity());
        assert_eq!(cache.level_count(), 0);
    }

    #[test]
    fn test_put_without_levels_is_noop() {
        let cache = TieredCache::<String, i32>::new();
        cache.put(s("a"), 1);
        assert_eq!(cache.get(&s("a")), None);
        assert_eq!(cache.stats().total_puts, 0);
    }

    #[test]
    fn test_hit_in_first_level() {
        let cache = two_level();
        cache.put(s("key1"), s("value1"));

        assert_eq!(cache.get(&s("key1")), Some(s("value1")));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.promotions, 0);
    }

    #[test]
    fn test_promotion_from_deeper_level() {
        let cache = two_level();
        cache.level(1).unwrap().put(s("key1"), s("value1"));

        assert_eq!(cache.get(&s("key1")), Some(s("value1")));
        assert!(cache.level(0).unwrap().contains(&s("key1")));
        assert_eq!(cache.stats().promotions, 1);
    }

    #[test]
    fn test_promotion_can_evict_from_shallower_level() {
        let cache = two_level();
        cache.put(s("hot"), s("h"));
        cache.level(1).unwrap().put(s("cold"), s("c"));

        cache.get(&s("cold"));
        let first = cache.level(0).unwrap();
        assert!(first.contains(&s("cold")));
        assert!(!first.contains(&s("hot")));
        assert_eq!(first.evictions(), 1);
    }

    #[test]
    fn test_remove_level_out_of_range() {
        let cache = two_level();
        let err = cache.remove_level(2).unwrap_err();
        assert!(matches!(
            err,
            TierCacheError::InvalidLevelIndex { index: 2, levels: 2 }
        ));
        assert_eq!(cache.level_count(), 2);
    }

    #[test]
    fn test_remove_level_shifts_deeper_levels() {
        let cache = TieredCache::<String, i32>::new();
        cache.add_level(1, EvictionPolicy::Recency).unwrap();
        cache.add_level(7, EvictionPolicy::Frequency).unwrap();

        cache.remove_level(0).unwrap();
        let level = cache.level(0).unwrap();
        assert_eq!(level.capacity(), 7);
        assert_eq!(level.policy(), EvictionPolicy::Frequency);
    }

    #[test]
    fn test_invalidate_removes_from_all_levels() {
        let cache = two_level();
        cache.put(s("a"), s("1"));
        cache.level(1).unwrap().put(s("a"), s("1"));

        assert!(cache.invalidate(&s("a")));
        assert_eq!(cache.sizes(), vec![0, 0]);
        assert!(!cache.invalidate(&s("a")));
    }

    #[test]
    fn test_clear_keeps_levels() {
        let cache = two_level();
        cache.put(s("a"), s("1"));
        cache.get(&s("a"));

        cache.clear();
        assert_eq!(cache.level_count(), 2);
        assert_eq!(cache.sizes(), vec![0, 0]);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_snapshot_display() {
        let cache = two_level();
        cache.put(s("key1"), s("value1"));

        let rendered = cache.snapshot().to_string();
        assert_eq!(
            rendered,
            "Cache Level 1 (recency, 1/1): [\"key1\": \"value1\"]\n\
             Cache Level 2 (recency, 0/5): []\n"
        );
    }

    #[test]
    fn test_empty_snapshot_display() {
        let cache = TieredCache::<String, i32>::new();
        assert_eq!(cache.snapshot().to_string(), "(no cache levels)\n");
    }

    #[test]
    fn test_from_config() {
        let cache = TieredCache::<String, i32>::from_config(&TieredCacheConfig::default()).unwrap();
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.levels.len(), 2);
        assert_eq!(snapshot.levels[0].capacity, 3);
        assert_eq!(snapshot.levels[1].policy, EvictionPolicy::Frequency);
    }
}
