//! Tiered in-memory key-value cache.
//!
//! A [`TieredCache`] is an ordered stack of [`CacheLevel`]s, each with its
//! own capacity and [`EvictionPolicy`]:
//! - Level 0 is the fast, small level; `put` only ever writes there
//! - `get` searches levels in order and promotes a deep hit into every
//!   shallower level, the way a memory hierarchy fills its upper caches
//! - Each level evicts by recency (LRU) or by use count (LFU) and guards its
//!   own state with a mutex; there is no lock over the whole hierarchy
//!
//! # Example
//!
//! ```
//! use tiercache::{EvictionPolicy, TieredCache};
//!
//! # fn main() -> tiercache::Result<()> {
//! let cache = TieredCache::new();
//! cache.add_level(3, EvictionPolicy::Recency)?;
//! cache.add_level(5, EvictionPolicy::Frequency)?;
//!
//! cache.put("key1".to_string(), "value1".to_string());
//! assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
//! println!("{}", cache.snapshot());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod level;
pub mod policy;
pub mod stats;
pub mod tiered;

pub use config::{LevelConfig, TieredCacheConfig};
pub use error::{Result, TierCacheError};
pub use level::CacheLevel;
pub use policy::{
    CacheEntry, EvictionPolicy, EvictionStrategy, FrequencyStrategy, RecencyStrategy,
};
pub use stats::CacheStats;
pub use tiered::{HierarchySnapshot, LevelSnapshot, TieredCache};
