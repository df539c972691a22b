//! Hierarchy configuration.
//!
//! A hierarchy is described as an ordered list of levels, fastest first:
//!
//! ```toml
//! [[levels]]
//! capacity = 3
//! policy = "recency"
//!
//! [[levels]]
//! capacity = 5
//! policy = "lfu"
//! ```
//!
//! Policy names are case-insensitive and accept `recency`/`lru` and
//! `frequency`/`lfu`.

use crate::error::{Result, TierCacheError};
use crate::policy::EvictionPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Maximum number of entries
    pub capacity: usize,
    /// Eviction policy
    pub policy: EvictionPolicy,
}

impl LevelConfig {
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self { capacity, policy }
    }
}

/// Configuration of a whole hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredCacheConfig {
    /// Levels ordered from fastest (index 0) to slowest
    #[serde(default)]
    pub levels: Vec<LevelConfig>,
}

impl Default for TieredCacheConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig::new(3, EvictionPolicy::Recency),
                LevelConfig::new(5, EvictionPolicy::Frequency),
            ],
        }
    }
}

impl TieredCacheConfig {
    /// Empty hierarchy configuration.
    pub fn empty() -> Self {
        Self { levels: Vec::new() }
    }

    /// Append a level.
    pub fn with_level(mut self, capacity: usize, policy: EvictionPolicy) -> Self {
        self.levels.push(LevelConfig::new(capacity, policy));
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading cache configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TierCacheError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject levels that could never hold an entry.
    pub fn validate(&self) -> Result<()> {
        for (index, level) in self.levels.iter().enumerate() {
            if level.capacity == 0 {
                return Err(TierCacheError::config(format!(
                    "Level {} has capacity 0; every level must hold at least one entry",
                    index
                )));
            }
        }
        Ok(())
    }
}
