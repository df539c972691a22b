//! Error types for the tiered cache.

/// Result type alias for tiercache operations.
pub type Result<T> = std::result::Result<T, TierCacheError>;

/// Errors surfaced by the cache hierarchy.
///
/// Lookups never fail: an absent key is `None`, not an error. Errors only
/// come from malformed configuration or level management.
#[derive(Debug, thiserror::Error)]
pub enum TierCacheError {
    /// A level was configured with room for zero entries
    #[error("Invalid capacity: {capacity} (a cache level must hold at least one entry)")]
    InvalidCapacity { capacity: usize },

    /// A level index outside the current hierarchy
    #[error("Invalid level index {index}: hierarchy has {levels} level(s)")]
    InvalidLevelIndex { index: usize, levels: usize },

    /// Unknown eviction policy name
    #[error("Unknown eviction policy '{0}'. Must be one of: recency (lru), frequency (lfu)")]
    UnknownPolicy(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TierCacheError {
    /// Create a new invalid capacity error
    pub fn invalid_capacity(capacity: usize) -> Self {
        Self::InvalidCapacity { capacity }
    }

    /// Create a new invalid level index error
    pub fn invalid_level_index(index: usize, levels: usize) -> Self {
        Self::InvalidLevelIndex { index, levels }
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this is an invalid level index error
    pub fn is_invalid_level_index(&self) -> bool {
        matches!(self, Self::InvalidLevelIndex { .. })
    }

    /// Check if this is an invalid capacity error
    pub fn is_invalid_capacity(&self) -> bool {
        matches!(self, Self::InvalidCapacity { .. })
    }
}
