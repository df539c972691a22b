//! Hierarchy-wide statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by [`crate::TieredCache`].
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    gets: AtomicU64,
    puts: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    promotions: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_promotions(&self, count: u64) {
        self.promotions.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        for counter in [&self.gets, &self.puts, &self.hits, &self.misses, &self.promotions] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            total_gets: self.gets.load(Ordering::Relaxed),
            total_puts: self.puts.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of hierarchy statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of get operations
    pub total_gets: u64,
    /// Number of put operations
    pub total_puts: u64,
    /// Gets answered by any level
    pub hits: u64,
    /// Gets not found in any level
    pub misses: u64,
    /// Level writes performed by promotion
    pub promotions: u64,
}

impl CacheStats {
    /// Calculate overall cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.total_gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_gets as f64
        }
    }
}
