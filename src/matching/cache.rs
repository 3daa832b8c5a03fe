use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::catalog::TileId;

/// Memoization of nearest-tile lookups keyed by exact 8-bit RGB
///
/// Lab conversion is a pure function of the RGB input, so a cached answer is
/// always the one the matcher would compute again.
#[derive(Default, Debug)]
pub struct MatchCache {
    /// RGB to matched tile mapping
    entries: HashMap<[u8; 3], TileId>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl CacheStats {
    /// Share of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl MatchCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct colors cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Test if nothing has been cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retrieve the cached tile or compute and store it
    pub fn get_or_compute<F>(&mut self, rgb: [u8; 3], compute_fn: F) -> TileId
    where
        F: FnOnce() -> TileId,
    {
        match self.entries.entry(rgb) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                *entry.get()
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                *entry.insert(compute_fn())
            }
        }
    }
}
