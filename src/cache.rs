//! Path resolution caching.
//!
//! [`ResolutionCache`] remembers which [`RouteId`] a normalized path
//! resolved to, so repeated navigations to the same URL skip the segment
//! walk. It is gated behind the `cache` feature and backed by the [`lru`]
//! crate.
//!
//! Only successful resolutions are stored. The route tree is frozen once
//! the navigator owns it, so entries never go stale.
//! [`clear`](ResolutionCache::clear) exists for callers that want to bound
//! memory.
//!
//! # Examples
//!
//! ```
//! use shell_navigator::cache::ResolutionCache;
//! use shell_navigator::RouteId;
//!
//! let mut cache = ResolutionCache::new();
//! cache.insert("/filling".to_string(), RouteId::ROOT);
//!
//! assert_eq!(cache.get("/filling"), Some(RouteId::ROOT));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::tree::RouteId;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Hit/miss counters for a [`ResolutionCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Number of [`ResolutionCache::clear`] calls.
    pub invalidations: usize,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`; `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU map from normalized path to resolved route.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: LruCache<String, RouteId>,
    stats: CacheStats,
}

impl ResolutionCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Cache holding up to 256 paths.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Cache holding up to `capacity` paths. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up `path`, updating the counters.
    pub fn get(&mut self, path: &str) -> Option<RouteId> {
        if let Some(id) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Path cache hit for '{}'", path);
            Some(*id)
        } else {
            self.stats.misses += 1;
            trace_log!("Path cache miss for '{}'", path);
            None
        }
    }

    pub fn insert(&mut self, path: String, id: RouteId) {
        trace_log!("Caching route #{} for path '{}'", id.index(), path);
        self.entries.push(path, id);
    }

    /// Drop every entry and count an invalidation.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Path cache cleared: {} entries removed (hit rate: {:.1}%)",
            removed,
            self.stats.hit_rate() * 100.0
        );
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let mut cache = ResolutionCache::new();
        assert_eq!(cache.get("/demo"), None);
        assert_eq!(cache.stats().misses, 1);

        cache.insert("/demo".to_string(), RouteId::ROOT);
        assert_eq!(cache.get("/demo"), Some(RouteId::ROOT));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = ResolutionCache::with_capacity(2);
        cache.insert("/a".to_string(), RouteId::ROOT);
        cache.insert("/b".to_string(), RouteId::ROOT);
        cache.get("/a");
        cache.insert("/c".to_string(), RouteId::ROOT);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("/b"), None);
        assert!(cache.get("/a").is_some());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(ResolutionCache::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn test_clear_and_hit_rate() {
        let mut cache = ResolutionCache::new();
        cache.get("/a");
        cache.insert("/a".to_string(), RouteId::ROOT);
        cache.get("/a");
        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
    }
}
