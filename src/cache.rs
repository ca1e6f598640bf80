//! Match result caching
//!
//! The URL matcher is consulted by the host router on every navigation and by
//! the navigator on every URL change, usually with the same handful of URLs.
//! Results are kept in an LRU cache keyed by the serialised segment list.

use crate::matcher::StackMatch;
use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache performance statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of segment match results
#[derive(Debug)]
pub struct MatchCache {
    entries: LruCache<String, StackMatch>,
    stats: CacheStats,
}

impl MatchCache {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A capacity of zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, url: &str) -> Option<StackMatch> {
        if let Some(found) = self.entries.get(url) {
            self.stats.hits += 1;
            trace_log!("match cache hit for '{}'", url);
            Some(found.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("match cache miss for '{}'", url);
            None
        }
    }

    pub fn insert(&mut self, url: String, found: StackMatch) {
        self.entries.push(url, found);
    }

    pub fn clear(&mut self) {
        trace_log!("clearing match cache");
        self.entries.clear();
        self.stats.invalidations += 1;
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
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

impl Default for MatchCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(consumed: usize) -> StackMatch {
        StackMatch {
            consumed,
            stack: Vec::new(),
        }
    }

    #[test]
    fn test_cache_creation() {
        let cache = MatchCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.capacity(), 256);
    }

    #[test]
    fn test_zero_capacity_becomes_one() {
        assert_eq!(MatchCache::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let mut cache = MatchCache::new();
        assert!(cache.get("a/1").is_none());

        cache.insert("a/1".to_string(), found(2));
        assert_eq!(cache.get("a/1").map(|m| m.consumed), Some(2));

        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = MatchCache::with_capacity(2);
        cache.insert("a".to_string(), found(1));
        cache.insert("b".to_string(), found(1));
        cache.get("a");
        cache.insert("c".to_string(), found(1));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = MatchCache::new();
        cache.insert("a".to_string(), found(1));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);

        cache.reset_stats();
        assert_eq!(cache.stats().invalidations, 0);
    }
}
