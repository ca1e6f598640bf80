//! URL matcher adapter
//!
//! Glue between the host router and the segment matcher. The router asks "how
//! much of this URL is panel stack?" and mounts the panel outlet over exactly
//! that many segments.

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, MatchCache};
use crate::matcher::{match_prefix, StackMatch};
use crate::panel::PanelConfig;
use crate::route::RuleTable;
#[cfg(feature = "cache")]
use crate::segment::serialize_segments;
use crate::{trace_log, UrlSegment};
#[cfg(feature = "cache")]
use std::cell::RefCell;

/// Matches URL segments against a fixed rule table
#[derive(Debug)]
pub struct UrlMatcher {
    rules: RuleTable,
    #[cfg(feature = "cache")]
    cache: RefCell<MatchCache>,
}

impl UrlMatcher {
    /// Create a matcher with the default cache capacity
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            #[cfg(feature = "cache")]
            cache: RefCell::new(MatchCache::new()),
        }
    }

    /// Create a matcher with a specific cache capacity
    ///
    /// Without the `cache` feature the capacity is ignored.
    pub fn with_cache_capacity(rules: RuleTable, capacity: usize) -> Self {
        #[cfg(not(feature = "cache"))]
        let _ = capacity;
        Self {
            rules,
            #[cfg(feature = "cache")]
            cache: RefCell::new(MatchCache::with_capacity(capacity)),
        }
    }

    /// The rule table
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Match `segments`, consulting the cache first
    pub fn resolve(&self, segments: &[UrlSegment]) -> StackMatch {
        #[cfg(feature = "cache")]
        {
            let key = serialize_segments(segments);
            if let Some(found) = self.cache.borrow_mut().get(&key) {
                return found;
            }
            let found = match_prefix(segments, &self.rules);
            self.cache.borrow_mut().insert(key, found.clone());
            found
        }

        #[cfg(not(feature = "cache"))]
        {
            match_prefix(segments, &self.rules)
        }
    }

    /// Router-facing match: `None` when no leading segment belongs to a panel
    ///
    /// # Example
    ///
    /// ```
    /// use panel_navigator::*;
    ///
    /// struct Blank;
    /// impl PanelComponent for Blank {
    ///     fn init_panel(&mut self, _data: &PanelData) {}
    /// }
    ///
    /// let rules = RuleTable::new()
    ///     .rule(RouteRule::new("user/:id", ComponentRef::new("user", || Box::new(Blank))));
    /// let matcher = UrlMatcher::new(rules);
    ///
    /// let found = matcher.match_url(&parse_segments("user/4/settings")).unwrap();
    /// assert_eq!(found.consumed, 2);
    /// assert!(matcher.match_url(&parse_segments("settings")).is_none());
    /// ```
    pub fn match_url(&self, segments: &[UrlSegment]) -> Option<StackMatch> {
        let found = self.resolve(segments);
        trace_log!(
            "url matcher consumed {} of {} segment(s)",
            found.consumed,
            segments.len()
        );
        (found.consumed > 0).then_some(found)
    }

    /// Full stack config for `segments` (possibly empty)
    pub fn stack_for(&self, segments: &[UrlSegment]) -> Vec<PanelConfig> {
        self.resolve(segments).stack
    }

    /// Check that every segment belongs to the panel stack
    pub fn is_complete_stack(&self, segments: &[UrlSegment]) -> bool {
        !segments.is_empty() && self.resolve(segments).consumed == segments.len()
    }

    /// Drop cached results
    pub fn clear_cache(&self) {
        #[cfg(feature = "cache")]
        self.cache.borrow_mut().clear();
    }

    /// Cache statistics
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{PanelComponent, PanelData};
    use crate::route::{ComponentRef, RouteRule};
    use crate::segment::parse_segments;

    struct Blank;

    impl PanelComponent for Blank {
        fn init_panel(&mut self, _data: &PanelData) {}
    }

    fn matcher() -> UrlMatcher {
        UrlMatcher::new(RuleTable::new().rule(RouteRule::new(
            "panel-a/:param",
            ComponentRef::new("a", || Box::new(Blank)),
        )))
    }

    #[test]
    fn test_reports_consumed_segments() {
        let matcher = matcher();
        let found = matcher
            .match_url(&parse_segments("panel-a/1/panel-a/2/other"))
            .unwrap();

        assert_eq!(found.consumed, 4);
        assert_eq!(found.stack.len(), 2);
    }

    #[test]
    fn test_nothing_consumed_is_none() {
        let matcher = matcher();
        assert!(matcher.match_url(&parse_segments("other/1")).is_none());
        assert!(matcher.match_url(&[]).is_none());
    }

    #[test]
    fn test_complete_stack() {
        let matcher = matcher();
        assert!(matcher.is_complete_stack(&parse_segments("panel-a/3")));
        assert!(!matcher.is_complete_stack(&parse_segments("panel-a/3/x")));
        assert!(!matcher.is_complete_stack(&[]));
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_repeated_match_hits_cache() {
        let matcher = matcher();
        let segments = parse_segments("panel-a/1");

        matcher.stack_for(&segments);
        matcher.stack_for(&segments);

        let stats = matcher.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);

        matcher.clear_cache();
        assert_eq!(matcher.cache_stats().invalidations, 1);
    }
}
