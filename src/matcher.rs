//! Segment matching
//!
//! Turns the flat list of URL segments after the host route into an ordered
//! stack of [`PanelConfig`]s. Matching is greedy: for the remaining segments the
//! longest prefix that some rule accepts wins, rules are tried in table order,
//! and the consumed prefix is removed before matching continues. When no prefix
//! matches, the rest of the URL is not part of the panel stack.

use crate::panel::PanelConfig;
use crate::route::RuleTable;
use crate::{trace_log, PanelParams, UrlSegment};
use std::rc::Rc;

/// A parsed rule path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    /// Pattern components in order
    pub segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parse a pattern such as `user/:id/orders`
    pub fn from_path(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(PatternSegment::parse)
            .collect();

        Self { segments }
    }

    /// Number of URL segments this pattern consumes
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the pattern has no components
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Match this pattern against exactly `slice`
    ///
    /// Returns the merged parameters: matrix parameters of every segment in
    /// order (later segments override earlier ones), then named captures.
    pub fn match_slice(&self, slice: &[UrlSegment]) -> Option<PanelParams> {
        if slice.len() != self.segments.len() || slice.is_empty() {
            return None;
        }

        let mut captures = PanelParams::new();
        for (pattern, segment) in self.segments.iter().zip(slice) {
            match pattern {
                PatternSegment::Static(expected) => {
                    if segment.path != *expected {
                        return None;
                    }
                }
                PatternSegment::Param(name) => {
                    if !is_positive_id(&segment.path) {
                        return None;
                    }
                    captures.insert(name.clone(), segment.path.clone());
                }
            }
        }

        let mut params = PanelParams::new();
        for segment in slice {
            params.merge(&segment.params);
        }
        params.merge(&captures);
        Some(params)
    }
}

/// A single component of a rule pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Literal text that must match the segment's path token
    Static(String),
    /// Named capture; only binds positive integer tokens
    Param(String),
}

impl PatternSegment {
    /// Parse a pattern component
    ///
    /// - `"user"` -> `Static("user")`
    /// - `":id"` -> `Param("id")`
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix(':') {
            Some(name) => PatternSegment::Param(name.to_string()),
            None => PatternSegment::Static(s.to_string()),
        }
    }
}

/// Check that a token looks like a positive ID (`1`, `42`, ...)
pub fn is_positive_id(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && value.parse::<u64>().map_or(false, |id| id > 0)
}

/// Result of matching a segment list
#[derive(Debug, Clone, Default)]
pub struct StackMatch {
    /// Number of leading segments that belong to the panel stack
    pub consumed: usize,
    /// Matched configs, bottom panel first
    pub stack: Vec<PanelConfig>,
}

impl StackMatch {
    /// Check if nothing matched
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Match as much of `segments` as possible and report how much was consumed
pub fn match_prefix(segments: &[UrlSegment], rules: &RuleTable) -> StackMatch {
    let mut result = StackMatch::default();

    'remaining: while result.consumed < segments.len() {
        let remaining = &segments[result.consumed..];

        for len in (1..=remaining.len()).rev() {
            let slice = &remaining[..len];
            for rule in rules.iter() {
                if rule.pattern().len() != len {
                    continue;
                }
                if let Some(params) = rule.pattern().match_slice(slice) {
                    trace_log!(
                        "rule '{}' matched {} segment(s) at offset {}",
                        rule.path,
                        len,
                        result.consumed
                    );
                    result
                        .stack
                        .push(PanelConfig::new(Rc::clone(rule), slice.to_vec(), params));
                    result.consumed += len;
                    continue 'remaining;
                }
            }
        }

        trace_log!(
            "no rule matches remaining {} segment(s); stopping",
            remaining.len()
        );
        break;
    }

    result
}

/// Compute the stack config for `segments`
pub fn match_stack(segments: &[UrlSegment], rules: &RuleTable) -> Vec<PanelConfig> {
    match_prefix(segments, rules).stack
}
