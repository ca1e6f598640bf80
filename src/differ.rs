//! Stack config diffing
//!
//! Every URL change produces fresh [`PanelConfig`] values, so configs are
//! compared by their structural [`PanelKey`](crate::PanelKey) rather than by
//! identity.

use crate::panel::{PanelConfig, PanelKey};
use std::collections::HashSet;

/// Difference between two stack configs
#[derive(Debug, Clone, Default)]
pub struct ConfigDiff {
    /// Entries of the old stack missing from the new one, in old-stack order
    pub to_remove: Vec<PanelConfig>,
    /// Entries of the new stack missing from the old one, in new-stack order
    pub to_add: Vec<PanelConfig>,
    /// Number of leading entries both stacks share
    pub common_prefix: usize,
}

impl ConfigDiff {
    /// Check if the two stacks contain the same panels
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    /// Index of the last panel common to both stacks, if any
    ///
    /// When the removed entries form a suffix of the old stack this equals
    /// `old.len() - to_remove.len() - 1`.
    pub fn divergence_point(&self) -> Option<usize> {
        self.common_prefix.checked_sub(1)
    }
}

/// Compute which entries were removed and added between `old` and `new`
pub fn diff_configs(old: &[PanelConfig], new: &[PanelConfig]) -> ConfigDiff {
    let old_keys: HashSet<PanelKey> = old.iter().map(PanelConfig::key).collect();
    let new_keys: HashSet<PanelKey> = new.iter().map(PanelConfig::key).collect();

    ConfigDiff {
        to_remove: old
            .iter()
            .filter(|config| !new_keys.contains(&config.key()))
            .cloned()
            .collect(),
        to_add: new
            .iter()
            .filter(|config| !old_keys.contains(&config.key()))
            .cloned()
            .collect(),
        common_prefix: common_prefix_len(old, new),
    }
}

/// Number of leading entries that are structurally equal in both stacks
pub fn common_prefix_len(old: &[PanelConfig], new: &[PanelConfig]) -> usize {
    old.iter()
        .zip(new)
        .take_while(|(a, b)| a.same_panel(b))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_stack;
    use crate::panel::{PanelComponent, PanelData};
    use crate::route::{ComponentRef, RouteRule, RuleTable};
    use crate::segment::parse_segments;

    struct Blank;

    impl PanelComponent for Blank {
        fn init_panel(&mut self, _data: &PanelData) {}
    }

    fn rules() -> RuleTable {
        RuleTable::new()
            .rule(RouteRule::new(
                "a/:id",
                ComponentRef::new("a", || Box::new(Blank)),
            ))
            .rule(RouteRule::new(
                "b/:id",
                ComponentRef::new("b", || Box::new(Blank)),
            ))
    }

    fn stack(rules: &RuleTable, url: &str) -> Vec<PanelConfig> {
        match_stack(&parse_segments(url), rules)
    }

    fn paths(configs: &[PanelConfig]) -> Vec<String> {
        configs.iter().map(|c| c.route.to_url()).collect()
    }

    #[test]
    fn test_diff_of_identical_stacks_is_empty() {
        let rules = rules();
        // two separate parses: fresh objects, same structure
        let diff = diff_configs(&stack(&rules, "a/1/b/2"), &stack(&rules, "a/1/b/2"));

        assert!(diff.is_empty());
        assert_eq!(diff.common_prefix, 2);
        assert_eq!(diff.divergence_point(), Some(1));
    }

    #[test]
    fn test_diff_replace_top() {
        let rules = rules();
        let old = stack(&rules, "a/1/b/2/a/3");
        let new = stack(&rules, "a/1/b/4");

        let diff = diff_configs(&old, &new);

        assert_eq!(paths(&diff.to_remove), vec!["b/2", "a/3"]);
        assert_eq!(paths(&diff.to_add), vec!["b/4"]);
        assert_eq!(diff.divergence_point(), Some(0));
        assert_eq!(
            diff.divergence_point(),
            (old.len() - diff.to_remove.len()).checked_sub(1)
        );
    }

    #[test]
    fn test_diff_only_additions() {
        let rules = rules();
        let diff = diff_configs(&stack(&rules, "a/1"), &stack(&rules, "a/1/b/2"));

        assert!(diff.to_remove.is_empty());
        assert_eq!(paths(&diff.to_add), vec!["b/2"]);
        assert_eq!(diff.common_prefix, 1);
    }

    #[test]
    fn test_diff_from_empty() {
        let rules = rules();
        let diff = diff_configs(&[], &stack(&rules, "a/1"));

        assert_eq!(diff.to_add.len(), 1);
        assert_eq!(diff.divergence_point(), None);
    }

    #[test]
    fn test_diff_partitions_symmetric_difference() {
        let rules = rules();
        let old = stack(&rules, "a/1/b/2/a/5");
        let new = stack(&rules, "a/1/a/5/b/9");

        let diff = diff_configs(&old, &new);

        assert_eq!(paths(&diff.to_remove), vec!["b/2"]);
        assert_eq!(paths(&diff.to_add), vec!["b/9"]);
        // a/5 is in both stacks but at a different depth
        assert_eq!(diff.common_prefix, 1);
    }

    #[test]
    fn test_matrix_params_change_identity() {
        let rules = rules();
        let diff = diff_configs(&stack(&rules, "a/1"), &stack(&rules, "a/1;pc=1"));

        assert_eq!(diff.to_remove.len(), 1);
        assert_eq!(diff.to_add.len(), 1);
    }
}
