//! Panel configuration and runtime data

use crate::route::{ComponentRef, ResolvedValue, Resolver, RouteRule};
use crate::segment::serialize_segments;
use crate::{PanelParams, UrlSegment};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Component instantiated by the host for an open panel
///
/// `init_panel` runs exactly once, after every resolver of the panel's batch has
/// completed and before the panel becomes visible.
pub trait PanelComponent {
    /// Receive the resolved panel data
    fn init_panel(&mut self, data: &PanelData);

    /// Component name (for debugging)
    fn name(&self) -> &str {
        "PanelComponent"
    }
}

/// The URL slice a panel was matched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRoute {
    /// Consumed segments, matrix parameters included
    pub segments: Vec<UrlSegment>,
    /// Segment path tokens joined with `/`
    pub path: String,
}

impl PanelRoute {
    /// Build a route from its segments
    pub fn new(segments: Vec<UrlSegment>) -> Self {
        let path = segments
            .iter()
            .map(|s| s.path.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Self { segments, path }
    }

    /// The slice serialised back to URL form (matrix parameters included)
    pub fn to_url(&self) -> String {
        serialize_segments(&self.segments)
    }
}

/// Structural identity of a panel config
///
/// Two configs are "the same panel" iff the rule path, the rule itself (by
/// pointer) and the parameters all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanelKey {
    /// Rule path pattern
    pub path: String,
    rule: usize,
    /// Named and matrix parameters
    pub params: PanelParams,
}

/// One matched entry of a stack config
#[derive(Clone)]
pub struct PanelConfig {
    /// Component to open
    pub component: ComponentRef,
    /// Rule that matched
    pub rule: Rc<RouteRule>,
    /// Named captures merged over matrix parameters
    pub params: PanelParams,
    /// Matched URL slice
    pub route: PanelRoute,
    /// Resolvers copied from the rule
    pub resolve: Vec<(String, Resolver)>,
}

impl PanelConfig {
    /// Create a config for `rule` matched against `segments`
    pub fn new(rule: Rc<RouteRule>, segments: Vec<UrlSegment>, params: PanelParams) -> Self {
        Self {
            component: rule.component.clone(),
            resolve: rule.resolve.clone(),
            route: PanelRoute::new(segments),
            params,
            rule,
        }
    }

    /// Structural identity used for diffing
    pub fn key(&self) -> PanelKey {
        PanelKey {
            path: self.rule.path.clone(),
            rule: Rc::as_ptr(&self.rule) as *const () as usize,
            params: self.params.clone(),
        }
    }

    /// Check structural equality with another config
    pub fn same_panel(&self, other: &PanelConfig) -> bool {
        Rc::ptr_eq(&self.rule, &other.rule)
            && self.rule.path == other.rule.path
            && self.params == other.params
    }
}

impl fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelConfig")
            .field("rule", &self.rule.path)
            .field("component", &self.component.name())
            .field("params", &self.params)
            .field("route", &self.route.path)
            .finish_non_exhaustive()
    }
}

/// Runtime data handed to an open panel
#[derive(Clone)]
pub struct PanelData {
    /// Config the panel was opened for
    pub config: PanelConfig,
    data: HashMap<String, ResolvedValue>,
    linkable_objects: Vec<ResolvedValue>,
}

impl PanelData {
    /// Bundle a config with its resolved values
    pub fn new(config: PanelConfig, values: impl IntoIterator<Item = (String, ResolvedValue)>) -> Self {
        Self {
            config,
            data: values.into_iter().collect(),
            linkable_objects: Vec::new(),
        }
    }

    /// Typed access to a resolved value
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.data.get(key)?.downcast_ref::<T>()
    }

    /// Untyped access to a resolved value
    pub fn value(&self, key: &str) -> Option<&ResolvedValue> {
        self.data.get(key)
    }

    /// Check if a resolver produced `key`
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Resolved keys
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Attach an object other panels may link to
    pub fn add_linkable(&mut self, object: ResolvedValue) {
        self.linkable_objects.push(object);
    }

    /// Objects attached with `add_linkable`
    pub fn linkable_objects(&self) -> &[ResolvedValue] {
        &self.linkable_objects
    }

    /// Shortcut for `config.params`
    pub fn params(&self) -> &PanelParams {
        &self.config.params
    }
}

impl fmt::Debug for PanelData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.data.keys().collect();
        keys.sort();
        f.debug_struct("PanelData")
            .field("config", &self.config)
            .field("data", &keys)
            .field("linkable_objects", &self.linkable_objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;

    impl PanelComponent for Blank {
        fn init_panel(&mut self, _data: &PanelData) {}
    }

    fn rule(path: &str) -> Rc<RouteRule> {
        Rc::new(RouteRule::new(
            path,
            ComponentRef::new("blank", || Box::new(Blank)),
        ))
    }

    fn config(rule: &Rc<RouteRule>, id: &str) -> PanelConfig {
        PanelConfig::new(
            Rc::clone(rule),
            vec![UrlSegment::new("user"), UrlSegment::new(id)],
            PanelParams::new().with("id", id),
        )
    }

    #[test]
    fn test_route_path_and_url() {
        let route = PanelRoute::new(vec![
            UrlSegment::new("user"),
            UrlSegment::new("2").with_param("pc", "1"),
        ]);
        assert_eq!(route.path, "user/2");
        assert_eq!(route.to_url(), "user/2;pc=1");
    }

    #[test]
    fn test_key_is_structural() {
        let user = rule("user/:id");
        let a = config(&user, "2");
        let b = config(&user, "2");

        assert_eq!(a.key(), b.key());
        assert!(a.same_panel(&b));
        assert!(!a.same_panel(&config(&user, "3")));
    }

    #[test]
    fn test_key_distinguishes_rules_with_same_path() {
        let first = rule("user/:id");
        let second = rule("user/:id");

        assert_ne!(config(&first, "2").key(), config(&second, "2").key());
        assert!(!config(&first, "2").same_panel(&config(&second, "2")));
    }

    #[test]
    fn test_panel_data_access() {
        let user = rule("user/:id");
        let mut data = PanelData::new(
            config(&user, "5"),
            vec![("name".to_string(), Rc::new("Ada".to_string()) as ResolvedValue)],
        );

        assert_eq!(data.get::<String>("name").map(String::as_str), Some("Ada"));
        assert_eq!(data.get::<u64>("name"), None);
        assert!(data.contains("name"));
        assert!(data.value("missing").is_none());
        assert_eq!(data.params().get("id"), Some(&"5".to_string()));

        data.add_linkable(Rc::new(42_u32));
        assert_eq!(data.linkable_objects().len(), 1);
    }
}
