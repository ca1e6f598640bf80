//! Route rules and the rule table
//!
//! A [`RouteRule`] maps a path pattern such as `user/:id` to the component that
//! renders the panel, plus optional resolvers whose values must be available
//! before the panel opens. Rules are authored once and shared as `Rc<RouteRule>`;
//! the pointer doubles as the rule's identity when stacks are diffed.

use crate::matcher::PathPattern;
use crate::panel::{PanelComponent, PanelConfig};
use crate::PanelError;
use futures::future::LocalBoxFuture;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Value produced by a resolver
pub type ResolvedValue = Rc<dyn Any>;

/// Future returned by a resolver; the error is a human-readable message
pub type ResolveFuture = LocalBoxFuture<'static, Result<ResolvedValue, String>>;

/// Async data loader attached to a rule
pub type Resolver = Rc<dyn Fn(&PanelConfig) -> ResolveFuture>;

/// Create a resolver from an async function or closure
///
/// # Example
///
/// ```
/// use panel_navigator::{resolver_fn, PanelConfig};
///
/// let load_user = resolver_fn(|config: &PanelConfig| {
///     let id = config.params.get_as::<u64>("id");
///     async move { id.ok_or("missing id") }
/// });
/// # let _ = load_user;
/// ```
pub fn resolver_fn<F, Fut, T, E>(f: F) -> Resolver
where
    F: Fn(&PanelConfig) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
    T: Any,
    E: fmt::Display + 'static,
{
    Rc::new(move |config: &PanelConfig| -> ResolveFuture {
        let pending = f(config);
        Box::pin(async move {
            match pending.await {
                Ok(value) => Ok(Rc::new(value) as ResolvedValue),
                Err(error) => Err(error.to_string()),
            }
        })
    })
}

// ============================================================================
// ComponentRef
// ============================================================================

/// Opaque handle to the component a panel renders
///
/// The host instantiates the component through [`ComponentRef::instantiate`]
/// each time a panel for the rule opens.
#[derive(Clone)]
pub struct ComponentRef {
    name: Rc<str>,
    factory: Rc<dyn Fn() -> Box<dyn PanelComponent>>,
}

impl ComponentRef {
    /// Create a component reference from a name and a factory
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn PanelComponent> + 'static,
    {
        Self {
            name: Rc::from(name.into()),
            factory: Rc::new(factory),
        }
    }

    /// Component name (used in logs and by hosts)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a fresh component instance
    pub fn instantiate(&self) -> Box<dyn PanelComponent> {
        (self.factory)()
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Route Validation
// ============================================================================

/// Validate a rule path pattern
///
/// # Validation Rules
///
/// - Path must contain at least one component
/// - No consecutive slashes (`//`)
/// - Leading and trailing slashes are allowed and ignored
/// - Parameter names must be non-empty and contain only alphanumerics or `_`
/// - No duplicate parameter names
pub fn validate_rule_path(path: &str) -> Result<(), String> {
    if path.trim_matches('/').is_empty() {
        return Err("Rule path must contain at least one segment".to_string());
    }

    if path.contains("//") {
        return Err("Rule path cannot contain consecutive slashes".to_string());
    }

    let mut param_names = HashSet::new();
    for segment in path.split('/') {
        if let Some(param) = segment.strip_prefix(':') {
            if param.is_empty() {
                return Err("Rule parameter name cannot be empty".to_string());
            }

            if !param.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(format!(
                    "Rule parameter '{}' must contain only alphanumeric characters and underscores",
                    param
                ));
            }

            if !param_names.insert(param) {
                return Err(format!("Duplicate rule parameter: '{}'", param));
            }
        }
    }

    Ok(())
}

// ============================================================================
// RouteRule
// ============================================================================

/// A single entry of the rule table
pub struct RouteRule {
    /// Path pattern as authored (e.g. `user/:id`)
    pub path: String,
    /// Component rendered by panels of this rule
    pub component: ComponentRef,
    /// Resolvers, run before the panel opens, in declaration order
    pub resolve: Vec<(String, Resolver)>,
    pattern: PathPattern,
}

impl RouteRule {
    /// Create a rule
    ///
    /// # Panics
    ///
    /// Panics if the path is invalid. Use `try_new` for non-panicking validation.
    pub fn new(path: impl Into<String>, component: ComponentRef) -> Self {
        let path = path.into();
        match Self::try_new(path.clone(), component) {
            Ok(rule) => rule,
            Err(e) => panic!("Invalid rule path '{}': {}", path, e),
        }
    }

    /// Create a rule, returning an error for invalid paths
    pub fn try_new(path: impl Into<String>, component: ComponentRef) -> Result<Self, PanelError> {
        let path = path.into();
        validate_rule_path(&path).map_err(|reason| PanelError::InvalidRulePath {
            path: path.clone(),
            reason,
        })?;
        Ok(Self {
            pattern: PathPattern::from_path(&path),
            path,
            component,
            resolve: Vec::new(),
        })
    }

    /// Attach a resolver under `key`
    pub fn resolve(mut self, key: impl Into<String>, resolver: Resolver) -> Self {
        self.resolve.push((key.into(), resolver));
        self
    }

    /// Attach a resolver built from an async closure
    pub fn resolve_with<F, Fut, T, E>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&PanelConfig) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
        T: Any,
        E: fmt::Display + 'static,
    {
        self.resolve(key, resolver_fn(f))
    }

    /// Parsed pattern
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }
}

impl fmt::Debug for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRule")
            .field("path", &self.path)
            .field("component", &self.component)
            .field(
                "resolve",
                &self.resolve.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// RuleTable
// ============================================================================

/// Ordered list of rules; earlier rules win ties
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rc<RouteRule>>,
}

impl RuleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn rule(mut self, rule: RouteRule) -> Self {
        self.push(rule);
        self
    }

    /// Append a rule, returning the shared handle
    pub fn push(&mut self, rule: RouteRule) -> Rc<RouteRule> {
        let rule = Rc::new(rule);
        self.rules.push(Rc::clone(&rule));
        rule
    }

    /// All rules in table order
    pub fn rules(&self) -> &[Rc<RouteRule>] {
        &self.rules
    }

    /// Iterate over rules in table order
    pub fn iter(&self) -> impl Iterator<Item = &Rc<RouteRule>> {
        self.rules.iter()
    }

    /// Find the first rule with the given path
    pub fn find(&self, path: &str) -> Option<&Rc<RouteRule>> {
        self.rules.iter().find(|rule| rule.path == path)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
