//! # Panel Navigator
//!
//! URL-driven stacked panels. Trailing URL segments after a host route describe
//! an ordered stack of panels (modal dialogs, side sheets, ...), one panel per
//! matched rule:
//!
//! ```text
//! /home/user/2;tab=info/order/7
//!       └──── user ────┘└ order ┘
//! ```
//!
//! The crate provides:
//!
//! - **Segment Matching** - Greedy longest-prefix matching of URL segments against a rule table
//! - **Config Diffing** - Structural comparison of stack configs
//! - **Stack Reconciliation** - Closing, resolving and opening panels so the host matches the URL
//! - **Resolvers** - Async data loading per panel, fail-fast per batch
//! - **Layout** - Depth-based offsets with a single interactive front panel
//! - **Router Glue** - A URL matcher for mounting the panel outlet and navigation-error recovery
//! - **Middleware** - Hooks around panel open and close
//!
//! # Quick Start
//!
//! ```
//! use panel_navigator::*;
//! use futures::future::{self, LocalBoxFuture};
//!
//! struct UserPanel;
//!
//! impl PanelComponent for UserPanel {
//!     fn init_panel(&mut self, data: &PanelData) {
//!         let _name = data.get::<String>("user");
//!     }
//! }
//!
//! struct Router;
//!
//! impl PanelRouter for Router {
//!     fn navigate_by_url(&self, _url: &str) -> LocalBoxFuture<'static, Result<bool, PanelError>> {
//!         Box::pin(future::ready(Ok(true)))
//!     }
//! }
//!
//! let rules = RuleTable::new().rule(
//!     RouteRule::new("user/:id", ComponentRef::new("user", || Box::new(UserPanel)))
//!         .resolve_with("user", |config: &PanelConfig| {
//!             let id = config.params.get("id").cloned().unwrap_or_default();
//!             async move { Ok::<_, String>(format!("user #{}", id)) }
//!         }),
//! );
//!
//! let navigator = PanelNavigator::new(rules, DialogStack::new(), Router, NavigatorSettings::default());
//! navigator.start("/home").unwrap();
//!
//! let outcome = pollster::block_on(navigator.handle_url_change(&parse_segments("user/2"))).unwrap();
//! assert_eq!(outcome.opened(), 1);
//! assert_eq!(navigator.current_url(), "/home/user/2");
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache for segment match results
//! - `middleware` (default) - Panel open/close hooks

#![doc(html_root_url = "https://docs.rs/panel-navigator/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core matching modules
pub mod differ;
pub mod matcher;
pub mod params;
pub mod route;
pub mod segment;

// Error handling
pub mod error;

// Panels and hosting
pub mod dialog;
pub mod host;
pub mod layout;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod panel;

// Controller and router glue
pub mod navigator;
pub mod settings;
pub mod url_matcher;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, MatchCache};
pub use dialog::{DialogEvent, DialogStack};
pub use differ::{common_prefix_len, diff_configs, ConfigDiff};
pub use error::{PanelError, ReconcileOutcome, ResolveError};
pub use host::{OpenPanel, PanelHandle, PanelHost, PanelOffset, PanelPosition};
pub use layout::{panel_position, stack_layout};
pub use matcher::{match_prefix, match_stack, PathPattern, PatternSegment, StackMatch};
#[cfg(feature = "middleware")]
pub use middleware::{middleware_fn, BoxedMiddleware, FnMiddleware, PanelMiddleware};
pub use navigator::{PanelNavigator, PanelRouter, RouterEvent, StackStatus};
pub use panel::{PanelComponent, PanelConfig, PanelData, PanelKey, PanelRoute};
pub use params::PanelParams;
pub use route::{
    resolver_fn, validate_rule_path, ComponentRef, ResolveFuture, ResolvedValue, Resolver,
    RouteRule, RuleTable,
};
pub use segment::{join_url, parse_segments, serialize_segments, UrlSegment};
pub use settings::NavigatorSettings;
pub use url_matcher::UrlMatcher;
