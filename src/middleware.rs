//! Panel middleware
//!
//! Middleware runs around the panel lifecycle: `before_open` sees the fully
//! resolved [`PanelData`] just before the host instantiates the component (the
//! place to attach linkable objects), `after_close` runs once the host has
//! settled the close.
//!
//! # Example
//!
//! ```
//! use panel_navigator::{middleware_fn, PanelConfig, PanelData, PanelMiddleware};
//! use std::rc::Rc;
//!
//! let audit = middleware_fn(
//!     |data: &mut PanelData| {
//!         let url = data.config.route.to_url();
//!         data.add_linkable(Rc::new(url));
//!     },
//!     |_config: &PanelConfig| {},
//! );
//! assert_eq!(audit.name(), "PanelMiddleware");
//! ```

use crate::panel::{PanelConfig, PanelData};

/// Hooks run when panels open and close
pub trait PanelMiddleware {
    /// Called after the panel's resolvers completed, before it is opened
    fn before_open(&self, data: &mut PanelData);

    /// Called after the panel was closed
    fn after_close(&self, _config: &PanelConfig) {}

    /// Middleware name for debugging
    fn name(&self) -> &str {
        "PanelMiddleware"
    }

    /// Middleware priority (higher runs first)
    fn priority(&self) -> i32 {
        0
    }
}

/// Helper to create middleware from closures
pub fn middleware_fn<B, A>(before: B, after: A) -> FnMiddleware<B, A>
where
    B: Fn(&mut PanelData) + 'static,
    A: Fn(&PanelConfig) + 'static,
{
    FnMiddleware { before, after }
}

/// Middleware created from closures
pub struct FnMiddleware<B, A> {
    before: B,
    after: A,
}

impl<B, A> PanelMiddleware for FnMiddleware<B, A>
where
    B: Fn(&mut PanelData) + 'static,
    A: Fn(&PanelConfig) + 'static,
{
    fn before_open(&self, data: &mut PanelData) {
        (self.before)(data);
    }

    fn after_close(&self, config: &PanelConfig) {
        (self.after)(config);
    }
}

/// Type-erased middleware for dynamic dispatch
pub type BoxedMiddleware = Box<dyn PanelMiddleware>;
