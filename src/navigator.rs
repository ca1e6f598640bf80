//! Panel stack controller
//!
//! [`PanelNavigator`] keeps the host's open panels in step with the URL. On
//! every URL change it recomputes the stack config, compares it with what the
//! host has open, closes everything above the divergence point (top panel
//! first), resolves the data of the new panels as one batch and opens them in
//! order, then re-lays out the whole stack.
//!
//! # Concurrency
//!
//! Everything runs on one thread. Reconciliations may overlap when a caller
//! drives several URL changes at once. Each reconciliation takes a generation
//! stamp; once a newer one starts, the older one closes nothing further and
//! its batch is dropped instead of opened. Panels whose close is still
//! settling count as gone, and new panels open only after every pending close
//! has settled.
//!
//! # Example
//!
//! ```ignore
//! let navigator = PanelNavigator::new(rules, DialogStack::new(), router, NavigatorSettings::default());
//! navigator.start("/home")?;
//! navigator.run(router_events).await;
//! ```

use crate::differ::diff_configs;
use crate::host::{OpenPanel, PanelHandle, PanelHost};
#[cfg(feature = "middleware")]
use crate::middleware::{BoxedMiddleware, PanelMiddleware};
use crate::panel::{PanelConfig, PanelData};
use crate::route::RuleTable;
use crate::segment::{join_url, parse_segments, serialize_segments};
use crate::url_matcher::UrlMatcher;
use crate::layout::stack_layout;
use crate::{
    debug_log, error_log, info_log, trace_log, warn_log, NavigatorSettings, PanelError,
    ReconcileOutcome, ResolveError, UrlSegment,
};
use futures::future::{join_all, try_join_all, FutureExt, LocalBoxFuture, Shared};
use futures::{Stream, StreamExt};
use std::cell::RefCell;
use std::pin::pin;

/// Router collaborator
pub trait PanelRouter {
    /// Navigate to an absolute URL.
    ///
    /// Resolves to `Ok(false)` when the router ignored the navigation.
    fn navigate_by_url(&self, url: &str) -> LocalBoxFuture<'static, Result<bool, PanelError>>;
}

/// Input events consumed by [`PanelNavigator::run`]
#[derive(Debug, Clone, PartialEq)]
pub enum RouterEvent {
    /// The panel outlet's segments changed
    UrlChanged(Vec<UrlSegment>),
    /// The router failed to navigate to `url`
    NavigationError { url: String },
    /// The breakpoint observer switched orientation
    ViewportChanged { narrow: bool },
}

/// Reconciliation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackStatus {
    /// No panel is open
    Idle,
    /// Closes/opens are in flight
    Reconciling,
    /// The open panels match the URL
    Stable,
}

#[derive(Debug)]
struct NavigatorState {
    started: bool,
    base_url: String,
    status: StackStatus,
    stack_config: Vec<PanelConfig>,
    generation: u64,
    counter: u64,
    narrow: bool,
}

impl Default for NavigatorState {
    fn default() -> Self {
        Self {
            started: false,
            base_url: "/".to_string(),
            status: StackStatus::Idle,
            stack_config: Vec::new(),
            generation: 0,
            counter: 0,
            narrow: false,
        }
    }
}

/// Drives a [`PanelHost`] from URL changes
pub struct PanelNavigator<H, R> {
    matcher: UrlMatcher,
    host: H,
    router: R,
    settings: NavigatorSettings,
    state: RefCell<NavigatorState>,
    closing: RefCell<Vec<(PanelHandle, Shared<LocalBoxFuture<'static, ()>>)>>,
    #[cfg(feature = "middleware")]
    middleware: Vec<BoxedMiddleware>,
}

impl<H: PanelHost, R: PanelRouter> PanelNavigator<H, R> {
    /// Create a stopped navigator
    pub fn new(rules: RuleTable, host: H, router: R, settings: NavigatorSettings) -> Self {
        Self {
            matcher: UrlMatcher::with_cache_capacity(rules, settings.cache_capacity),
            host,
            router,
            settings,
            state: RefCell::new(NavigatorState::default()),
            closing: RefCell::new(Vec::new()),
            #[cfg(feature = "middleware")]
            middleware: Vec::new(),
        }
    }

    /// Register middleware; higher priority runs first
    #[cfg(feature = "middleware")]
    pub fn with_middleware(mut self, middleware: impl PanelMiddleware + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self.middleware
            .sort_by_key(|m| std::cmp::Reverse(m.priority()));
        self
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Activate the navigator under the host route `base_url`
    pub fn start(&self, base_url: impl Into<String>) -> Result<(), PanelError> {
        if self.matcher.rules().is_empty() {
            error_log!("panel navigator started without any rules");
            return Err(PanelError::misconfigured(
                "the rule table is empty; add at least one RouteRule",
            ));
        }

        let base_url = base_url.into();
        info_log!("panel navigator started under '{}'", base_url);
        let mut state = self.state.borrow_mut();
        state.started = true;
        state.base_url = base_url;
        Ok(())
    }

    /// Close every panel, forget the cached stack and deactivate
    pub async fn stop(&self) {
        info_log!("panel navigator stopping");
        // outstanding reconciliations must neither close nor open after a stop
        self.next_generation();

        let open = self.live_stack();
        self.host.close_all().await;
        self.settle_closes().await;
        for panel in &open {
            self.after_close(&panel.config);
        }

        self.matcher.clear_cache();
        let mut state = self.state.borrow_mut();
        state.started = false;
        state.stack_config.clear();
        state.status = StackStatus::Idle;
    }

    /// Whether `start` has been called (and `stop` has not)
    pub fn is_started(&self) -> bool {
        self.state.borrow().started
    }

    /// Current reconciliation status
    pub fn status(&self) -> StackStatus {
        self.state.borrow().status
    }

    /// Most recently computed stack config
    pub fn stack_config(&self) -> Vec<PanelConfig> {
        self.state.borrow().stack_config.clone()
    }

    /// Panels open in the host, bottom first, minus those still closing
    pub fn open_panels(&self) -> Vec<OpenPanel> {
        self.live_stack()
    }

    /// URL of the current stack config
    pub fn current_url(&self) -> String {
        let state = self.state.borrow();
        let segments: Vec<UrlSegment> = state
            .stack_config
            .iter()
            .flat_map(|config| config.route.segments.iter().cloned())
            .collect();
        join_url(&state.base_url, &serialize_segments(&segments)).into_owned()
    }

    /// The dialog host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The router collaborator
    pub fn router(&self) -> &R {
        &self.router
    }

    /// The URL matcher (for mounting the panel outlet)
    pub fn url_matcher(&self) -> &UrlMatcher {
        &self.matcher
    }

    /// Settings in use
    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    /// Match cache statistics
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> crate::CacheStats {
        self.matcher.cache_stats()
    }

    // ------------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------------

    /// Consume router events in order until the stream ends
    ///
    /// Errors are logged and do not stop the loop.
    pub async fn run<S>(&self, events: S)
    where
        S: Stream<Item = RouterEvent>,
    {
        let mut events = pin!(events);
        while let Some(event) = events.next().await {
            let result = match event {
                RouterEvent::UrlChanged(segments) => {
                    self.handle_url_change(&segments).await.map(|_| ())
                }
                RouterEvent::NavigationError { url } => self.handle_navigation_error(&url).await,
                RouterEvent::ViewportChanged { narrow } => {
                    self.set_narrow_viewport(narrow);
                    Ok(())
                }
            };

            if let Err(e) = result {
                error_log!("panel event failed: {}", e);
            }
        }
        debug_log!("router event stream ended");
    }

    /// Switch layout orientation and re-lay out the stack
    pub fn set_narrow_viewport(&self, narrow: bool) {
        self.state.borrow_mut().narrow = narrow;
        self.reposition();
    }

    // ------------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------------

    /// Bring the host's open panels in line with `segments`
    ///
    /// `segments` are the URL segments after the host route.
    pub async fn handle_url_change(
        &self,
        segments: &[UrlSegment],
    ) -> Result<ReconcileOutcome, PanelError> {
        self.ensure_started()?;

        let desired = self.matcher.stack_for(segments);
        let generation = self.next_generation();
        self.state.borrow_mut().stack_config = desired.clone();

        let current: Vec<PanelConfig> = self
            .live_stack()
            .into_iter()
            .map(|panel| panel.config)
            .collect();
        let diff = diff_configs(&current, &desired);
        let keep = diff.common_prefix;

        if keep == current.len() && keep == desired.len() {
            trace_log!("stack unchanged ({} panel(s))", keep);
            self.reposition();
            self.settle_status();
            return Ok(ReconcileOutcome::Unchanged);
        }

        debug_log!(
            "reconciling: {} open, {} desired, divergence at {:?}, -{} +{}",
            current.len(),
            desired.len(),
            diff.divergence_point(),
            diff.to_remove.len(),
            diff.to_add.len()
        );
        self.set_status(StackStatus::Reconciling);

        let closed = match self.close_from(keep, generation).await {
            Ok(closed) if self.is_current(generation) => closed,
            Ok(closed) | Err(closed) => {
                debug_log!("reconciliation {} superseded while closing", generation);
                return Ok(ReconcileOutcome::Discarded { closed });
            }
        };

        let to_open = &desired[keep..];
        if to_open.is_empty() {
            self.reposition();
            self.settle_status();
            return Ok(ReconcileOutcome::Changed { closed, opened: 0 });
        }

        let batch = match resolve_batch(to_open).await {
            Ok(batch) => batch,
            Err(e) => {
                error_log!("not opening {} panel(s): {}", to_open.len(), e);
                if self.is_current(generation) {
                    self.reposition();
                    self.settle_status();
                }
                return Err(e.into());
            }
        };

        self.settle_closes().await;

        if !self.is_current(generation) {
            warn_log!(
                "discarding stale batch of {} panel(s) (generation {})",
                batch.len(),
                generation
            );
            return Ok(ReconcileOutcome::Discarded { closed });
        }

        let opened = batch.len();
        for data in batch {
            self.open_panel(data);
        }

        self.reposition();
        self.settle_status();
        Ok(ReconcileOutcome::Changed { closed, opened })
    }

    /// Bring panel `index` to the front by closing everything above it
    ///
    /// Afterwards the router is asked to trim the URL accordingly; the
    /// resulting URL change finds nothing left to do.
    pub async fn select(&self, index: usize) -> Result<ReconcileOutcome, PanelError> {
        self.ensure_started()?;

        let len = self.live_stack().len();
        if index >= len {
            return Err(PanelError::IndexOutOfRange { index, len });
        }

        debug_log!("selecting panel {} of {}", index, len);
        let generation = self.next_generation();
        let closed = match self.close_from(index + 1, generation).await {
            Ok(closed) if self.is_current(generation) => closed,
            Ok(closed) | Err(closed) => {
                debug_log!("selection of panel {} superseded", index);
                return Ok(ReconcileOutcome::Discarded { closed });
            }
        };
        self.reposition();
        self.settle_status();

        let kept: Vec<PanelConfig> = self
            .live_stack()
            .into_iter()
            .take(index + 1)
            .map(|panel| panel.config)
            .collect();
        self.state.borrow_mut().stack_config = kept;
        let url = self.current_url();
        self.navigate(&url).await?;

        Ok(ReconcileOutcome::Changed { closed, opened: 0 })
    }

    /// Recover from a failed router navigation
    ///
    /// A URL ending in `/`, or one that is not entirely made of panels, is
    /// unrecoverable: the navigator stops and the router is sent to the
    /// invalid route. Otherwise the failed URL is treated as panels to push on
    /// top of the current stack, tagged with a fresh counter parameter.
    pub async fn handle_navigation_error(&self, failed_url: &str) -> Result<(), PanelError> {
        self.ensure_started()?;

        let failed = parse_segments(failed_url);
        if failed_url.ends_with('/') || !self.matcher.is_complete_stack(&failed) {
            warn_log!("reached invalid url '{}'", failed_url);
            return self.fail_to_invalid_route().await;
        }

        let mut appended = failed;
        let counter = {
            let mut state = self.state.borrow_mut();
            state.counter += 1;
            state.counter
        };
        if let Some(last) = appended.last_mut() {
            last.params
                .insert(self.settings.counter_param.clone(), counter.to_string());
        }

        let current = self.current_url();
        let target = join_url(&current, &serialize_segments(&appended)).into_owned();
        info_log!(
            "navigation to '{}' failed; retrying as appended panel(s) '{}'",
            failed_url,
            target
        );
        self.navigate(&target).await.map(|_| ())
    }

    async fn fail_to_invalid_route(&self) -> Result<(), PanelError> {
        self.stop().await;
        let invalid = self.settings.invalid_route.clone();
        self.navigate(&invalid).await.map(|_| ())
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn ensure_started(&self) -> Result<(), PanelError> {
        if self.is_started() {
            Ok(())
        } else {
            error_log!("panel navigator used before start()");
            Err(PanelError::NotStarted)
        }
    }

    async fn navigate(&self, url: &str) -> Result<bool, PanelError> {
        debug_log!("navigating to '{}'", url);
        match self.router.navigate_by_url(url).await {
            Ok(done) => Ok(done),
            Err(e) => {
                error_log!("router rejected '{}': {}", url, e);
                Err(e)
            }
        }
    }

    fn next_generation(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        state.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation == generation
    }

    /// Host stack without the panels whose close has not settled yet
    fn live_stack(&self) -> Vec<OpenPanel> {
        let closing = self.closing.borrow();
        self.host
            .stack()
            .into_iter()
            .filter(|panel| !closing.iter().any(|(handle, _)| *handle == panel.handle))
            .collect()
    }

    /// Close live panels `index..` top-down, each close settling before the next
    ///
    /// Stops as soon as `generation` is superseded; `Err` carries the number
    /// of panels closed up to that point.
    async fn close_from(&self, index: usize, generation: u64) -> Result<usize, usize> {
        let doomed: Vec<OpenPanel> = self.live_stack().into_iter().skip(index).collect();

        let mut closed = 0;
        for panel in doomed.iter().rev() {
            if !self.is_current(generation) {
                return Err(closed);
            }

            debug_log!("closing panel '{}'", panel.config.route.to_url());
            let settled = self.host.close(panel.handle).shared();
            self.closing
                .borrow_mut()
                .push((panel.handle, settled.clone()));
            settled.await;
            self.closing
                .borrow_mut()
                .retain(|(handle, _)| *handle != panel.handle);

            self.after_close(&panel.config);
            closed += 1;
        }

        Ok(closed)
    }

    /// Wait until every close in flight, whoever started it, has settled
    async fn settle_closes(&self) {
        let pending: Vec<_> = self
            .closing
            .borrow()
            .iter()
            .map(|(_, settled)| settled.clone())
            .collect();
        if !pending.is_empty() {
            trace_log!("waiting for {} close(s) to settle", pending.len());
            join_all(pending).await;
        }
    }

    fn open_panel(&self, data: PanelData) {
        #[cfg(feature = "middleware")]
        let data = {
            let mut data = data;
            for middleware in &self.middleware {
                trace_log!("middleware '{}' before_open", middleware.name());
                middleware.before_open(&mut data);
            }
            data
        };

        let component = data.config.component.clone();
        let handle = self.host.open(&component, data);
        debug_log!(
            "opened panel {} with component '{}'",
            handle.id(),
            component.name()
        );
    }

    fn after_close(&self, config: &PanelConfig) {
        #[cfg(feature = "middleware")]
        for middleware in &self.middleware {
            middleware.after_close(config);
        }
        #[cfg(not(feature = "middleware"))]
        let _ = config;
    }

    fn reposition(&self) {
        let narrow = self.state.borrow().narrow;
        let open = self.live_stack();
        let layout = stack_layout(open.len(), narrow, &self.settings);
        for (panel, position) in open.iter().zip(layout) {
            self.host.reposition(panel.handle, position);
        }
    }

    fn set_status(&self, status: StackStatus) {
        self.state.borrow_mut().status = status;
    }

    fn settle_status(&self) {
        let status = if self.live_stack().is_empty() {
            StackStatus::Idle
        } else {
            StackStatus::Stable
        };
        self.set_status(status);
    }
}

/// Run every resolver of every config; all must succeed
async fn resolve_batch(configs: &[PanelConfig]) -> Result<Vec<PanelData>, ResolveError> {
    try_join_all(configs.iter().cloned().map(resolve_panel)).await
}

async fn resolve_panel(config: PanelConfig) -> Result<PanelData, ResolveError> {
    let pending: Vec<_> = config
        .resolve
        .iter()
        .map(|(key, resolver)| {
            let key = key.clone();
            let value = resolver(&config);
            async move {
                match value.await {
                    Ok(value) => Ok((key, value)),
                    Err(message) => Err(ResolveError::new(key, message)),
                }
            }
        })
        .collect();

    let values = try_join_all(pending).await?;
    Ok(PanelData::new(config, values))
}
