//! In-memory dialog host
//!
//! [`DialogStack`] is a complete [`PanelHost`] that keeps panels in a plain
//! LIFO list. UI integrations can wrap it (forwarding positions to real modal
//! windows). A stack built with [`DialogStack::recording`] also keeps a log of
//! every open and close, which tests use to observe what the navigator did.
//!
//! # Invariants
//!
//! - Handles are unique and increasing for the lifetime of the stack.
//! - `close` of an unknown handle does nothing.
//! - `all_closed` waiters are released the moment the stack becomes empty.

use crate::host::{OpenPanel, PanelHandle, PanelHost, PanelPosition};
use crate::panel::{PanelComponent, PanelData};
use crate::route::ComponentRef;
use crate::trace_log;
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Something that happened to the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// A panel was opened
    Opened {
        /// Handle issued
        handle: PanelHandle,
        /// Component name
        component: String,
        /// Matched URL slice of the panel
        url: String,
    },
    /// A panel was closed
    Closed {
        /// Handle closed
        handle: PanelHandle,
        /// Matched URL slice of the panel
        url: String,
    },
}

struct Dialog {
    handle: PanelHandle,
    data: PanelData,
    // kept alive for as long as the dialog is open
    _component: Box<dyn PanelComponent>,
    position: Option<PanelPosition>,
}

#[derive(Default)]
struct DialogStackInner {
    recording: bool,
    next_id: u64,
    dialogs: Vec<Dialog>,
    events: Vec<DialogEvent>,
    waiters: Vec<oneshot::Sender<()>>,
}

impl DialogStackInner {
    fn remove(&mut self, handle: PanelHandle) -> Vec<oneshot::Sender<()>> {
        let Some(index) = self.dialogs.iter().position(|d| d.handle == handle) else {
            return Vec::new();
        };

        let dialog = self.dialogs.remove(index);
        trace_log!("dialog {} closed", handle.id());
        self.record(|| DialogEvent::Closed {
            handle,
            url: dialog.data.config.route.to_url(),
        });

        if self.dialogs.is_empty() {
            std::mem::take(&mut self.waiters)
        } else {
            Vec::new()
        }
    }

    fn record(&mut self, event: impl FnOnce() -> DialogEvent) {
        if self.recording {
            self.events.push(event());
        }
    }
}

/// LIFO stack of open panels
///
/// Cloning yields another handle to the same stack.
#[derive(Clone, Default)]
pub struct DialogStack {
    inner: Rc<RefCell<DialogStackInner>>,
}

impl DialogStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack that logs every open and close
    ///
    /// The log grows until [`clear_events`](Self::clear_events) is called.
    pub fn recording() -> Self {
        let stack = Self::default();
        stack.inner.borrow_mut().recording = true;
        stack
    }

    /// Number of open panels
    pub fn len(&self) -> usize {
        self.inner.borrow().dialogs.len()
    }

    /// Check if no panel is open
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().dialogs.is_empty()
    }

    /// Handle of the top (interactive) panel
    pub fn front(&self) -> Option<PanelHandle> {
        self.inner.borrow().dialogs.last().map(|d| d.handle)
    }

    /// Last position applied to `handle`
    pub fn position(&self, handle: PanelHandle) -> Option<PanelPosition> {
        self.inner
            .borrow()
            .dialogs
            .iter()
            .find(|d| d.handle == handle)
            .and_then(|d| d.position)
    }

    /// Data the panel was opened with
    pub fn data(&self, handle: PanelHandle) -> Option<PanelData> {
        self.inner
            .borrow()
            .dialogs
            .iter()
            .find(|d| d.handle == handle)
            .map(|d| d.data.clone())
    }

    /// URL slices of the open panels, bottom first
    pub fn urls(&self) -> Vec<String> {
        self.inner
            .borrow()
            .dialogs
            .iter()
            .map(|d| d.data.config.route.to_url())
            .collect()
    }

    /// Every open/close since creation, oldest first
    ///
    /// Always empty unless the stack was created with [`recording`](Self::recording).
    pub fn events(&self) -> Vec<DialogEvent> {
        self.inner.borrow().events.clone()
    }

    /// Forget recorded events
    pub fn clear_events(&self) {
        self.inner.borrow_mut().events.clear();
    }
}

impl fmt::Debug for DialogStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogStack")
            .field("open", &self.urls())
            .finish_non_exhaustive()
    }
}

fn release(waiters: Vec<oneshot::Sender<()>>) {
    for waiter in waiters {
        let _ = waiter.send(());
    }
}

impl PanelHost for DialogStack {
    fn open(&self, component: &ComponentRef, data: PanelData) -> PanelHandle {
        // instantiate outside the borrow so init_panel may query the stack
        let mut instance = component.instantiate();
        instance.init_panel(&data);

        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let handle = PanelHandle::new(inner.next_id);
        trace_log!("dialog {} opened for '{}'", handle.id(), component.name());
        inner.record(|| DialogEvent::Opened {
            handle,
            component: component.name().to_string(),
            url: data.config.route.to_url(),
        });
        inner.dialogs.push(Dialog {
            handle,
            data,
            _component: instance,
            position: None,
        });
        handle
    }

    fn close(&self, handle: PanelHandle) -> LocalBoxFuture<'static, ()> {
        let waiters = self.inner.borrow_mut().remove(handle);
        release(waiters);
        Box::pin(future::ready(()))
    }

    fn close_all(&self) -> LocalBoxFuture<'static, ()> {
        let handles: Vec<PanelHandle> = self
            .inner
            .borrow()
            .dialogs
            .iter()
            .rev()
            .map(|d| d.handle)
            .collect();

        for handle in handles {
            let waiters = self.inner.borrow_mut().remove(handle);
            release(waiters);
        }
        Box::pin(future::ready(()))
    }

    fn reposition(&self, handle: PanelHandle, position: PanelPosition) {
        let mut inner = self.inner.borrow_mut();
        if let Some(dialog) = inner.dialogs.iter_mut().find(|d| d.handle == handle) {
            dialog.position = Some(position);
        }
    }

    fn stack(&self) -> Vec<OpenPanel> {
        self.inner
            .borrow()
            .dialogs
            .iter()
            .map(|d| OpenPanel {
                handle: d.handle,
                config: d.data.config.clone(),
            })
            .collect()
    }

    fn all_closed(&self) -> LocalBoxFuture<'static, ()> {
        let mut inner = self.inner.borrow_mut();
        if inner.dialogs.is_empty() {
            return Box::pin(future::ready(()));
        }

        let (tx, rx) = oneshot::channel();
        inner.waiters.push(tx);
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}
