//! Panel host contract
//!
//! The navigator never renders anything itself. It drives a [`PanelHost`]
//! (typically a modal/dialog service of the UI toolkit) which owns the actual
//! panel instances. The host's open list is the single source of truth for the
//! current stack order.

use crate::panel::{PanelConfig, PanelData};
use crate::route::ComponentRef;
use futures::future::LocalBoxFuture;

/// Identifier of an open panel, issued by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelHandle(u64);

impl PanelHandle {
    /// Wrap a raw host identifier
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Shift applied to a panel behind the front one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelOffset {
    /// Wide viewports: panels step sideways
    Horizontal(f32),
    /// Narrow viewports: panels step downwards
    Vertical(f32),
}

impl PanelOffset {
    /// Offset magnitude regardless of orientation
    pub fn amount(self) -> f32 {
        match self {
            PanelOffset::Horizontal(v) | PanelOffset::Vertical(v) => v,
        }
    }
}

/// Layout of a single open panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPosition {
    /// Only the top panel is interactive
    pub front: bool,
    /// Depth-dependent shift
    pub offset: PanelOffset,
}

/// A panel as currently held by the host
#[derive(Debug, Clone)]
pub struct OpenPanel {
    /// Host handle
    pub handle: PanelHandle,
    /// Config the panel was opened for
    pub config: PanelConfig,
}

/// Dialog host driven by the navigator
///
/// Hosts are used from a single UI thread; methods take `&self` and
/// implementations use interior mutability.
pub trait PanelHost {
    /// Instantiate `component`, hand it `data` through
    /// [`PanelComponent::init_panel`](crate::PanelComponent::init_panel) and
    /// push it on top of the stack.
    ///
    /// The handle must be usable for `reposition` immediately, even if the
    /// open animation is still running.
    fn open(&self, component: &ComponentRef, data: PanelData) -> PanelHandle;

    /// Close a panel; resolves once it has fully settled.
    ///
    /// Closing an unknown or already closed handle is a no-op.
    fn close(&self, handle: PanelHandle) -> LocalBoxFuture<'static, ()>;

    /// Close every open panel; resolves once all of them have settled
    fn close_all(&self) -> LocalBoxFuture<'static, ()>;

    /// Apply layout to an open panel
    fn reposition(&self, handle: PanelHandle, position: PanelPosition);

    /// Open panels, bottom first
    fn stack(&self) -> Vec<OpenPanel>;

    /// Resolves the next time the stack becomes empty (immediately if it is)
    fn all_closed(&self) -> LocalBoxFuture<'static, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_roundtrip() {
        let handle = PanelHandle::new(7);
        assert_eq!(handle.id(), 7);
        assert!(PanelHandle::new(1) < PanelHandle::new(2));
    }

    #[test]
    fn test_offset_amount() {
        assert_eq!(PanelOffset::Horizontal(40.0).amount(), 40.0);
        assert_eq!(PanelOffset::Vertical(12.0).amount(), 12.0);
    }
}
