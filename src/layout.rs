//! Stack layout
//!
//! Positions are a pure function of stack length, index and viewport
//! orientation, recomputed for the whole stack after every change.

use crate::host::{PanelOffset, PanelPosition};
use crate::NavigatorSettings;

/// Position of the panel at `index` in a stack of `len`
pub fn panel_position(
    index: usize,
    len: usize,
    narrow: bool,
    settings: &NavigatorSettings,
) -> PanelPosition {
    let depth = len.saturating_sub(index + 1) as f32;
    let offset = if narrow {
        PanelOffset::Vertical(depth * settings.vertical_step)
    } else {
        PanelOffset::Horizontal(depth * settings.horizontal_step)
    };

    PanelPosition {
        front: index + 1 == len,
        offset,
    }
}

/// Positions for a whole stack, bottom first
pub fn stack_layout(len: usize, narrow: bool, settings: &NavigatorSettings) -> Vec<PanelPosition> {
    (0..len)
        .map(|index| panel_position(index, len, narrow, settings))
        .collect()
}
