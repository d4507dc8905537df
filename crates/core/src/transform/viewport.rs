//! Viewport rectangle and scroll throttling.

use serde::Serialize;
use tracing::trace;

use crate::matcher::ZOOM_EPSILON;

/// Visible scroll-container size in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

/// Visible region in image-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ViewportRect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl ViewportRect {
    /// Converts scroll offsets and container size (display space) into an
    /// image-space rectangle by dividing through by `zoom`.
    pub fn from_scroll(scroll_top: f64, scroll_left: f64, container: ContainerSize, zoom: f64) -> Self {
        let zoom = zoom.max(ZOOM_EPSILON);
        Self {
            top: scroll_top / zoom,
            left: scroll_left / zoom,
            bottom: (scroll_top + container.height) / zoom,
            right: (scroll_left + container.width) / zoom,
        }
    }

    /// The rectangle grown by `padding` on every side.
    pub fn padded(&self, padding: f64) -> Self {
        Self {
            top: self.top - padding,
            left: self.left - padding,
            bottom: self.bottom + padding,
            right: self.right + padding,
        }
    }
}

/// Decides when scrolling has moved far enough to force a boundary
/// recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTracker {
    last_top: f64,
    last_left: f64,
    threshold: f64,
}

impl ScrollTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            last_top: 0.0,
            last_left: 0.0,
            threshold,
        }
    }

    /// Records a scroll position. Returns true, and re-anchors, when the
    /// distance from the last anchor exceeds the threshold on either axis.
    pub fn observe(&mut self, scroll_top: f64, scroll_left: f64) -> bool {
        let moved = (scroll_top - self.last_top).abs() > self.threshold
            || (scroll_left - self.last_left).abs() > self.threshold;
        trace!(scroll_top, scroll_left, moved, "scroll observed");
        if moved {
            self.last_top = scroll_top;
            self.last_left = scroll_left;
        }
        moved
    }

    /// Re-anchors at the given position without reporting.
    pub fn reset(&mut self, scroll_top: f64, scroll_left: f64) {
        self.last_top = scroll_top;
        self.last_left = scroll_left;
    }
}
