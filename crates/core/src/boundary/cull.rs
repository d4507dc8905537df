//! Viewport culling.

use serde::Serialize;

use super::build::Boundary;
use crate::geometry::HasBox;
use crate::transform::ViewportRect;

/// A boundary that survived culling, with its position in the full list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleBoundary<'a> {
    pub original_index: usize,
    #[serde(flatten)]
    pub boundary: &'a Boundary,
}

/// True unless the box, shifted right by `y_axis_offset`, lies entirely
/// outside the viewport grown by `padding`.
pub fn is_in_viewport<B: HasBox + ?Sized>(
    b: &B,
    viewport: &ViewportRect,
    padding: f64,
    y_axis_offset: f64,
) -> bool {
    let v = viewport.padded(padding);
    !(b.right() + y_axis_offset < v.left
        || b.x() + y_axis_offset > v.right
        || b.bottom() < v.top
        || b.y() > v.bottom)
}

/// Boundaries overlapping the padded viewport, in list order.
pub fn visible_boundaries<'a>(
    boundaries: &'a [Boundary],
    viewport: &ViewportRect,
    padding: f64,
    y_axis_offset: f64,
) -> Vec<VisibleBoundary<'a>> {
    boundaries
        .iter()
        .enumerate()
        .filter(|(_, b)| is_in_viewport(*b, viewport, padding, y_axis_offset))
        .map(|(original_index, boundary)| VisibleBoundary {
            original_index,
            boundary,
        })
        .collect()
}
