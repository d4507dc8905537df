//! Coordinate grid: display-space system size and axis tick labels.

use serde::Serialize;

use crate::params::OverlayParams;

/// One tick label on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisLabel {
    /// Display-space position of the label, already nudged onto the tick.
    pub pos: f64,
    /// Image-space coordinate printed on the label.
    pub value: i64,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Display width: image width plus the y-axis label margin.
pub fn system_width(image_width: f64, params: &OverlayParams) -> f64 {
    finite_or_zero(image_width) + params.y_axis_offset
}

/// Display height: image height plus the same axis margin.
pub fn system_height(image_height: f64, params: &OverlayParams) -> f64 {
    finite_or_zero(image_height) + params.y_axis_offset
}

/// Tick spacing for an axis of length `dimension`.
pub fn axis_step(dimension: f64, params: &OverlayParams) -> f64 {
    params.axis_step_min.max((dimension / 10.0).ceil())
}

fn ticks(dimension: f64, params: &OverlayParams) -> impl Iterator<Item = f64> {
    let step = axis_step(dimension, params);
    let count = if dimension > 0.0 && step > 0.0 {
        (dimension / step).floor() as usize + 1
    } else {
        0
    };
    (0..count).map(move |i| i as f64 * step)
}

/// Labels from 0 to `width` inclusive, shifted past the y-axis margin.
pub fn x_axis_labels(width: f64, params: &OverlayParams) -> Vec<AxisLabel> {
    ticks(finite_or_zero(width), params)
        .map(|x| AxisLabel {
            pos: x + params.y_axis_offset - params.axis_label_offset,
            value: x.round() as i64,
        })
        .collect()
}

/// Labels from 0 to `height` inclusive.
pub fn y_axis_labels(height: f64, params: &OverlayParams) -> Vec<AxisLabel> {
    ticks(finite_or_zero(height), params)
        .map(|y| AxisLabel {
            pos: y - params.y_label_offset,
            value: y.round() as i64,
        })
        .collect()
}
