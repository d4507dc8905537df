//! Overlay parameters.
//!
//! Contains OverlayParams, the tunable constants shared by every stage of the
//! engine (axis offsets, zoom limits, matching radius, culling padding).

use crate::error::{OverlayError, Result};

/// How the symbol matcher picks between several candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// The first accepted record in flattening order wins.
    #[default]
    FirstInOrder,
    /// The record whose corner is closest (Chebyshev distance) wins; ties
    /// fall back to flattening order.
    Nearest,
}

/// Parameters for the overlay engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayParams {
    /// Horizontal display offset reserved for the y-axis labels.
    pub y_axis_offset: f64,

    /// Vertical display offset reserved for the x-axis labels.
    pub x_axis_offset: f64,

    /// Zoom level applied to a fresh overlay.
    pub default_zoom: f64,

    /// Lower zoom clamp.
    pub min_zoom: f64,

    /// Upper zoom clamp.
    pub max_zoom: f64,

    /// Increment applied by zoom in/out.
    pub zoom_step: f64,

    /// Margin added on every side of the viewport before culling.
    pub viewport_padding: f64,

    /// Symbol matching radius at zoom 1, in image-space units.
    pub match_radius_base: f64,

    /// Smallest spacing between two axis ticks.
    pub axis_step_min: f64,

    /// Nudge applied to x-axis label positions to center them on the tick.
    pub axis_label_offset: f64,

    /// Nudge applied to y-axis label positions to center them on the tick.
    pub y_label_offset: f64,

    /// Minimum number of usable vertices for a polygon to yield a box.
    pub min_vertices: usize,

    /// Cumulative scroll distance that forces a boundary cache invalidation.
    pub scroll_invalidate_threshold: f64,

    /// Tie-break rule for the symbol matcher.
    pub match_strategy: MatchStrategy,

    /// Node count above which boundary building runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            y_axis_offset: 30.0,
            x_axis_offset: 0.0,
            default_zoom: 1.0,
            min_zoom: 0.2,
            max_zoom: 2.0,
            zoom_step: 0.1,
            viewport_padding: 1000.0,
            match_radius_base: 15.0,
            axis_step_min: 50.0,
            axis_label_offset: 5.0,
            y_label_offset: 7.0,
            min_vertices: 3,
            scroll_invalidate_threshold: 100.0,
            match_strategy: MatchStrategy::FirstInOrder,
            parallel_threshold: 512,
        }
    }
}

impl OverlayParams {
    /// Creates parameters with explicit zoom limits, validating them.
    ///
    /// Every other field takes its default value and can be overwritten
    /// afterwards.
    pub fn new(min_zoom: f64, max_zoom: f64, zoom_step: f64) -> Result<Self> {
        let params = Self {
            min_zoom,
            max_zoom,
            zoom_step,
            default_zoom: 1.0_f64.clamp(min_zoom.min(max_zoom), max_zoom.max(min_zoom)),
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the zoom-related invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(OverlayError::InvalidParams(format!(
                "min_zoom must be a positive number, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(OverlayError::InvalidParams(format!(
                "max_zoom must be >= min_zoom ({}), got {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(OverlayError::InvalidParams(format!(
                "zoom_step must be a positive number, got {}",
                self.zoom_step
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.default_zoom) {
            return Err(OverlayError::InvalidParams(format!(
                "default_zoom {} outside [{}, {}]",
                self.default_zoom, self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }

    /// Display-space offsets applied to every polygon vertex.
    pub const fn axis_offsets(&self) -> (f64, f64) {
        (self.y_axis_offset, self.x_axis_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(OverlayParams::default().validate().is_ok());
    }

    #[test]
    fn test_new_rejects_inverted_zoom_range() {
        let err = OverlayParams::new(2.0, 1.0, 0.1).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidParams(_)));
    }

    #[test]
    fn test_new_rejects_zero_step() {
        assert!(OverlayParams::new(0.5, 1.5, 0.0).is_err());
    }

    #[test]
    fn test_new_clamps_default_zoom_into_range() {
        let params = OverlayParams::new(1.5, 3.0, 0.5).unwrap();
        assert_eq!(params.default_zoom, 1.5);
    }
}
