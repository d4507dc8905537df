//! Zoom state.

use crate::params::OverlayParams;

/// Decimal places kept after each zoom step, so repeated steps land on the
/// same values (and the same boundary cache keys).
const ZOOM_PRECISION: f64 = 1e6;

fn snap(value: f64) -> f64 {
    (value * ZOOM_PRECISION).round() / ZOOM_PRECISION
}

/// Current zoom factor, clamped to `[min_zoom, max_zoom]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    level: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl ZoomState {
    pub fn new(params: &OverlayParams) -> Self {
        Self {
            level: params.default_zoom,
            min: params.min_zoom,
            max: params.max_zoom,
            step: params.zoom_step,
        }
    }

    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Sets the zoom, clamping into range. Non-finite values are ignored.
    pub fn set(&mut self, level: f64) -> f64 {
        if level.is_finite() {
            self.level = snap(level.clamp(self.min, self.max));
        }
        self.level
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set(self.level + self.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set(self.level - self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_in_clamps_at_max() {
        let mut zoom = ZoomState::new(&OverlayParams::default());
        for _ in 0..20 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.level(), 2.0);
    }

    #[test]
    fn test_zoom_out_clamps_at_min() {
        let mut zoom = ZoomState::new(&OverlayParams::default());
        for _ in 0..20 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.level(), 0.2);
    }

    #[test]
    fn test_steps_round_trip_exactly() {
        let mut zoom = ZoomState::new(&OverlayParams::default());
        zoom.zoom_in();
        zoom.zoom_in();
        zoom.zoom_out();
        zoom.zoom_out();
        assert_eq!(zoom.level(), 1.0);
        zoom.zoom_in();
        assert_eq!(zoom.level(), 1.1);
    }

    #[test]
    fn test_set_ignores_nan() {
        let mut zoom = ZoomState::new(&OverlayParams::default());
        zoom.set(f64::NAN);
        assert_eq!(zoom.level(), 1.0);
    }
}
