//! Viewport tuning.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Zoom behaviour of the [`ViewportController`](crate::ViewportController).
///
/// Zoom limits are relative to the fit scale, so they mean the same thing
/// for every window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Multiplicative step per wheel event. Zoom-in multiplies by it,
    /// zoom-out divides, so one of each restores the scale exactly.
    pub zoom_step: f64,
    /// Smallest scale as a multiple of the fit scale.
    pub min_zoom: f64,
    /// Largest scale as a multiple of the fit scale.
    pub max_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.1,
            min_zoom: 0.25,
            max_zoom: 32.0,
        }
    }
}

impl ViewportConfig {
    /// Fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`ViewportController::new`]. Rules:
    /// - `zoom_step` must be finite and `> 1.0`, else the default.
    /// - `min_zoom` must be finite and `> 0.0`, else the default.
    /// - `max_zoom` is raised to `min_zoom` if below it.
    ///
    /// [`ViewportController::new`]: crate::ViewportController::new
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            warn!(zoom_step = self.zoom_step, "zoom_step must be > 1.0, using default");
            self.zoom_step = defaults.zoom_step;
        }
        if !self.min_zoom.is_finite() || self.min_zoom <= 0.0 {
            warn!(min_zoom = self.min_zoom, "min_zoom must be > 0.0, using default");
            self.min_zoom = defaults.min_zoom;
        }
        if !self.max_zoom.is_finite() {
            warn!(max_zoom = self.max_zoom, "max_zoom must be finite, using default");
            self.max_zoom = defaults.max_zoom.max(self.min_zoom);
        } else if self.max_zoom < self.min_zoom {
            warn!(
                max_zoom = self.max_zoom,
                min_zoom = self.min_zoom,
                "max_zoom below min_zoom, clamping"
            );
            self.max_zoom = self.min_zoom;
        }
        self
    }
}
