//! Pointer and wheel handling.
//!
//! The controller owns the only mutable [`ViewportTransform`]. Renderers
//! read it; scene content never depends on it.

use tracing::{debug, trace};

use crate::{Point, ViewportConfig, ViewportTransform};

/// Raw input the host forwards to the controller, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Scroll wheel at the cursor. Negative `delta_y` zooms in.
    Wheel { x: f64, y: f64, delta_y: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    Resize { width: f64, height: f64 },
}

/// Cursor-anchored zoom, drag-to-pan and fit-on-resize.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    world: (f64, f64),
    screen: (f64, f64),
    fit_scale: f64,
    transform: ViewportTransform,
    /// Last pointer position while a drag is in progress.
    drag: Option<Point>,
}

impl ViewportController {
    /// Creates a controller for a `world_width × world_height` world shown
    /// in a viewport of the same size. Call [`resize`](Self::resize) once
    /// the real surface size is known.
    pub fn new(config: ViewportConfig, world_width: f64, world_height: f64) -> Self {
        let mut controller = Self {
            config: config.validated(),
            world: (world_width.max(1.0), world_height.max(1.0)),
            screen: (world_width.max(1.0), world_height.max(1.0)),
            fit_scale: 1.0,
            transform: ViewportTransform::IDENTITY,
            drag: None,
        };
        let (w, h) = controller.screen;
        controller.resize(w, h);
        controller
    }

    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// The scale at which the whole world fits the viewport.
    pub fn fit_scale(&self) -> f64 {
        self.fit_scale
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The world point currently under a screen point.
    pub fn world_at(&self, screen: Point) -> Point {
        self.transform.to_world(screen)
    }

    /// Applies one input event. Returns `true` if the transform changed.
    ///
    /// Events carrying non-finite coordinates are ignored.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Wheel { x, y, delta_y } => {
                if delta_y == 0.0 || !delta_y.is_finite() {
                    return false;
                }
                self.zoom_at(Point::new(x, y), delta_y < 0.0)
            }
            InputEvent::PointerDown { x, y } => {
                if finite(x, y) {
                    self.drag = Some(Point::new(x, y));
                }
                false
            }
            InputEvent::PointerMove { x, y } => {
                let Some(last) = self.drag.filter(|_| finite(x, y)) else {
                    return false;
                };
                self.drag = Some(Point::new(x, y));
                self.pan(x - last.x, y - last.y)
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.drag = None;
                false
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Zooms one step in or out keeping the world point under `cursor`
    /// fixed on screen. Returns `false` if the scale was already at the
    /// limit.
    pub fn zoom_at(&mut self, cursor: Point, zoom_in: bool) -> bool {
        if !finite(cursor.x, cursor.y) {
            return false;
        }
        let anchor = self.transform.to_world(cursor);
        let factor = if zoom_in {
            self.config.zoom_step
        } else {
            self.config.zoom_step.recip()
        };
        let (min, max) = self.scale_bounds();
        let scale = (self.transform.scale * factor).clamp(min, max);
        if scale == self.transform.scale {
            return false;
        }

        self.transform = ViewportTransform {
            scale,
            translation: Point::new(cursor.x - anchor.x * scale, cursor.y - anchor.y * scale),
        };
        trace!(scale, zoom_in, "zoom");
        true
    }

    /// Shifts the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if (dx == 0.0 && dy == 0.0) || !finite(dx, dy) {
            return false;
        }
        self.transform.translation.x += dx;
        self.transform.translation.y += dy;
        true
    }

    /// Resets to the fit scale for a new viewport size and centres the
    /// world. Zoom and pan are discarded. Zero or negative sizes are
    /// ignored.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return false;
        }
        let (world_w, world_h) = self.world;
        let fit = (width / world_w).min(height / world_h);

        self.screen = (width, height);
        self.fit_scale = fit;
        self.drag = None;
        let next = ViewportTransform {
            scale: fit,
            translation: Point::new((width - world_w * fit) / 2.0, (height - world_h * fit) / 2.0),
        };
        let changed = next != self.transform;
        self.transform = next;
        debug!(width, height, fit, "viewport resized");
        changed
    }

    fn scale_bounds(&self) -> (f64, f64) {
        (
            self.fit_scale * self.config.min_zoom,
            self.fit_scale * self.config.max_zoom,
        )
    }
}

fn finite(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite()
}
