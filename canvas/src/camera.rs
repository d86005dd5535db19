#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::doc::Size;

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// View transform of the editing surface.
///
/// The ad's top-left corner is drawn at `(pan_x, pan_y)` CSS pixels and one
/// canvas unit spans `zoom` CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a canvas-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.zoom + self.pan_x,
            y: canvas.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Zoom by `factor` keeping the canvas point under `anchor` fixed on
    /// screen. The result is clamped to the zoom limits.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let fixed = self.screen_to_canvas(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan_x = anchor.x - fixed.x * self.zoom;
        self.pan_y = anchor.y - fixed.y * self.zoom;
    }

    /// A camera showing all of `size` centered in a `viewport_w` x
    /// `viewport_h` viewport with `margin` pixels free on every side. Never
    /// zooms past 1.
    #[must_use]
    pub fn fit(size: Size, viewport_w: f64, viewport_h: f64, margin: f64) -> Self {
        let avail_w = (viewport_w - 2.0 * margin).max(1.0);
        let avail_h = (viewport_h - 2.0 * margin).max(1.0);
        let zoom = (avail_w / size.width_f64()).min(avail_h / size.height_f64()).clamp(MIN_ZOOM, 1.0);
        Self {
            pan_x: (viewport_w - size.width_f64() * zoom) / 2.0,
            pan_y: (viewport_h - size.height_f64() * zoom) / 2.0,
            zoom,
        }
    }

    /// Canvas-space delta between two screen points.
    #[must_use]
    pub fn screen_delta_to_canvas(&self, from: Point, to: Point) -> (f64, f64) {
        (self.screen_dist_to_canvas(to.x - from.x), self.screen_dist_to_canvas(to.y - from.y))
    }
}
