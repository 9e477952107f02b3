//! Zoom and pan between display space and the container surface.
//!
//! The displayed image is centered in its container, scaled by `zoom` and
//! offset by `pan` (in container pixels). Pan is deliberately unbounded:
//! the image may be scrolled fully out of view.

use serde::{Deserialize, Serialize};

use crate::geometry::ScreenRect;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Total margin (both sides combined) kept around a fitted image.
pub const DEFAULT_FIT_MARGIN: f64 = 40.0;

/// Zoom/pan transform for the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    /// Pan offset in container pixels.
    pub pan: (f64, f64),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: (0.0, 0.0),
        }
    }
}

/// Clamp a zoom factor into [`MIN_ZOOM`, `MAX_ZOOM`].
#[inline]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Compute the zoom that fits a display-space image into a container.
///
/// Returns the largest zoom ≤ 1 such that the image plus `margin` fits on
/// both axes: `min((cw - margin) / dw, (ch - margin) / dh, 1)`. The result
/// is clamped into the allowed zoom range.
pub fn fit_zoom(container: (f64, f64), display: (u32, u32), margin: f64) -> f64 {
    let (dw, dh) = (display.0 as f64, display.1 as f64);
    if dw <= 0.0 || dh <= 0.0 {
        return 1.0;
    }
    let zx = (container.0 - margin) / dw;
    let zy = (container.1 - margin) / dh;
    clamp_zoom(zx.min(zy).min(1.0))
}

impl Viewport {
    pub fn new(zoom: f64, pan: (f64, f64)) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped into the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Fit the display-space image into the container and reset pan.
    pub fn fit(&mut self, container: (f64, f64), display: (u32, u32), margin: f64) {
        self.zoom = fit_zoom(container, display, margin);
        self.pan = (0.0, 0.0);
    }

    /// Shift the pan offset by a container-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }

    /// Where the display-space image lands inside the container.
    pub fn rendered_rect(&self, container: (f64, f64), display: (u32, u32)) -> ScreenRect {
        let width = display.0 as f64 * self.zoom;
        let height = display.1 as f64 * self.zoom;
        ScreenRect {
            x: (container.0 - width) / 2.0 + self.pan.0,
            y: (container.1 - height) / 2.0 + self.pan.1,
            width,
            height,
        }
    }

    /// Multiply the zoom by `factor`, keeping the image point under
    /// `anchor` (a container position) stationary.
    pub fn zoom_at(
        &mut self,
        factor: f64,
        anchor: (f64, f64),
        container: (f64, f64),
        display: (u32, u32),
    ) {
        let before = self.rendered_rect(container, display);
        let new_zoom = clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Fraction of the image under the anchor before zooming
        let fx = if before.width > 0.0 {
            (anchor.0 - before.x) / before.width
        } else {
            0.5
        };
        let fy = if before.height > 0.0 {
            (anchor.1 - before.y) / before.height
        } else {
            0.5
        };

        self.zoom = new_zoom;
        let after = self.rendered_rect(container, display);
        let drift_x = after.x + fx * after.width - anchor.0;
        let drift_y = after.y + fy * after.height - anchor.1;
        self.pan_by(-drift_x, -drift_y);
    }
}
