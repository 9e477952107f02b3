//! Crop rectangle model and interactive manipulation.
//!
//! The crop rectangle is held in normalized display-space coordinates
//! (0.0 to 1.0 of the rotated image's width/height), so it is independent of
//! zoom and of the preview's pixel size.
//!
//! # Invariants
//!
//! After every mutation:
//! - `0 <= x`, `0 <= y`
//! - `x + width <= 1`, `y + height <= 1`
//! - `width >= MIN_CROP_SIZE`, `height >= MIN_CROP_SIZE`
//!
//! Anything that would violate them is clamped, never reported as an error.

mod aspect;
mod drag;

pub use aspect::{fit_to_aspect, target_aspect, target_for_ratio, AspectPreset};
pub use drag::{drag_rect, hit_test, CropGesture, DragMode};

use serde::{Deserialize, Serialize};

/// Minimum crop size on each axis, as a fraction of the displayed image.
pub const MIN_CROP_SIZE: f64 = 0.02;

/// Normalized region of the displayed image to retain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl CropRect {
    /// The whole frame.
    pub const FULL: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rectangle covers the whole frame (no crop needed).
    pub fn is_full_frame(&self) -> bool {
        !(self.x > 0.0 || self.y > 0.0 || self.width < 1.0 || self.height < 1.0)
    }

    /// Enforce the rectangle invariants.
    ///
    /// Width and height are clamped first, then the origin, so the result
    /// never escapes the unit square regardless of how extreme the input is.
    pub fn clamped(self) -> Self {
        let width = clamp_unit(self.width, MIN_CROP_SIZE);
        let height = clamp_unit(self.height, MIN_CROP_SIZE);
        let x = clamp_unit(self.x, 0.0).min(1.0 - width);
        let y = clamp_unit(self.y, 0.0).min(1.0 - height);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check the rectangle invariants.
    pub fn is_valid(&self) -> bool {
        const TOL: f64 = 1e-9;
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= 1.0 + TOL
            && self.y + self.height <= 1.0 + TOL
            && self.width >= MIN_CROP_SIZE - TOL
            && self.height >= MIN_CROP_SIZE - TOL
    }

    /// Width over height in normalized units.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// The same region after the image is turned a quarter clockwise.
    pub fn rotated_cw(&self) -> Self {
        Self {
            x: 1.0 - self.y - self.height,
            y: self.x,
            width: self.height,
            height: self.width,
        }
        .clamped()
    }

    /// The same region after the image is turned a quarter counter-clockwise.
    pub fn rotated_ccw(&self) -> Self {
        Self {
            x: self.y,
            y: 1.0 - self.x - self.width,
            width: self.height,
            height: self.width,
        }
        .clamped()
    }

    /// The same region after the image is mirrored left-to-right.
    pub fn flipped_h(&self) -> Self {
        Self {
            x: 1.0 - self.x - self.width,
            ..*self
        }
        .clamped()
    }

    /// The same region after the image is mirrored top-to-bottom.
    pub fn flipped_v(&self) -> Self {
        Self {
            y: 1.0 - self.y - self.height,
            ..*self
        }
        .clamped()
    }

    /// Convert to a pixel rectangle `(x, y, width, height)` within an image
    /// of the given size. The result is at least 1x1 and stays in bounds.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let src_w = image_width as f64;
        let src_h = image_height as f64;

        let px_x = (self.x.clamp(0.0, 1.0) * src_w).round() as u32;
        let px_y = (self.y.clamp(0.0, 1.0) * src_h).round() as u32;
        let px_w = (self.width.clamp(0.0, 1.0) * src_w).round().max(1.0) as u32;
        let px_h = (self.height.clamp(0.0, 1.0) * src_h).round().max(1.0) as u32;

        let px_x = px_x.min(image_width.saturating_sub(1));
        let px_y = px_y.min(image_height.saturating_sub(1));
        let px_w = px_w.min(image_width - px_x).max(1);
        let px_h = px_h.min(image_height - px_y).max(1);

        (px_x, px_y, px_w, px_h)
    }
}

/// Clamp into `[min, 1]`, mapping NaN to `min`.
#[inline]
fn clamp_unit(value: f64, min: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, 1.0)
}
