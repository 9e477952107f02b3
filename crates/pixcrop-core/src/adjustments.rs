//! Tonal adjustments: grayscale, brightness and contrast.
//!
//! Brightness and contrast arrive as normalized deltas in [-1, 1] (the UI
//! works in integer steps of -100..=100). The baked result follows
//! `v' = (v - 128) * (1 + contrast) + 128 + brightness * 255`, clamped.
//! The live preview instead hands `1 + delta` factors to the display
//! surface's own compositing filter, see [`PreviewFilter`].

use serde::{Deserialize, Serialize};

use crate::surface::{Surface, CHANNELS};

/// Convert an integer UI slider value (-100 to 100) into a normalized delta.
#[inline]
pub fn normalize_slider(value: i32) -> f64 {
    value.clamp(-100, 100) as f64 / 100.0
}

/// Calculate luminance using ITU-R BT.709 coefficients.
#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let l = 0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32;
    l.round().clamp(0.0, 255.0) as u8
}

/// Replace RGB with luminance, keeping alpha.
pub fn apply_grayscale(surface: &mut Surface) {
    for px in surface.pixels.chunks_exact_mut(CHANNELS) {
        let l = luminance(px[0], px[1], px[2]);
        px[0] = l;
        px[1] = l;
        px[2] = l;
    }
}

/// Apply brightness and contrast deltas to RGB, keeping alpha.
///
/// Both deltas are in [-1, 1]; zero for both is a no-op.
pub fn apply_brightness_contrast(surface: &mut Surface, brightness: f64, contrast: f64) {
    if brightness == 0.0 && contrast == 0.0 {
        return;
    }
    let offset = brightness * 255.0;
    let factor = 1.0 + contrast;

    // 256-entry lookup table, identical for every channel
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let adjusted = (v as f64 - 128.0) * factor + 128.0 + offset;
        *out = adjusted.round().clamp(0.0, 255.0) as u8;
    }

    for px in surface.pixels.chunks_exact_mut(CHANNELS) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
}

/// Display-only filter parameters for the live preview.
///
/// Factors are multiplicative about 1.0, the way compositing filters
/// (`brightness()`, `contrast()`) expect them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewFilter {
    pub grayscale: bool,
    pub brightness: f64,
    pub contrast: f64,
}

impl Default for PreviewFilter {
    fn default() -> Self {
        Self {
            grayscale: false,
            brightness: 1.0,
            contrast: 1.0,
        }
    }
}

impl PreviewFilter {
    /// Build from normalized deltas.
    pub fn from_deltas(grayscale: bool, brightness: f64, contrast: f64) -> Self {
        Self {
            grayscale,
            brightness: 1.0 + brightness,
            contrast: 1.0 + contrast,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Render as a CSS-style filter string, e.g. for a canvas or image element.
    pub fn to_css(&self) -> String {
        if self.is_identity() {
            return "none".to_string();
        }
        format!(
            "grayscale({}) brightness({}) contrast({})",
            if self.grayscale { 1 } else { 0 },
            self.brightness,
            self.contrast
        )
    }
}
