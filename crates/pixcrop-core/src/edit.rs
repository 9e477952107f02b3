//! Pending, not-yet-baked edits for the loaded image.
//!
//! [`EditState`] is owned by the editing session and reset whenever a new
//! image session starts. Orientation changes carry the crop rectangle along
//! so it keeps framing the same content.

use serde::{Deserialize, Serialize};

use crate::adjustments::{normalize_slider, PreviewFilter};
use crate::crop::{fit_to_aspect, target_aspect, target_for_ratio, AspectPreset, CropRect};
use crate::geometry::{display_dimensions, Orientation, Rotation};
use crate::pixelate::{StrokeHistory, DEFAULT_BLOCK_SIZE};

/// Background-removal parameters as the user edits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgRemoval {
    pub enabled: bool,
    pub color: [u8; 3],
    /// Tolerance on a 0..=100 scale.
    pub tolerance: u32,
}

impl Default for BgRemoval {
    fn default() -> Self {
        Self {
            enabled: false,
            color: [0, 255, 0],
            tolerance: 30,
        }
    }
}

impl BgRemoval {
    /// Tolerance as a fraction in [0, 1].
    pub fn tolerance_fraction(&self) -> f64 {
        self.tolerance.min(100) as f64 / 100.0
    }
}

/// All pending edits for one image session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditState {
    pub rotation: Rotation,
    pub flip_h: bool,
    pub flip_v: bool,
    pub grayscale: bool,
    /// Slider value, -100..=100.
    brightness: i32,
    /// Slider value, -100..=100.
    contrast: i32,
    pub strokes: StrokeHistory,
    block_size: u32,
    pub bg_removal: BgRemoval,
    target_width: u32,
    target_height: u32,
    pub crop: CropRect,
    aspect_preset: AspectPreset,
}

impl Default for EditState {
    fn default() -> Self {
        Self::new((0, 0), DEFAULT_BLOCK_SIZE)
    }
}

impl EditState {
    /// Fresh state for an image of the given natural size.
    ///
    /// The target size starts at the natural size.
    pub fn new(natural: (u32, u32), block_size: u32) -> Self {
        Self {
            rotation: Rotation::Deg0,
            flip_h: false,
            flip_v: false,
            grayscale: false,
            brightness: 0,
            contrast: 0,
            strokes: StrokeHistory::new(),
            block_size: block_size.max(1),
            bg_removal: BgRemoval::default(),
            target_width: natural.0,
            target_height: natural.1,
            crop: CropRect::FULL,
            aspect_preset: AspectPreset::Free,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.rotation, self.flip_h, self.flip_v)
    }

    /// Display dimensions of a natural-size image under the current rotation.
    pub fn display_dimensions(&self, natural: (u32, u32)) -> (u32, u32) {
        display_dimensions(natural.0, natural.1, self.rotation)
    }

    // ===== Orientation =====

    /// Turn the image a quarter clockwise.
    pub fn rotate_cw(&mut self) {
        self.rotation = self.rotation.clockwise();
        // Under a single mirror a clockwise turn of the image is a
        // counter-clockwise turn of display space
        self.crop = if self.flip_h != self.flip_v {
            self.crop.rotated_ccw()
        } else {
            self.crop.rotated_cw()
        };
        self.swap_target();
    }

    /// Turn the image a quarter counter-clockwise.
    pub fn rotate_ccw(&mut self) {
        self.rotation = self.rotation.counter_clockwise();
        self.crop = if self.flip_h != self.flip_v {
            self.crop.rotated_cw()
        } else {
            self.crop.rotated_ccw()
        };
        self.swap_target();
    }

    pub fn toggle_flip_h(&mut self) {
        self.flip_h = !self.flip_h;
        self.crop = self.crop.flipped_h();
    }

    pub fn toggle_flip_v(&mut self) {
        self.flip_v = !self.flip_v;
        self.crop = self.crop.flipped_v();
    }

    fn swap_target(&mut self) {
        std::mem::swap(&mut self.target_width, &mut self.target_height);
    }

    // ===== Adjustments =====

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    pub fn contrast(&self) -> i32 {
        self.contrast
    }

    pub fn set_brightness(&mut self, value: i32) {
        self.brightness = value.clamp(-100, 100);
    }

    pub fn set_contrast(&mut self, value: i32) {
        self.contrast = value.clamp(-100, 100);
    }

    /// Brightness as a normalized delta in [-1, 1].
    pub fn brightness_delta(&self) -> f64 {
        normalize_slider(self.brightness)
    }

    /// Contrast as a normalized delta in [-1, 1].
    pub fn contrast_delta(&self) -> f64 {
        normalize_slider(self.contrast)
    }

    /// Display-only filter for the live preview.
    pub fn preview_filter(&self) -> PreviewFilter {
        PreviewFilter::from_deltas(self.grayscale, self.brightness_delta(), self.contrast_delta())
    }

    // ===== Pixelation =====

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn set_block_size(&mut self, block_size: u32) {
        self.block_size = block_size.max(1);
    }

    // ===== Crop target and aspect =====

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    pub fn aspect_preset(&self) -> AspectPreset {
        self.aspect_preset
    }

    pub fn aspect_locked(&self) -> bool {
        self.aspect_preset.locks_aspect()
    }

    /// Aspect the crop rectangle must keep, or `None` when free.
    pub fn crop_aspect(&self) -> Option<f64> {
        if !self.aspect_locked() {
            return None;
        }
        target_aspect(self.target_size())
    }

    /// Set the output size by hand. Each dimension is raised to at least 1.
    ///
    /// A fixed-ratio preset gives way to `Custom`, and a locked crop is
    /// refitted to the new aspect.
    pub fn set_target_size(&mut self, width: u32, height: u32) {
        self.target_width = width.max(1);
        self.target_height = height.max(1);

        if matches!(
            self.aspect_preset,
            AspectPreset::Original | AspectPreset::Ratio { .. }
        ) {
            self.aspect_preset = AspectPreset::Custom;
        }
        if let Some(aspect) = self.crop_aspect() {
            self.crop = fit_to_aspect(&self.crop, aspect);
        }
    }

    /// Choose an aspect preset.
    ///
    /// `Free` drops the lock and `Custom` locks to the current target; neither
    /// touches the rectangle. Ratio presets recompute the target height from
    /// the target width and shrink the rectangle to match.
    pub fn select_aspect_preset(&mut self, preset: AspectPreset, display: (u32, u32)) {
        self.aspect_preset = preset;

        let Some(ratio) = preset.ratio(display) else {
            return;
        };
        let (w, h) = target_for_ratio(self.target_width, ratio);
        self.target_width = w;
        self.target_height = h;

        if let Some(aspect) = target_aspect((w, h)) {
            self.crop = fit_to_aspect(&self.crop, aspect);
        }
    }

    /// Return the crop to the full frame.
    pub fn reset_crop(&mut self) {
        self.crop = CropRect::FULL;
    }

    /// Crop rectangle to send to the processor, `None` for a full frame.
    pub fn effective_crop(&self) -> Option<CropRect> {
        if self.crop.is_full_frame() {
            None
        } else {
            Some(self.crop)
        }
    }

    /// Whether anything would change if the edits were baked.
    pub fn has_pending_edits(&self, natural: (u32, u32)) -> bool {
        self.rotation != Rotation::Deg0
            || self.flip_h
            || self.flip_v
            || self.grayscale
            || self.brightness != 0
            || self.contrast != 0
            || self.strokes.can_undo()
            || self.bg_removal.enabled
            || !self.crop.is_full_frame()
            || self.target_size() != self.display_dimensions(natural)
    }
}
