//! Aspect presets and aspect-locked crop fitting.
//!
//! A locked crop rectangle keeps `width / height == target_w / target_h`
//! in normalized display units, see [`target_aspect`].

use serde::{Deserialize, Serialize};

use super::CropRect;

/// Aspect ratio choice for the crop tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AspectPreset {
    /// No aspect lock.
    #[default]
    Free,
    /// Lock to whatever target size the user typed.
    Custom,
    /// Lock to the displayed image's own aspect.
    Original,
    /// Lock to a fixed `width:height` ratio.
    Ratio { width: u32, height: u32 },
}

impl AspectPreset {
    pub const SQUARE: AspectPreset = AspectPreset::Ratio { width: 1, height: 1 };
    pub const FOUR_THREE: AspectPreset = AspectPreset::Ratio { width: 4, height: 3 };
    pub const THREE_TWO: AspectPreset = AspectPreset::Ratio { width: 3, height: 2 };
    pub const SIXTEEN_NINE: AspectPreset = AspectPreset::Ratio { width: 16, height: 9 };

    /// Presets offered by the crop toolbar, in display order.
    pub const ALL: [AspectPreset; 10] = [
        AspectPreset::Free,
        AspectPreset::Custom,
        AspectPreset::Original,
        AspectPreset::SQUARE,
        AspectPreset::FOUR_THREE,
        AspectPreset::Ratio { width: 3, height: 4 },
        AspectPreset::THREE_TWO,
        AspectPreset::Ratio { width: 2, height: 3 },
        AspectPreset::SIXTEEN_NINE,
        AspectPreset::Ratio { width: 9, height: 16 },
    ];

    /// Pixel ratio (width / height) this preset imposes, if it imposes one
    /// by itself. `Free` and `Custom` return `None`.
    pub fn ratio(&self, display: (u32, u32)) -> Option<f64> {
        match *self {
            AspectPreset::Free | AspectPreset::Custom => None,
            AspectPreset::Original => {
                if display.0 == 0 || display.1 == 0 {
                    None
                } else {
                    Some(display.0 as f64 / display.1 as f64)
                }
            }
            AspectPreset::Ratio { width, height } => {
                if width == 0 || height == 0 {
                    None
                } else {
                    Some(width as f64 / height as f64)
                }
            }
        }
    }

    /// Whether selecting this preset enables the aspect lock.
    pub fn locks_aspect(&self) -> bool {
        !matches!(self, AspectPreset::Free)
    }

    pub fn label(&self) -> String {
        match self {
            AspectPreset::Free => "Free".to_string(),
            AspectPreset::Custom => "Custom".to_string(),
            AspectPreset::Original => "Original".to_string(),
            AspectPreset::Ratio { width, height } => format!("{}:{}", width, height),
        }
    }
}

/// Recompute the target size from a pixel ratio, keeping the target width.
///
/// Zero dimensions are raised to 1 so the result is always usable.
pub fn target_for_ratio(target_width: u32, ratio: f64) -> (u32, u32) {
    let width = target_width.max(1);
    if !ratio.is_finite() || ratio <= 0.0 {
        return (width, width);
    }
    let height = (width as f64 / ratio).round().max(1.0) as u32;
    (width, height)
}

/// Aspect (normalized width / height) a locked crop rectangle must hold.
///
/// `None` for a degenerate target.
pub fn target_aspect(target: (u32, u32)) -> Option<f64> {
    if target.0 == 0 || target.1 == 0 {
        return None;
    }
    Some(target.0 as f64 / target.1 as f64)
}

/// Shrink `rect` along one axis so it matches `aspect` (normalized width /
/// height), then re-clamp the origin so it stays in bounds.
pub fn fit_to_aspect(rect: &CropRect, aspect: f64) -> CropRect {
    if !aspect.is_finite() || aspect <= 0.0 {
        return rect.clamped();
    }
    let mut fitted = *rect;
    if rect.width / rect.height > aspect {
        fitted.width = rect.height * aspect;
    } else {
        fitted.height = rect.width / aspect;
    }
    fitted.clamped()
}
