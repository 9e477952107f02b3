//! Resampling to exact and fitted dimensions.
//!
//! All functions return new surfaces without modifying the input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::Surface;

/// Errors that can occur while resampling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// Target width or height is zero
    #[error("Invalid target dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer doesn't match the surface dimensions
    #[error("Pixel buffer does not match {width}x{height} surface")]
    InvalidPixelData { width: u32, height: u32 },
}

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize a surface to exact dimensions.
///
/// # Errors
///
/// Returns [`TransformError::InvalidDimensions`] for a zero target and
/// [`TransformError::InvalidPixelData`] when the source buffer is malformed.
pub fn resize(
    surface: &Surface,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Surface, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if surface.dimensions() == (width, height) {
        return Ok(surface.clone());
    }

    let rgba = surface
        .to_rgba_image()
        .ok_or(TransformError::InvalidPixelData {
            width: surface.width,
            height: surface.height,
        })?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(Surface::from_rgba_image(resized))
}

/// Downscale so the longest edge is at most `max_edge`, preserving aspect
/// ratio. Surfaces that already fit are returned unchanged.
pub fn resize_to_fit(
    surface: &Surface,
    max_edge: u32,
    filter: FilterType,
) -> Result<Surface, TransformError> {
    if max_edge == 0 {
        return Err(TransformError::InvalidDimensions {
            width: max_edge,
            height: max_edge,
        });
    }

    let (src_width, src_height) = surface.dimensions();
    if src_width <= max_edge && src_height <= max_edge {
        return Ok(surface.clone());
    }

    let (new_width, new_height) = calculate_fit_dimensions(src_width, src_height, max_edge);
    resize(surface, new_width, new_height, filter)
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
pub fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}

/// Smallest uniform scale of `width` x `height` that covers the target on
/// both axes.
pub fn cover_scale_dimensions(width: u32, height: u32, target_width: u32, target_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (target_width, target_height);
    }
    let scale = (target_width as f64 / width as f64).max(target_height as f64 / height as f64);
    let w = (width as f64 * scale).round().max(1.0) as u32;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (w, h)
}
