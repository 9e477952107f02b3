//! Lossless quarter-turn rotation and mirroring.
//!
//! Orientation is applied as rotation first, then horizontal and vertical
//! flips, matching [`Orientation::natural_to_display`].

use image::{imageops, RgbaImage};

use super::TransformError;
use crate::geometry::{Orientation, Rotation};
use crate::surface::Surface;

fn to_image(surface: &Surface) -> Result<RgbaImage, TransformError> {
    surface.to_rgba_image().ok_or(TransformError::InvalidPixelData {
        width: surface.width,
        height: surface.height,
    })
}

fn rotate_image(img: RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::Deg0 => img,
        Rotation::Deg90 => imageops::rotate90(&img),
        Rotation::Deg180 => imageops::rotate180(&img),
        Rotation::Deg270 => imageops::rotate270(&img),
    }
}

/// Rotate clockwise by a quarter-turn multiple.
pub fn rotate(surface: &Surface, rotation: Rotation) -> Result<Surface, TransformError> {
    if rotation == Rotation::Deg0 {
        return Ok(surface.clone());
    }
    let img = to_image(surface)?;
    Ok(Surface::from_rgba_image(rotate_image(img, rotation)))
}

/// Mirror left to right.
pub fn flip_horizontal(surface: &Surface) -> Result<Surface, TransformError> {
    let img = to_image(surface)?;
    Ok(Surface::from_rgba_image(imageops::flip_horizontal(&img)))
}

/// Mirror top to bottom.
pub fn flip_vertical(surface: &Surface) -> Result<Surface, TransformError> {
    let img = to_image(surface)?;
    Ok(Surface::from_rgba_image(imageops::flip_vertical(&img)))
}

/// Map a natural-orientation surface into display orientation.
pub fn orient(surface: &Surface, orientation: Orientation) -> Result<Surface, TransformError> {
    if orientation.is_identity() {
        return Ok(surface.clone());
    }
    let mut img = rotate_image(to_image(surface)?, orientation.rotation);
    if orientation.flip_h {
        imageops::flip_horizontal_in_place(&mut img);
    }
    if orientation.flip_v {
        imageops::flip_vertical_in_place(&mut img);
    }
    Ok(Surface::from_rgba_image(img))
}
