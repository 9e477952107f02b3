//! Image cropping in normalized coordinates.
//!
//! Crop rectangles are specified as fractions (0.0 to 1.0) of the oriented
//! image, making them independent of the actual pixel dimensions. The pixel
//! region is resolved at bake time from the surface being cropped.

use crate::crop::CropRect;
use crate::surface::{Surface, CHANNELS};

/// Crop a surface to a normalized rectangle.
///
/// # Behavior
///
/// - Coordinates extending beyond the image are clamped
/// - Minimum output dimension is 1x1 pixels
/// - A full-frame rectangle returns a copy of the input
pub fn crop_surface(surface: &Surface, rect: &CropRect) -> Surface {
    // Fast path: full crop returns a clone
    if rect.is_full_frame() || surface.is_empty() {
        return surface.clone();
    }

    let (x, y, w, h) = rect.to_pixels(surface.width, surface.height);
    crop_pixels(surface, x, y, w, h)
}

/// Copy the pixel region `[x, x + width) x [y, y + height)`.
///
/// The region is clamped to the surface; an empty intersection yields an
/// empty surface.
pub fn crop_pixels(surface: &Surface, x: u32, y: u32, width: u32, height: u32) -> Surface {
    let x = x.min(surface.width);
    let y = y.min(surface.height);
    let out_width = width.min(surface.width - x);
    let out_height = height.min(surface.height - y);

    let row_bytes = out_width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    // Copy pixel data row by row
    for row in y..y + out_height {
        let start = surface.offset(x, row);
        output.extend_from_slice(&surface.pixels[start..start + row_bytes]);
    }

    Surface::new(out_width, out_height, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test surface where each pixel's red channel encodes its index.
    fn test_surface(width: u32, height: u32) -> Surface {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Surface::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop_returns_copy() {
        let s = test_surface(10, 10);
        let out = crop_surface(&s, &CropRect::FULL);
        assert_eq!(out, s);
    }

    #[test]
    fn test_center_crop() {
        let s = test_surface(100, 100);
        let out = crop_surface(&s, &CropRect::new(0.25, 0.25, 0.5, 0.5));
        assert_eq!(out.dimensions(), (50, 50));
        // Top-left of crop is source pixel (25, 25)
        let expected = ((25 * 100 + 25) % 256) as u8;
        assert_eq!(out.pixel(0, 0).unwrap()[0], expected);
    }

    #[test]
    fn test_crop_preserves_pixel_values() {
        let s = test_surface(10, 10);
        let out = crop_surface(&s, &CropRect::new(0.2, 0.3, 0.5, 0.4));
        assert_eq!(out.dimensions(), (5, 4));
        for y in 0..4 {
            for x in 0..5 {
                let expected = ((3 + y) * 10 + 2 + x) as u8;
                assert_eq!(out.pixel(x, y).unwrap()[0], expected);
            }
        }
    }

    #[test]
    fn test_crop_keeps_alpha() {
        let s = Surface::filled(4, 4, [1, 2, 3, 40]);
        let out = crop_surface(&s, &CropRect::new(0.5, 0.5, 0.5, 0.5));
        assert_eq!(out.pixel(0, 0), Some([1, 2, 3, 40]));
    }

    #[test]
    fn test_tiny_crop_is_at_least_one_pixel() {
        let s = test_surface(10, 10);
        let out = crop_surface(&s, &CropRect::new(0.5, 0.5, 0.02, 0.02));
        assert_eq!(out.dimensions(), (1, 1));
    }

    #[test]
    fn test_crop_pixels_clamps_region() {
        let s = test_surface(10, 10);
        let out = crop_pixels(&s, 8, 8, 5, 5);
        assert_eq!(out.dimensions(), (2, 2));

        let out = crop_pixels(&s, 12, 0, 3, 3);
        assert!(out.is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any valid crop stays inside the source and is at least 1x1.
        #[test]
        fn prop_crop_within_bounds(
            width in 1u32..60,
            height in 1u32..60,
            x in 0.0f64..1.0,
            y in 0.0f64..1.0,
            w in 0.02f64..=1.0,
            h in 0.02f64..=1.0,
        ) {
            let s = Surface::filled(width, height, [9, 9, 9, 255]);
            let rect = CropRect::new(x, y, w, h).clamped();
            let out = crop_surface(&s, &rect);

            prop_assert!(out.width >= 1 && out.width <= width);
            prop_assert!(out.height >= 1 && out.height <= height);
            prop_assert_eq!(out.pixels.len(), out.pixel_count() * CHANNELS);
        }
    }
}
