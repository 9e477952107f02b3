//! The bake pipeline: every pending edit applied to a natural-orientation
//! surface.
//!
//! # Stage Order
//!
//! 1. Pixelate strokes (strokes are in natural space)
//! 2. Rotate, then flip
//! 3. Grayscale
//! 4. Brightness and contrast
//! 5. Chroma key
//! 6. Crop and scale, in the requested order

use tracing::debug;

use super::ProcessError;
use crate::adjustments::{apply_brightness_contrast, apply_grayscale};
use crate::chroma::chroma_key;
use crate::export::EditRequest;
use crate::pixelate::apply_strokes;
use crate::surface::Surface;
use crate::transform::{crop_and_scale, orient, FilterType};

/// Reject values no UI could produce.
pub fn validate_request(edits: &EditRequest) -> Result<(), ProcessError> {
    let in_unit = |v: f64| v.is_finite() && (-1.0..=1.0).contains(&v);
    if !in_unit(edits.brightness) {
        return Err(ProcessError::InvalidRequest(format!(
            "brightness {} outside [-1, 1]",
            edits.brightness
        )));
    }
    if !in_unit(edits.contrast) {
        return Err(ProcessError::InvalidRequest(format!(
            "contrast {} outside [-1, 1]",
            edits.contrast
        )));
    }
    if let Some(bg) = edits.active_bg_removal() {
        if !bg.tolerance.is_finite() || !(0.0..=1.0).contains(&bg.tolerance) {
            return Err(ProcessError::InvalidRequest(format!(
                "tolerance {} outside [0, 1]",
                bg.tolerance
            )));
        }
    }
    if let Some(crop) = &edits.crop {
        if !crop.is_valid() {
            return Err(ProcessError::InvalidRequest(format!("crop {:?} out of bounds", crop)));
        }
    }
    // Radii past 1 are legal: a brush wider than a small image
    for stroke in &edits.pixelate_strokes {
        if !stroke.radius.is_finite() || stroke.radius < 0.0 {
            return Err(ProcessError::InvalidRequest(format!(
                "stroke radius {} is not a finite non-negative value",
                stroke.radius
            )));
        }
        let in_image = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if let Some((x, y)) = stroke.points.iter().find(|(x, y)| !in_image(*x) || !in_image(*y)) {
            return Err(ProcessError::InvalidRequest(format!(
                "stroke point ({}, {}) outside [0, 1]",
                x, y
            )));
        }
    }
    Ok(())
}

/// Apply all edits to `natural`, producing the output surface.
pub fn bake(mut natural: Surface, edits: &EditRequest, filter: FilterType) -> Result<Surface, ProcessError> {
    validate_request(edits)?;

    if !edits.pixelate_strokes.is_empty() {
        debug!(
            "Pixelating {} strokes, block size {}",
            edits.pixelate_strokes.len(),
            edits.pixelate_block_size
        );
        apply_strokes(&mut natural, &edits.pixelate_strokes, edits.pixelate_block_size.max(1));
    }

    let orientation = edits.orientation();
    let mut surface = if orientation.is_identity() {
        natural
    } else {
        orient(&natural, orientation)?
    };

    if edits.grayscale {
        apply_grayscale(&mut surface);
    }
    apply_brightness_contrast(&mut surface, edits.brightness, edits.contrast);

    if let Some(bg) = edits.active_bg_removal() {
        chroma_key(&mut surface, bg.color, bg.tolerance);
    }

    let target = (edits.target_width, edits.target_height);
    let out = crop_and_scale(&surface, edits.crop.as_ref(), target, edits.mode, filter)?;
    debug!("Baked {}x{} -> {}x{}", surface.width, surface.height, out.width, out.height);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::CropRect;
    use crate::export::BgRemovalSettings;
    use crate::geometry::Rotation;
    use crate::pixelate::Stroke;
    use crate::transform::ScaleMode;

    fn request() -> EditRequest {
        EditRequest {
            target_width: 0,
            target_height: 0,
            crop: None,
            rotation: Rotation::Deg0,
            flip_h: false,
            flip_v: false,
            grayscale: false,
            brightness: 0.0,
            contrast: 0.0,
            pixelate_strokes: Vec::new(),
            pixelate_block_size: 10,
            bg_removal: None,
            mode: ScaleMode::CropThenScale,
        }
    }

    /// Left half red, right half blue.
    fn halves(width: u32, height: u32) -> Surface {
        let mut pixels = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        Surface::new(width, height, pixels)
    }

    #[test]
    fn test_empty_request_is_identity() {
        let s = halves(20, 10);
        let out = bake(s.clone(), &request(), FilterType::Nearest).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn test_rotation_swaps_output() {
        let mut req = request();
        req.rotation = Rotation::Deg90;
        let out = bake(halves(20, 10), &req, FilterType::Nearest).unwrap();
        assert_eq!(out.dimensions(), (10, 20));
        // Red (left) half ends up on top
        assert_eq!(out.pixel(5, 0), Some([255, 0, 0, 255]));
        assert_eq!(out.pixel(5, 19), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_crop_in_display_space() {
        let mut req = request();
        req.flip_h = true;
        req.crop = Some(CropRect::new(0.0, 0.0, 0.5, 1.0));
        let out = bake(halves(20, 10), &req, FilterType::Nearest).unwrap();
        // After mirroring, the left half of the display is blue
        assert_eq!(out.dimensions(), (10, 10));
        assert!(out.pixels.chunks_exact(4).all(|p| p == [0, 0, 255, 255]));
    }

    #[test]
    fn test_strokes_use_natural_space() {
        // Stroke over the natural left half; rotation must not move it
        let mut req = request();
        req.rotation = Rotation::Deg180;
        req.pixelate_block_size = 20;
        req.pixelate_strokes = vec![Stroke {
            points: vec![(0.5, 0.5)],
            radius: 0.5,
        }];
        let out = bake(halves(20, 10), &req, FilterType::Nearest).unwrap();
        // The whole surface averaged into one cell: (255, 0, 255) / 2 rounded
        assert!(out.pixels.chunks_exact(4).all(|p| p == [128, 0, 128, 255]));
    }

    #[test]
    fn test_chroma_key_after_adjustments() {
        let mut req = request();
        req.bg_removal = Some(BgRemovalSettings {
            enabled: true,
            color: [0, 0, 255],
            tolerance: 0.1,
        });
        let out = bake(halves(4, 1), &req, FilterType::Nearest).unwrap();
        assert_eq!(out.pixel(0, 0).unwrap()[3], 255);
        assert_eq!(out.pixel(3, 0).unwrap()[3], 0);
    }

    #[test]
    fn test_disabled_bg_removal_is_skipped() {
        let mut req = request();
        req.bg_removal = Some(BgRemovalSettings {
            enabled: false,
            color: [0, 0, 255],
            tolerance: 1.0,
        });
        let out = bake(halves(4, 1), &req, FilterType::Nearest).unwrap();
        assert!(out.pixels.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_target_size() {
        let mut req = request();
        req.target_width = 7;
        req.target_height = 3;
        req.mode = ScaleMode::ScaleThenCrop;
        let out = bake(halves(20, 10), &req, FilterType::Bilinear).unwrap();
        assert_eq!(out.dimensions(), (7, 3));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut req = request();
        req.brightness = 2.0;
        assert!(matches!(
            bake(halves(2, 2), &req, FilterType::Nearest),
            Err(ProcessError::InvalidRequest(_))
        ));

        let mut req = request();
        req.crop = Some(CropRect::new(0.9, 0.0, 0.5, 1.0));
        assert!(validate_request(&req).is_err());

        let mut req = request();
        req.pixelate_strokes = vec![Stroke {
            points: vec![(f64::NAN, 0.5)],
            radius: 0.1,
        }];
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_stroke_bounds_checked() {
        let stroke = |points: Vec<(f64, f64)>, radius: f64| {
            let mut req = request();
            req.pixelate_strokes = vec![Stroke { points, radius }];
            req
        };

        for bad in [
            stroke(vec![(1.5, 0.5)], 0.1),
            stroke(vec![(0.5, -0.01)], 0.1),
            stroke(vec![(0.5, 1e300)], 0.1),
            stroke(vec![(0.5, 0.5)], -0.2),
            stroke(vec![(0.5, 0.5)], f64::INFINITY),
        ] {
            assert!(matches!(
                bake(halves(4, 4), &bad, FilterType::Nearest),
                Err(ProcessError::InvalidRequest(_))
            ));
        }

        // Edges of the image and oversized brushes are fine
        assert!(validate_request(&stroke(vec![(0.0, 1.0)], 0.1)).is_ok());
        let out = bake(halves(4, 4), &stroke(vec![(0.5, 0.5)], 1e300), FilterType::Nearest).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
    }
}
