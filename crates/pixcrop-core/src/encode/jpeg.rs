//! JPEG encoding for export.
//!
//! JPEG has no alpha channel, so surfaces are composited over an opaque
//! white background before encoding.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate, EncodeError};
use crate::surface::{Surface, CHANNELS};

/// Background color transparent pixels are flattened onto.
pub const JPEG_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Composite RGBA pixels over [`JPEG_BACKGROUND`], yielding packed RGB.
pub fn flatten_alpha(surface: &Surface) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(surface.pixel_count() * 3);
    for px in surface.pixels.chunks_exact(CHANNELS) {
        let a = px[3] as u32;
        for c in 0..3 {
            let blended = (px[c] as u32 * a + JPEG_BACKGROUND[c] as u32 * (255 - a) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

/// Encode a surface to JPEG bytes.
///
/// Quality is clamped to 1-100.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(surface: &Surface, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(surface)?;

    let quality = quality.clamp(1, 100);
    let rgb = flatten_alpha(surface);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&rgb, surface.width, surface.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> Surface {
        Surface::filled(width, height, [128, 128, 128, 255])
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg_bytes = encode_jpeg(&gray(100, 100), 90).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        assert!(encode_jpeg(&gray(10, 10), 0).is_ok());
        assert!(encode_jpeg(&gray(10, 10), 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let s = Surface {
            width: 10,
            height: 10,
            pixels: vec![0u8; 10],
        };
        let result = encode_jpeg(&s, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        let s = Surface {
            width: 0,
            height: 100,
            pixels: vec![],
        };
        let result = encode_jpeg(&s, 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_jpeg_decodes_back() {
        let bytes = encode_jpeg(&gray(24, 16), 95).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 16));
    }

    #[test]
    fn test_flatten_alpha() {
        let s = Surface::new(3, 1, vec![0, 0, 0, 0, 0, 0, 0, 255, 0, 0, 0, 128]);
        let rgb = flatten_alpha(&s);
        assert_eq!(&rgb[0..3], &[255, 255, 255]);
        assert_eq!(&rgb[3..6], &[0, 0, 0]);
        // Half transparent black over white lands mid-gray
        assert_eq!(rgb[6], 127);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
