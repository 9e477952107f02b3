//! Output encoding.
//!
//! - JPEG with configurable quality (alpha flattened onto white)
//! - PNG (lossless, alpha preserved)
//!
//! The format is chosen by name, the way export requests carry it
//! (`"jpeg"`, `"jpg"` or `"png"`).

mod jpeg;
mod png;

pub use jpeg::{encode_jpeg, flatten_alpha, JPEG_BACKGROUND};
pub use png::encode_png;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::{Surface, CHANNELS};

/// Default JPEG quality for exports.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Unrecognized output format name
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Check dimensions and buffer length before handing pixels to an encoder.
fn validate(surface: &Surface) -> Result<(), EncodeError> {
    if surface.width == 0 || surface.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: surface.width,
            height: surface.height,
        });
    }
    let expected = surface.pixel_count() * CHANNELS;
    if surface.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: surface.pixels.len(),
        });
    }
    Ok(())
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            other => Err(EncodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// Encode a surface in the given format.
///
/// `jpeg_quality` is ignored for PNG.
pub fn encode(surface: &Surface, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Png => encode_png(surface),
        OutputFormat::Jpeg => encode_jpeg(surface, jpeg_quality),
    }
}
