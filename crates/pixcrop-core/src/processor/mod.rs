//! The external image-processing collaborator.
//!
//! The editing session only talks to an [`ImageProcessor`]; one call is one
//! round trip. [`LocalProcessor`] is the native reference implementation,
//! built on [`bake`] and the `image` crate codecs.

mod local;
mod pipeline;

pub use local::LocalProcessor;
pub use pipeline::{bake, validate_request};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::encode::EncodeError;
use crate::export::{ApplyRequest, ExportRequest};
use crate::surface::Surface;
use crate::transform::TransformError;

/// Errors returned by an [`ImageProcessor`].
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Source could not be read or decoded
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Output could not be encoded
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A resampling stage failed
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request fields out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// `applied_path` was asked for before any apply succeeded
    #[error("No edits have been applied yet")]
    NoAppliedImage,
}

impl ProcessError {
    pub fn decode(path: &Path, message: impl ToString) -> Self {
        ProcessError::Decode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// A decoded image as handed back to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedImage {
    /// Natural width of the full-resolution image.
    pub width: u32,
    /// Natural height of the full-resolution image.
    pub height: u32,
    /// Renderable preview, possibly downscaled.
    pub preview: Surface,
}

/// Request/response interface to whatever decodes, bakes and encodes images.
pub trait ImageProcessor {
    /// Decode `path` and return its natural size plus a preview.
    fn open(&mut self, path: &Path) -> Result<OpenedImage, ProcessError>;

    /// Bake edits into a new backing image.
    fn apply_edits(&mut self, request: &ApplyRequest) -> Result<OpenedImage, ProcessError>;

    /// Location of the image written by the last successful apply.
    fn applied_path(&self) -> Result<PathBuf, ProcessError>;

    /// Bake edits and write the final output, returning its path.
    fn export_image(&mut self, request: &ExportRequest) -> Result<PathBuf, ProcessError>;
}
