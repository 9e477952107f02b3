//! Edit/export compositor: turns the pending [`EditState`] into one
//! deterministic request for the image processor.
//!
//! Geometry crosses the boundary exactly as held in the edit state:
//! normalized crop rectangle (display space) and normalized strokes
//! (natural space). The processor resolves pixels against the source
//! image's natural dimensions.
//!
//! Only one apply or export may be outstanding per session; the
//! compositor tracks that with an in-flight marker and rejects overlaps.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::crop::CropRect;
use crate::edit::EditState;
use crate::encode::{OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::error::EditorError;
use crate::geometry::{Orientation, Rotation};
use crate::pixelate::Stroke;
use crate::transform::ScaleMode;

/// Chroma-key parameters as sent to the processor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BgRemovalSettings {
    pub enabled: bool,
    pub color: [u8; 3],
    /// Fraction in [0, 1].
    pub tolerance: f64,
}

/// The edit fields shared by apply and export requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub target_width: u32,
    #[serde(default)]
    pub target_height: u32,
    /// Display-space crop; `None` means the full frame.
    #[serde(default)]
    pub crop: Option<CropRect>,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
    #[serde(default)]
    pub grayscale: bool,
    /// Normalized delta in [-1, 1].
    #[serde(default)]
    pub brightness: f64,
    /// Normalized delta in [-1, 1].
    #[serde(default)]
    pub contrast: f64,
    #[serde(default)]
    pub pixelate_strokes: Vec<Stroke>,
    #[serde(default = "default_block_size")]
    pub pixelate_block_size: u32,
    #[serde(default)]
    pub bg_removal: Option<BgRemovalSettings>,
    #[serde(default)]
    pub mode: ScaleMode,
}

fn default_block_size() -> u32 {
    crate::pixelate::DEFAULT_BLOCK_SIZE
}

impl EditRequest {
    /// Snapshot the edit state.
    pub fn from_edit_state(edit: &EditState, mode: ScaleMode) -> Self {
        let (target_width, target_height) = edit.target_size();
        let bg = &edit.bg_removal;
        Self {
            target_width,
            target_height,
            crop: edit.effective_crop(),
            rotation: edit.rotation,
            flip_h: edit.flip_h,
            flip_v: edit.flip_v,
            grayscale: edit.grayscale,
            brightness: edit.brightness_delta(),
            contrast: edit.contrast_delta(),
            pixelate_strokes: edit.strokes.applied().to_vec(),
            pixelate_block_size: edit.block_size(),
            bg_removal: bg.enabled.then(|| BgRemovalSettings {
                enabled: true,
                color: bg.color,
                tolerance: bg.tolerance_fraction(),
            }),
            mode,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.rotation, self.flip_h, self.flip_v)
    }

    /// Background removal to perform, if any.
    pub fn active_bg_removal(&self) -> Option<&BgRemovalSettings> {
        self.bg_removal.as_ref().filter(|bg| bg.enabled)
    }
}

/// Bake edits into a new backing file and keep editing from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub source_path: PathBuf,
    #[serde(flatten)]
    pub edits: EditRequest,
}

/// Write a final output file; the session is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(flatten)]
    pub edits: EditRequest,
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

/// User choices from the export dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub output_path: PathBuf,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub mode: ScaleMode,
}

impl ExportOptions {
    pub fn new(output_path: impl Into<PathBuf>, output_format: OutputFormat) -> Self {
        Self {
            output_path: output_path.into(),
            output_format,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            mode: ScaleMode::default(),
        }
    }
}

/// Which kind of request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Apply,
    Export,
}

/// Builds requests and guards against overlapping round trips.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    in_flight: Option<RequestKind>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> Option<RequestKind> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn claim(&mut self, kind: RequestKind) -> Result<(), EditorError> {
        if self.in_flight.is_some() {
            return Err(EditorError::RequestInFlight);
        }
        self.in_flight = Some(kind);
        Ok(())
    }

    /// Start an apply. Apply always crops, then stretches to the target.
    pub fn begin_apply(
        &mut self,
        edit: &EditState,
        source_path: impl Into<PathBuf>,
    ) -> Result<ApplyRequest, EditorError> {
        self.claim(RequestKind::Apply)?;
        Ok(ApplyRequest {
            source_path: source_path.into(),
            edits: EditRequest::from_edit_state(edit, ScaleMode::CropThenScale),
        })
    }

    /// Start an export to the destination in `options`.
    pub fn begin_export(
        &mut self,
        edit: &EditState,
        source_path: impl Into<PathBuf>,
        options: &ExportOptions,
    ) -> Result<ExportRequest, EditorError> {
        self.claim(RequestKind::Export)?;
        Ok(ExportRequest {
            source_path: source_path.into(),
            output_path: options.output_path.clone(),
            output_format: options.output_format,
            jpeg_quality: options.jpeg_quality.clamp(1, 100),
            edits: EditRequest::from_edit_state(edit, options.mode),
        })
    }

    /// Complete the outstanding request of the given kind.
    ///
    /// A completion for a kind that is not outstanding is rejected and
    /// leaves the marker in place.
    pub fn finish(&mut self, kind: RequestKind) -> Result<(), EditorError> {
        if self.in_flight != Some(kind) {
            return Err(EditorError::NoPendingRequest);
        }
        self.in_flight = None;
        Ok(())
    }

    /// Abandon whatever is outstanding after a failed round trip.
    pub fn cancel(&mut self) -> Result<RequestKind, EditorError> {
        self.in_flight.take().ok_or(EditorError::NoPendingRequest)
    }
}
