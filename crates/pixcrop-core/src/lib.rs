//! Pixcrop Core - Interactive image editing model
//!
//! This crate provides the editing model behind Pixcrop: normalized crop and
//! viewport geometry, the crop drag state machine, freehand pixelation with
//! undo/redo, chroma-key background removal, and the processor that bakes a
//! request into a new image file.
//!
//! Everything here is host-agnostic. The WASM bindings and the command line
//! host drive an [`EditorSession`] and an [`ImageProcessor`].

pub mod adjustments;
pub mod chroma;
pub mod config;
pub mod crop;
pub mod edit;
pub mod encode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod pixelate;
pub mod processor;
pub mod recent;
pub mod session;
pub mod surface;
pub mod transform;
pub mod viewport;

pub use adjustments::PreviewFilter;
pub use config::{EditorConfig, ProcessorConfig};
pub use crop::{AspectPreset, CropRect, DragMode};
pub use edit::{BgRemoval, EditState};
pub use encode::OutputFormat;
pub use error::EditorError;
pub use export::{ApplyRequest, Compositor, EditRequest, ExportOptions, ExportRequest, RequestKind};
pub use geometry::{Orientation, Rotation, ScreenRect};
pub use pixelate::{Stroke, StrokeHistory};
pub use processor::{ImageProcessor, LocalProcessor, OpenedImage, ProcessError};
pub use recent::{JsonRecentFiles, RecentFilesStore};
pub use session::{EditorSession, ImageSession, Tool};
pub use surface::Surface;
pub use transform::{FilterType, ScaleMode};
pub use viewport::Viewport;
