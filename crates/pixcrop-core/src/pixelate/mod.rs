//! Freehand pixelation (mosaic redaction).
//!
//! Strokes are captured as normalized points in natural image space with a
//! radius relative to the larger image dimension, so the same stroke list
//! renders identically on a downscaled preview and on the full-resolution
//! source.
//!
//! ## Lifecycle
//!
//! 1. [`PaintGesture::begin`] on pointer down inside the image
//! 2. [`PaintGesture::extend`] on each in-bounds pointer move
//! 3. [`PaintGesture::finish`] on pointer up or leave, committing into
//!    [`StrokeHistory`] and clearing redo
//!
//! Rendering is a pure function of the base surface, the committed strokes
//! and the optional stroke in progress (see [`render_pixelation`]).

mod mosaic;
mod stroke;

pub use mosaic::{apply_stroke, apply_strokes, pixelate_region, render_pixelation};
pub use stroke::{brush_radius, PaintGesture, Stroke, StrokeHistory};

/// Default mosaic cell size in pixels.
pub const DEFAULT_BLOCK_SIZE: u32 = 10;
