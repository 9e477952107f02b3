//! The editing session: one owner for the loaded image, the viewport, the
//! pending edits and every in-progress gesture.
//!
//! Hosts feed pointer events and toolbar actions in and read the rendered
//! preview, the preview filter and the crop overlay back out. Apply and
//! export run through the [`Compositor`](crate::export::Compositor), either
//! as a two-phase request/response (for asynchronous hosts) or
//! synchronously against an [`ImageProcessor`](crate::processor::ImageProcessor).

mod pointer;
mod requests;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::adjustments::PreviewFilter;
use crate::config::EditorConfig;
use crate::crop::{AspectPreset, CropGesture};
use crate::edit::EditState;
use crate::export::Compositor;
use crate::geometry::{normalized_to_pointer, pointer_to_normalized, ScreenRect};
use crate::pixelate::{render_pixelation, PaintGesture};
use crate::processor::OpenedImage;
use crate::surface::Surface;
use crate::transform::orient;
use crate::viewport::Viewport;

/// The currently loaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSession {
    /// Backing file the edits will be baked from.
    pub source: PathBuf,
    /// Natural (unrotated, unflipped) width.
    pub width: u32,
    /// Natural height.
    pub height: u32,
    /// Natural-orientation surface the preview is rendered from.
    pub preview: Surface,
}

impl ImageSession {
    pub fn new(source: impl Into<PathBuf>, opened: OpenedImage) -> Self {
        Self {
            source: source.into(),
            width: opened.width,
            height: opened.height,
            preview: opened.preview,
        }
    }

    pub fn natural_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// What a pointer press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Pan,
    Crop,
    Pixelate,
    PickColor,
}

/// Owner of all editing state for one window.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    image: Option<ImageSession>,
    viewport: Viewport,
    edit: EditState,
    tool: Tool,
    brush_size: f64,
    crop_gesture: CropGesture,
    paint: PaintGesture,
    /// Last container position while panning.
    pan_anchor: Option<(f64, f64)>,
    compositor: Compositor,
    container: Option<(f64, f64)>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            image: None,
            viewport: Viewport::default(),
            edit: EditState::new((0, 0), config.block_size),
            tool: Tool::default(),
            brush_size: config.brush_size,
            crop_gesture: CropGesture::Idle,
            paint: PaintGesture::Idle,
            pan_anchor: None,
            compositor: Compositor::new(),
            container: None,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&ImageSession> {
        self.image.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.image.as_ref().map(|img| img.source.as_path())
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_busy(&self) -> bool {
        self.compositor.is_busy()
    }

    /// Install a freshly opened image, dropping all edits and gestures.
    pub fn load_image(&mut self, source: impl Into<PathBuf>, opened: OpenedImage) {
        let image = ImageSession::new(source, opened);
        self.edit = EditState::new(image.natural_size(), self.config.block_size);
        self.image = Some(image);
        self.cancel_gestures();
        self.viewport = Viewport::default();
        self.fit_to_container();
    }

    fn cancel_gestures(&mut self) {
        self.crop_gesture = CropGesture::Idle;
        self.paint = PaintGesture::Idle;
        self.pan_anchor = None;
    }

    /// Display-space size of the loaded image.
    pub fn display_dimensions(&self) -> Option<(u32, u32)> {
        self.image
            .as_ref()
            .map(|img| self.edit.display_dimensions(img.natural_size()))
    }

    // ===== Tools =====

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. A stroke in progress is committed, a crop drag ends.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.paint.finish(&mut self.edit.strokes) {
            debug!("Committed stroke on tool switch");
        }
        self.crop_gesture.end();
        self.pan_anchor = None;
        self.tool = tool;
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Brush size in natural image pixels.
    pub fn set_brush_size(&mut self, size: f64) {
        if size.is_finite() {
            self.brush_size = size.max(1.0);
        }
    }

    // ===== Viewport =====

    /// Remember the container size and fit the image into it.
    pub fn set_container(&mut self, container: (f64, f64)) {
        self.container = Some(container);
        self.fit_to_container();
    }

    /// Fit the image into the last known container, resetting pan.
    pub fn fit_to_container(&mut self) {
        if let (Some(container), Some(display)) = (self.container, self.display_dimensions()) {
            self.viewport.fit(container, display, self.config.fit_margin);
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    /// Zoom by `factor` about a container position.
    pub fn zoom_at(&mut self, factor: f64, anchor: (f64, f64), container: (f64, f64)) {
        if let Some(display) = self.display_dimensions() {
            self.viewport.zoom_at(factor, anchor, container, display);
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    /// Where the displayed image lands in the container.
    pub fn rendered_rect(&self, container: (f64, f64)) -> Option<ScreenRect> {
        self.display_dimensions()
            .map(|display| self.viewport.rendered_rect(container, display))
    }

    /// Map a container position to display-normalized coordinates.
    pub fn pointer_to_display(&self, pointer: (f64, f64), container: (f64, f64)) -> Option<(f64, f64)> {
        self.rendered_rect(container)
            .map(|rect| pointer_to_normalized(pointer, &rect))
    }

    /// The crop rectangle in container coordinates, for drawing the overlay.
    pub fn crop_overlay(&self, container: (f64, f64)) -> Option<ScreenRect> {
        let rendered = self.rendered_rect(container)?;
        let crop = self.edit.crop;
        let (x, y) = normalized_to_pointer((crop.x, crop.y), &rendered);
        Some(ScreenRect::new(
            x,
            y,
            crop.width * rendered.width,
            crop.height * rendered.height,
        ))
    }

    // ===== Edits =====

    pub fn rotate_cw(&mut self) {
        self.edit.rotate_cw();
        self.fit_to_container();
    }

    pub fn rotate_ccw(&mut self) {
        self.edit.rotate_ccw();
        self.fit_to_container();
    }

    pub fn toggle_flip_h(&mut self) {
        self.edit.toggle_flip_h();
    }

    pub fn toggle_flip_v(&mut self) {
        self.edit.toggle_flip_v();
    }

    pub fn set_grayscale(&mut self, grayscale: bool) {
        self.edit.grayscale = grayscale;
    }

    pub fn set_brightness(&mut self, value: i32) {
        self.edit.set_brightness(value);
    }

    pub fn set_contrast(&mut self, value: i32) {
        self.edit.set_contrast(value);
    }

    pub fn set_block_size(&mut self, block_size: u32) {
        self.edit.set_block_size(block_size);
    }

    pub fn set_bg_removal(&mut self, enabled: bool, tolerance: u32) {
        self.edit.bg_removal.enabled = enabled;
        self.edit.bg_removal.tolerance = tolerance.min(100);
    }

    pub fn set_bg_color(&mut self, color: [u8; 3]) {
        self.edit.bg_removal.color = color;
    }

    pub fn select_aspect_preset(&mut self, preset: AspectPreset) {
        if let Some(display) = self.display_dimensions() {
            self.edit.select_aspect_preset(preset, display);
        }
    }

    pub fn set_target_size(&mut self, width: u32, height: u32) {
        if self.image.is_some() {
            self.edit.set_target_size(width, height);
        }
    }

    pub fn reset_crop(&mut self) {
        self.edit.reset_crop();
    }

    /// Undo the last committed stroke.
    pub fn undo(&mut self) -> bool {
        let changed = self.edit.strokes.undo();
        if changed {
            debug!("Undo stroke, {} remain", self.edit.strokes.applied().len());
        }
        changed
    }

    /// Redo the last undone stroke.
    pub fn redo(&mut self) -> bool {
        let changed = self.edit.strokes.redo();
        if changed {
            debug!("Redo stroke, {} applied", self.edit.strokes.applied().len());
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.edit.strokes.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.edit.strokes.can_redo()
    }

    // ===== Rendering =====

    /// Render the preview in display orientation: committed strokes plus
    /// the stroke in progress, computed fresh from the base surface.
    pub fn render_preview(&self) -> Option<Surface> {
        let image = self.image.as_ref()?;
        let pixelated = render_pixelation(
            &image.preview,
            self.edit.strokes.applied(),
            self.paint.in_progress(),
            self.edit.block_size(),
        );
        let orientation = self.edit.orientation();
        if orientation.is_identity() {
            return Some(pixelated);
        }
        match orient(&pixelated, orientation) {
            Ok(oriented) => Some(oriented),
            Err(e) => {
                warn!("Failed to orient preview: {}", e);
                None
            }
        }
    }

    /// Display-only brightness/contrast/grayscale filter for the preview.
    pub fn preview_filter(&self) -> PreviewFilter {
        self.edit.preview_filter()
    }
}
