//! Editing session bindings.
//!
//! [`JsEditor`] wraps one [`EditorSession`]. The host forwards pointer
//! events in container pixels, redraws when a handler returns `true`, and
//! performs apply/export round trips itself:
//!
//! ```typescript
//! const request = editor.begin_apply();
//! try {
//!   const { width, height, preview, path } = await processor.apply(request);
//!   editor.finish_apply(width, height, preview, path);
//! } catch (e) {
//!   editor.fail_request();
//! }
//! ```

use crate::types::{js_error, tool_from_str, tool_name, JsSurface};
use pixcrop_core::{AspectPreset, EditorConfig, EditorSession, ExportOptions, OpenedImage};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsEditor {
    inner: EditorSession,
}

impl Default for JsEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor with default settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: EditorSession::new(EditorConfig::default()),
        }
    }

    /// Create an editor from a partial `EditorConfig` object
    pub fn with_config(config: JsValue) -> Result<JsEditor, JsValue> {
        let config: EditorConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
        Ok(Self {
            inner: EditorSession::new(config),
        })
    }

    // ===== Image =====

    /// Install an opened image.
    ///
    /// `width`/`height` are the natural size of the file at `path`; the
    /// preview may be smaller.
    pub fn load_image(
        &mut self,
        path: String,
        width: u32,
        height: u32,
        preview: &JsSurface,
    ) -> Result<(), JsValue> {
        let preview = preview.to_surface().map_err(js_error)?;
        self.inner.load_image(
            path,
            OpenedImage {
                width,
                height,
                preview,
            },
        );
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.image().is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn source_path(&self) -> Option<String> {
        self.inner
            .source_path()
            .map(|p| p.to_string_lossy().into_owned())
    }

    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> Option<u32> {
        self.inner.display_dimensions().map(|(w, _)| w)
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> Option<u32> {
        self.inner.display_dimensions().map(|(_, h)| h)
    }

    // ===== Viewport =====

    pub fn set_container(&mut self, width: f64, height: f64) {
        self.inner.set_container((width, height));
    }

    pub fn fit_to_container(&mut self) {
        self.inner.fit_to_container();
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.viewport().zoom()
    }

    #[wasm_bindgen(setter)]
    pub fn set_zoom(&mut self, zoom: f64) {
        self.inner.set_zoom(zoom);
    }

    /// Wheel zoom about the pointer position
    pub fn zoom_at(&mut self, factor: f64, x: f64, y: f64, container_width: f64, container_height: f64) {
        self.inner
            .zoom_at(factor, (x, y), (container_width, container_height));
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.inner.pan_by(dx, dy);
    }

    /// Where the image lands in the container, as `{ x, y, width, height }`
    pub fn rendered_rect(&self, container_width: f64, container_height: f64) -> Result<JsValue, JsValue> {
        let rect = self.inner.rendered_rect((container_width, container_height));
        serde_wasm_bindgen::to_value(&rect).map_err(js_error)
    }

    /// The crop rectangle in container pixels, for the overlay
    pub fn crop_overlay(&self, container_width: f64, container_height: f64) -> Result<JsValue, JsValue> {
        let rect = self.inner.crop_overlay((container_width, container_height));
        serde_wasm_bindgen::to_value(&rect).map_err(js_error)
    }

    // ===== Tools and pointer =====

    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> String {
        tool_name(self.inner.tool()).to_string()
    }

    /// Switch tools: `pan`, `crop`, `pixelate` or `pick_color`
    pub fn set_tool(&mut self, name: &str) -> Result<(), JsValue> {
        let tool = tool_from_str(name).ok_or_else(|| js_error(format!("Unknown tool: {}", name)))?;
        self.inner.set_tool(tool);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn brush_size(&self) -> f64 {
        self.inner.brush_size()
    }

    #[wasm_bindgen(setter)]
    pub fn set_brush_size(&mut self, size: f64) {
        self.inner.set_brush_size(size);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, container_width: f64, container_height: f64) -> bool {
        self.inner
            .pointer_down((x, y), (container_width, container_height))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, container_width: f64, container_height: f64) -> bool {
        self.inner
            .pointer_move((x, y), (container_width, container_height))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, container_width: f64, container_height: f64) -> bool {
        self.inner
            .pointer_up((x, y), (container_width, container_height))
    }

    pub fn pointer_leave(&mut self, x: f64, y: f64, container_width: f64, container_height: f64) -> bool {
        self.inner
            .pointer_leave((x, y), (container_width, container_height))
    }

    // ===== Edits =====

    pub fn rotate_cw(&mut self) {
        self.inner.rotate_cw();
    }

    pub fn rotate_ccw(&mut self) {
        self.inner.rotate_ccw();
    }

    pub fn toggle_flip_h(&mut self) {
        self.inner.toggle_flip_h();
    }

    pub fn toggle_flip_v(&mut self) {
        self.inner.toggle_flip_v();
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> i32 {
        self.inner.edit().rotation.degrees()
    }

    #[wasm_bindgen(getter)]
    pub fn grayscale(&self) -> bool {
        self.inner.edit().grayscale
    }

    #[wasm_bindgen(setter)]
    pub fn set_grayscale(&mut self, value: bool) {
        self.inner.set_grayscale(value);
    }

    /// Brightness slider value (-100 to 100)
    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> i32 {
        self.inner.edit().brightness()
    }

    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: i32) {
        self.inner.set_brightness(value);
    }

    /// Contrast slider value (-100 to 100)
    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> i32 {
        self.inner.edit().contrast()
    }

    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: i32) {
        self.inner.set_contrast(value);
    }

    #[wasm_bindgen(getter)]
    pub fn block_size(&self) -> u32 {
        self.inner.edit().block_size()
    }

    #[wasm_bindgen(setter)]
    pub fn set_block_size(&mut self, value: u32) {
        self.inner.set_block_size(value);
    }

    /// Enable or disable background removal; tolerance is 0 to 100
    pub fn set_bg_removal(&mut self, enabled: bool, tolerance: u32) {
        self.inner.set_bg_removal(enabled, tolerance);
    }

    pub fn set_bg_color(&mut self, r: u8, g: u8, b: u8) {
        self.inner.set_bg_color([r, g, b]);
    }

    /// Background removal state as `{ enabled, color, tolerance }`
    pub fn bg_removal(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.edit().bg_removal).map_err(js_error)
    }

    /// Select an aspect preset, e.g. `{ kind: "ratio", width: 16, height: 9 }`
    pub fn select_aspect_preset(&mut self, preset: JsValue) -> Result<(), JsValue> {
        let preset: AspectPreset = serde_wasm_bindgen::from_value(preset).map_err(js_error)?;
        self.inner.select_aspect_preset(preset);
        Ok(())
    }

    /// Presets for the crop toolbar as `[[preset, label], ...]`
    pub fn aspect_presets(&self) -> Result<JsValue, JsValue> {
        let presets: Vec<(AspectPreset, String)> = AspectPreset::ALL
            .iter()
            .map(|p| (*p, p.label()))
            .collect();
        serde_wasm_bindgen::to_value(&presets).map_err(js_error)
    }

    pub fn set_target_size(&mut self, width: u32, height: u32) {
        self.inner.set_target_size(width, height);
    }

    #[wasm_bindgen(getter)]
    pub fn target_width(&self) -> u32 {
        self.inner.edit().target_size().0
    }

    #[wasm_bindgen(getter)]
    pub fn target_height(&self) -> u32 {
        self.inner.edit().target_size().1
    }

    /// Current crop rectangle, normalized to the displayed image
    pub fn crop(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.edit().crop).map_err(js_error)
    }

    pub fn reset_crop(&mut self) {
        self.inner.reset_crop();
    }

    // ===== History =====

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // ===== Rendering =====

    /// The preview with strokes applied, in display orientation
    pub fn render_preview(&self) -> Option<JsSurface> {
        self.inner.render_preview().map(JsSurface::from_surface)
    }

    /// CSS `filter` value for the preview element
    pub fn preview_filter_css(&self) -> String {
        self.inner.preview_filter().to_css()
    }

    // ===== Apply and export =====

    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Start an apply, returning the request object for the processor
    pub fn begin_apply(&mut self) -> Result<JsValue, JsValue> {
        let request = self.inner.begin_apply().map_err(js_error)?;
        serde_wasm_bindgen::to_value(&request).map_err(js_error)
    }

    /// Start an export from `{ output_path, output_format, jpeg_quality, mode }`
    pub fn begin_export(&mut self, options: JsValue) -> Result<JsValue, JsValue> {
        let options: ExportOptions = serde_wasm_bindgen::from_value(options).map_err(js_error)?;
        let request = self.inner.begin_export(&options).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&request).map_err(js_error)
    }

    /// Complete an apply with the baked image
    pub fn finish_apply(
        &mut self,
        width: u32,
        height: u32,
        preview: &JsSurface,
        applied_path: String,
    ) -> Result<(), JsValue> {
        let preview = preview.to_surface().map_err(js_error)?;
        self.inner
            .finish_apply(
                OpenedImage {
                    width,
                    height,
                    preview,
                },
                applied_path,
            )
            .map_err(js_error)
    }

    pub fn finish_export(&mut self) -> Result<(), JsValue> {
        self.inner.finish_export().map_err(js_error)
    }

    /// Abandon the outstanding request after a processor failure
    pub fn fail_request(&mut self) -> Result<(), JsValue> {
        let kind = self.inner.fail_request().map_err(js_error)?;
        web_sys::console::warn_1(&JsValue::from_str(&format!("pixcrop: {:?} request failed", kind)));
        Ok(())
    }
}
