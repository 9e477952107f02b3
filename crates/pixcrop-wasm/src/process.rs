//! In-memory processing for hosts without a native processor.
//!
//! ```typescript
//! const request = editor.begin_apply();
//! const baked = process_edits(source, request, 2);
//! editor.finish_apply(baked.width, baked.height, baked, request.source_path);
//! ```

use crate::types::{filter_from_u8, js_error, JsSurface};
use pixcrop_core::processor::bake;
use pixcrop_core::EditRequest;
use wasm_bindgen::prelude::*;

/// Bake an apply or export request into the full-resolution source.
///
/// `source` must be the natural-orientation image the request was built
/// against. `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn process_edits(source: &JsSurface, request: JsValue, filter: u8) -> Result<JsSurface, JsValue> {
    let edits: EditRequest = serde_wasm_bindgen::from_value(request).map_err(js_error)?;
    let surface = source.to_surface().map_err(js_error)?;
    let baked = bake(surface, &edits, filter_from_u8(filter)).map_err(js_error)?;
    Ok(JsSurface::from_surface(baked))
}
