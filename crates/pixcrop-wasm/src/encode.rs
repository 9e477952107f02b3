//! Image encoding WASM bindings.
//!
//! The browser host has no filesystem, so export writes the encoded bytes
//! through the File System Access API (or a download link) itself.
//!
//! # Example
//!
//! ```typescript
//! import { encode_surface } from '@pixcrop/wasm';
//!
//! const bytes = encode_surface(baked, 'jpeg', 90);
//! await writable.write(new Blob([bytes], { type: 'image/jpeg' }));
//! ```

use std::str::FromStr;

use crate::types::{js_error, JsSurface};
use pixcrop_core::encode::{self, OutputFormat};
use wasm_bindgen::prelude::*;

/// Encode a surface as `png` or `jpeg` (`jpg` is accepted).
///
/// JPEG output flattens transparency over white; `quality` (1-100) is
/// ignored for PNG.
#[wasm_bindgen]
pub fn encode_surface(image: &JsSurface, format: &str, quality: u8) -> Result<Vec<u8>, JsValue> {
    let format = OutputFormat::from_str(format).map_err(js_error)?;
    let surface = image.to_surface().map_err(js_error)?;
    encode::encode(&surface, format, quality).map_err(js_error)
}

/// MIME type for an output format name, for building a `Blob`.
#[wasm_bindgen]
pub fn mime_type(format: &str) -> Result<String, JsValue> {
    let format = OutputFormat::from_str(format).map_err(js_error)?;
    Ok(mime_for(format).to_string())
}

fn mime_for(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Png => "image/png",
        OutputFormat::Jpeg => "image/jpeg",
    }
}
