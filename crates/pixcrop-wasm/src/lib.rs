//! Pixcrop WASM - WebAssembly bindings for Pixcrop
//!
//! This crate exposes the pixcrop-core editing session to JavaScript and
//! TypeScript hosts.
//!
//! # Module Structure
//!
//! - `editor` - The editing session: pointer events, tools, edits, apply/export
//! - `types` - WASM-compatible wrapper types for surfaces
//! - `process` - In-memory baking of apply/export requests
//! - `encode` - PNG/JPEG encoding for export
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor, JsSurface } from '@pixcrop/wasm';
//!
//! await init();
//!
//! const editor = new JsEditor();
//! editor.set_container(canvas.width, canvas.height);
//! editor.load_image(path, bitmap.width, bitmap.height, new JsSurface(w, h, rgba));
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod encode;
mod process;
mod types;

pub use editor::JsEditor;
pub use encode::{encode_surface, mime_type};
pub use process::process_edits;
pub use types::JsSurface;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
