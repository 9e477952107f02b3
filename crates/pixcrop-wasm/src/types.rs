//! WASM-compatible wrapper types for surfaces and tool names.

use pixcrop_core::surface::{Surface, CHANNELS};
use pixcrop_core::transform::FilterType;
use pixcrop_core::Tool;
use wasm_bindgen::prelude::*;

/// An RGBA surface wrapper for JavaScript.
///
/// The pixel layout matches `ImageData`, so `pixels()` can be handed to
/// `new ImageData(new Uint8ClampedArray(pixels), width, height)` directly.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it into a
/// JavaScript `Uint8Array`.
#[wasm_bindgen]
pub struct JsSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsSurface {
    /// Create a surface from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsSurface {
        JsSurface {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array. This copies.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsSurface {
    pub(crate) fn from_surface(surface: Surface) -> Self {
        Self {
            width: surface.width,
            height: surface.height,
            pixels: surface.pixels,
        }
    }

    /// Copy into a core surface, checking the buffer length.
    pub(crate) fn to_surface(&self) -> Result<Surface, String> {
        let expected = self.width as usize * self.height as usize * CHANNELS;
        if self.pixels.len() != expected {
            return Err(format!(
                "Invalid pixel data: expected {} bytes for {}x{}, got {}",
                expected,
                self.width,
                self.height,
                self.pixels.len()
            ));
        }
        Ok(Surface::new(self.width, self.height, self.pixels.clone()))
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest
/// - 1 = Bilinear
/// - 2 = Lanczos3
///
/// Any other value defaults to Lanczos3.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        _ => FilterType::Lanczos3,
    }
}

/// Parse a toolbar tool name: `pan`, `crop`, `pixelate` or `pick_color`.
pub(crate) fn tool_from_str(name: &str) -> Option<Tool> {
    match name {
        "pan" => Some(Tool::Pan),
        "crop" => Some(Tool::Crop),
        "pixelate" => Some(Tool::Pixelate),
        "pick_color" => Some(Tool::PickColor),
        _ => None,
    }
}

pub(crate) fn tool_name(tool: Tool) -> &'static str {
    match tool {
        Tool::Pan => "pan",
        Tool::Crop => "crop",
        Tool::Pixelate => "pixelate",
        Tool::PickColor => "pick_color",
    }
}

/// Map any displayable error into a JavaScript error value.
pub(crate) fn js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}
