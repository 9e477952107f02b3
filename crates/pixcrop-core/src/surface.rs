//! RGBA pixel surfaces.
//!
//! Every pixel algorithm in this crate works on a [`Surface`]: a row-major
//! RGBA8 buffer. Conversions to and from `image::RgbaImage` are provided for
//! the stages that lean on the `image` crate (decode, orientation, resize,
//! encode).

/// Bytes per pixel (red, green, blue, alpha).
pub const CHANNELS: usize = 4;

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Surface {
    /// Create a new Surface with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a surface filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Surface from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Create a Surface from any decoded image.
    pub fn from_dynamic(img: &image::DynamicImage) -> Self {
        Self::from_rgba_image(img.to_rgba8())
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Consume the surface into an image::RgbaImage without copying.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Dimensions as a `(width, height)` pair.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty/invalid surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_creation() {
        let surface = Surface::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(surface.dimensions(), (100, 50));
        assert_eq!(surface.pixel_count(), 5000);
        assert!(!surface.is_empty());
    }

    #[test]
    fn test_surface_empty() {
        let surface = Surface::new(0, 0, vec![]);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_filled_surface() {
        let surface = Surface::filled(3, 2, [10, 20, 30, 255]);
        assert_eq!(surface.pixels.len(), 3 * 2 * 4);
        assert_eq!(surface.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let mut surface = Surface::filled(2, 2, [0, 0, 0, 255]);
        assert_eq!(surface.pixel(2, 0), None);

        // Ignored rather than panicking
        surface.set_pixel(5, 5, [1, 2, 3, 4]);
        assert_eq!(surface, Surface::filled(2, 2, [0, 0, 0, 255]));
    }

    #[test]
    fn test_set_pixel_row_major() {
        let mut surface = Surface::filled(4, 4, [0, 0, 0, 0]);
        surface.set_pixel(1, 2, [9, 8, 7, 6]);

        let i = (2 * 4 + 1) * 4;
        assert_eq!(&surface.pixels[i..i + 4], &[9, 8, 7, 6]);
    }

    #[test]
    fn test_rgba_image_conversion() {
        let surface = Surface::filled(5, 3, [1, 2, 3, 4]);
        let img = surface.to_rgba_image().unwrap();
        assert_eq!(img.dimensions(), (5, 3));

        let back = Surface::from_rgba_image(img);
        assert_eq!(back, surface);
    }

    #[test]
    fn test_to_rgba_image_rejects_bad_buffer() {
        let surface = Surface {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        assert!(surface.to_rgba_image().is_none());
    }
}
