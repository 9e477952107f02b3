//! Orientation and normalized coordinate mapping.
//!
//! # Coordinate spaces
//!
//! - **Natural space**: the decoded image as stored, unrotated and unflipped.
//! - **Display space**: `flip(rotate(natural))`. Rotation is applied first
//!   (clockwise quarter turns), then the horizontal and vertical flips.
//!
//! Normalized coordinates are fractions (0.0 to 1.0) of a space's width and
//! height, with the origin at the top-left corner.

use serde::{Deserialize, Serialize};

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Normalize any degree value into the quarter-turn set.
    ///
    /// Values are wrapped into [0, 360) and snapped to the nearest quarter
    /// turn, so `-90` becomes `Deg270` and `450` becomes `Deg90`.
    pub fn from_degrees(degrees: i32) -> Self {
        let wrapped = degrees.rem_euclid(360);
        match ((wrapped + 45) / 90) % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotate a further quarter turn clockwise.
    pub fn clockwise(self) -> Self {
        Self::from_degrees(self.degrees() + 90)
    }

    /// Rotate a quarter turn counter-clockwise.
    pub fn counter_clockwise(self) -> Self {
        Self::from_degrees(self.degrees() - 90)
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl From<i32> for Rotation {
    fn from(value: i32) -> Self {
        Rotation::from_degrees(value)
    }
}

impl From<Rotation> for i32 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

/// The full display orientation of an image: rotation followed by flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub rotation: Rotation,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Orientation {
    pub fn new(rotation: Rotation, flip_h: bool, flip_v: bool) -> Self {
        Self {
            rotation,
            flip_h,
            flip_v,
        }
    }

    /// Check whether this orientation leaves the image untouched.
    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::Deg0 && !self.flip_h && !self.flip_v
    }

    /// Map a natural-space normalized point into display space.
    pub fn natural_to_display(&self, nx: f64, ny: f64) -> (f64, f64) {
        let (mut x, mut y) = match self.rotation {
            Rotation::Deg0 => (nx, ny),
            Rotation::Deg90 => (1.0 - ny, nx),
            Rotation::Deg180 => (1.0 - nx, 1.0 - ny),
            Rotation::Deg270 => (ny, 1.0 - nx),
        };
        if self.flip_h {
            x = 1.0 - x;
        }
        if self.flip_v {
            y = 1.0 - y;
        }
        (x, y)
    }

    /// Map a display-space normalized point back into natural space.
    ///
    /// Inverts the flips first, then the rotation.
    pub fn display_to_natural(&self, dx: f64, dy: f64) -> (f64, f64) {
        let x = if self.flip_h { 1.0 - dx } else { dx };
        let y = if self.flip_v { 1.0 - dy } else { dy };
        match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (y, 1.0 - x),
            Rotation::Deg180 => (1.0 - x, 1.0 - y),
            Rotation::Deg270 => (1.0 - y, x),
        }
    }
}

/// Display dimensions of a natural `width` x `height` image under `rotation`.
///
/// 90 and 270 degree rotations swap the dimensions.
pub fn display_dimensions(width: u32, height: u32, rotation: Rotation) -> (u32, u32) {
    if rotation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    }
}

/// An axis-aligned rectangle in container (display pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Convert a container-space pointer position into normalized display
/// coordinates relative to `rendered`.
///
/// The result may fall outside [0, 1] when the pointer is outside the
/// rendered image; callers check [`in_bounds`] before accepting a point.
pub fn pointer_to_normalized(pointer: (f64, f64), rendered: &ScreenRect) -> (f64, f64) {
    let nx = if rendered.width > 0.0 {
        (pointer.0 - rendered.x) / rendered.width
    } else {
        0.0
    };
    let ny = if rendered.height > 0.0 {
        (pointer.1 - rendered.y) / rendered.height
    } else {
        0.0
    };
    (nx, ny)
}

/// Inverse of [`pointer_to_normalized`].
pub fn normalized_to_pointer(point: (f64, f64), rendered: &ScreenRect) -> (f64, f64) {
    (
        rendered.x + point.0 * rendered.width,
        rendered.y + point.1 * rendered.height,
    )
}

/// Check whether a normalized point lies within [0, 1] x [0, 1].
#[inline]
pub fn in_bounds(point: (f64, f64)) -> bool {
    (0.0..=1.0).contains(&point.0) && (0.0..=1.0).contains(&point.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
    }

    #[test]
    fn test_rotation_from_degrees_normalizes() {
        assert_eq!(Rotation::from_degrees(0), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(90), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(-90), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(360), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(450), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(-180), Rotation::Deg180);
        // Snaps to nearest quarter turn
        assert_eq!(Rotation::from_degrees(100), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(350), Rotation::Deg0);
    }

    #[test]
    fn test_rotation_stepping() {
        assert_eq!(Rotation::Deg270.clockwise(), Rotation::Deg0);
        assert_eq!(Rotation::Deg0.counter_clockwise(), Rotation::Deg270);
        assert_eq!(Rotation::Deg90.clockwise().clockwise(), Rotation::Deg270);
    }

    #[test]
    fn test_rotation_serializes_as_degrees() {
        let json = serde_json::to_string(&Rotation::Deg270).unwrap();
        assert_eq!(json, "270");

        let parsed: Rotation = serde_json::from_str("-90").unwrap();
        assert_eq!(parsed, Rotation::Deg270);
    }

    #[test]
    fn test_display_dimensions() {
        assert_eq!(display_dimensions(800, 600, Rotation::Deg90), (600, 800));
        assert_eq!(display_dimensions(800, 600, Rotation::Deg0), (800, 600));
        assert_eq!(display_dimensions(800, 600, Rotation::Deg180), (800, 600));
        assert_eq!(display_dimensions(800, 600, Rotation::Deg270), (600, 800));
    }

    #[test]
    fn test_natural_to_display_rotate_90() {
        // Top-left of the natural image ends up top-right after a clockwise turn
        let o = Orientation::new(Rotation::Deg90, false, false);
        assert!(approx(o.natural_to_display(0.0, 0.0), (1.0, 0.0)));
        assert!(approx(o.natural_to_display(1.0, 0.0), (1.0, 1.0)));
    }

    #[test]
    fn test_flip_mirrors_axis() {
        let o = Orientation::new(Rotation::Deg0, true, false);
        assert!(approx(o.natural_to_display(0.25, 0.4), (0.75, 0.4)));

        let o = Orientation::new(Rotation::Deg0, false, true);
        assert!(approx(o.natural_to_display(0.25, 0.4), (0.25, 0.6)));
    }

    #[test]
    fn test_display_to_natural_inverts_all_orientations() {
        let point = (0.2, 0.7);
        for rotation in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            for flip_h in [false, true] {
                for flip_v in [false, true] {
                    let o = Orientation::new(rotation, flip_h, flip_v);
                    let (dx, dy) = o.natural_to_display(point.0, point.1);
                    assert!(
                        approx(o.display_to_natural(dx, dy), point),
                        "round trip failed for {:?}",
                        o
                    );
                }
            }
        }
    }

    #[test]
    fn test_pointer_to_normalized() {
        let rect = ScreenRect::new(100.0, 50.0, 400.0, 200.0);
        assert!(approx(pointer_to_normalized((300.0, 150.0), &rect), (0.5, 0.5)));
        assert!(approx(pointer_to_normalized((100.0, 50.0), &rect), (0.0, 0.0)));

        // Outside the rendered image
        let outside = pointer_to_normalized((50.0, 300.0), &rect);
        assert!(outside.0 < 0.0);
        assert!(outside.1 > 1.0);
        assert!(!in_bounds(outside));
    }

    #[test]
    fn test_pointer_to_normalized_degenerate_rect() {
        let rect = ScreenRect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(pointer_to_normalized((10.0, 10.0), &rect), (0.0, 0.0));
    }

    #[test]
    fn test_normalized_to_pointer() {
        let rect = ScreenRect::new(10.0, 20.0, 100.0, 50.0);
        assert!(approx(normalized_to_pointer((0.5, 0.5), &rect), (60.0, 45.0)));
    }
}
