//! Crop drag state machine.
//!
//! A gesture starts over one of the eight compass handles or the rectangle
//! body and ends on pointer release (or the pointer leaving the surface).
//! Every update recomputes the rectangle from the snapshot taken at gesture
//! start plus the total pointer delta, so rounding never accumulates.

use serde::{Deserialize, Serialize};

use super::CropRect;

/// Which part of the crop rectangle a drag manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    Move,
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl DragMode {
    pub fn has_north(self) -> bool {
        matches!(self, DragMode::N | DragMode::NE | DragMode::NW)
    }

    pub fn has_south(self) -> bool {
        matches!(self, DragMode::S | DragMode::SE | DragMode::SW)
    }

    pub fn has_east(self) -> bool {
        matches!(self, DragMode::E | DragMode::NE | DragMode::SE)
    }

    pub fn has_west(self) -> bool {
        matches!(self, DragMode::W | DragMode::NW | DragMode::SW)
    }

    /// Whether the mode carries a horizontal (east or west) component.
    pub fn is_horizontal(self) -> bool {
        self.has_east() || self.has_west()
    }
}

/// Apply a drag to the rectangle snapshot taken at gesture start.
///
/// `dx`/`dy` are the normalized pointer delta since gesture start. When
/// `aspect` is given (normalized width / height) and the mode resizes, the
/// dimension not driven by the horizontal component is recomputed: modes
/// with an east/west part derive the height from the width, pure north/south
/// modes derive the width from the height.
pub fn drag_rect(start: &CropRect, mode: DragMode, dx: f64, dy: f64, aspect: Option<f64>) -> CropRect {
    let mut rect = *start;

    if mode == DragMode::Move {
        rect.x = start.x + dx;
        rect.y = start.y + dy;
        return rect.clamped();
    }

    if mode.has_west() {
        rect.x = start.x + dx;
        rect.width = start.width - dx;
    }
    if mode.has_east() {
        rect.width = start.width + dx;
    }
    if mode.has_north() {
        rect.y = start.y + dy;
        rect.height = start.height - dy;
    }
    if mode.has_south() {
        rect.height = start.height + dy;
    }

    if let Some(aspect) = aspect.filter(|a| a.is_finite() && *a > 0.0) {
        if mode.is_horizontal() {
            rect.height = rect.width / aspect;
        } else {
            rect.width = rect.height * aspect;
        }
    }

    rect.clamped()
}

/// Find the handle (or body) of `rect` under a normalized point.
///
/// `tolerance` is the grab distance per axis in normalized units. Corners
/// win over edges, edges over the body. Returns `None` outside the
/// rectangle and its handles.
pub fn hit_test(rect: &CropRect, point: (f64, f64), tolerance: (f64, f64)) -> Option<DragMode> {
    let (px, py) = point;
    let (tx, ty) = tolerance;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    let within_x = px >= rect.x - tx && px <= right + tx;
    let within_y = py >= rect.y - ty && py <= bottom + ty;
    if !within_x || !within_y {
        return None;
    }

    let dist_left = (px - rect.x).abs();
    let dist_right = (px - right).abs();
    let dist_top = (py - rect.y).abs();
    let dist_bottom = (py - bottom).abs();

    // When handles overlap on a tiny rectangle, take the closer edge
    let west = dist_left <= tx && dist_left <= dist_right;
    let east = !west && dist_right <= tx;
    let north = dist_top <= ty && dist_top <= dist_bottom;
    let south = !north && dist_bottom <= ty;

    let mode = match (north, south, east, west) {
        (true, _, true, _) => DragMode::NE,
        (true, _, _, true) => DragMode::NW,
        (_, true, true, _) => DragMode::SE,
        (_, true, _, true) => DragMode::SW,
        (true, _, _, _) => DragMode::N,
        (_, true, _, _) => DragMode::S,
        (_, _, true, _) => DragMode::E,
        (_, _, _, true) => DragMode::W,
        _ => {
            let inside = px > rect.x && px < right && py > rect.y && py < bottom;
            if !inside {
                return None;
            }
            DragMode::Move
        }
    };
    Some(mode)
}

/// Crop interaction state: idle, or dragging with a start snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropGesture {
    #[default]
    Idle,
    Dragging {
        mode: DragMode,
        origin: (f64, f64),
        start: CropRect,
    },
}

impl CropGesture {
    /// Try to start a drag at a normalized point.
    ///
    /// Returns `true` and enters `Dragging` when the point is over a handle
    /// or the body; clicks elsewhere leave the gesture idle.
    pub fn begin(&mut self, point: (f64, f64), rect: &CropRect, tolerance: (f64, f64)) -> bool {
        match hit_test(rect, point, tolerance) {
            Some(mode) => {
                *self = CropGesture::Dragging {
                    mode,
                    origin: point,
                    start: *rect,
                };
                true
            }
            None => false,
        }
    }

    /// Compute the rectangle for the current pointer position, or `None`
    /// when no drag is active.
    pub fn update(&self, point: (f64, f64), aspect: Option<f64>) -> Option<CropRect> {
        match self {
            CropGesture::Idle => None,
            CropGesture::Dragging {
                mode,
                origin,
                start,
            } => {
                let dx = point.0 - origin.0;
                let dy = point.1 - origin.1;
                Some(drag_rect(start, *mode, dx, dy, aspect))
            }
        }
    }

    /// End the drag. Returns whether a drag was active.
    pub fn end(&mut self) -> bool {
        let was_active = self.is_active();
        *self = CropGesture::Idle;
        was_active
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CropGesture::Dragging { .. })
    }

    pub fn mode(&self) -> Option<DragMode> {
        match self {
            CropGesture::Idle => None,
            CropGesture::Dragging { mode, .. } => Some(*mode),
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mode_strategy() -> impl Strategy<Value = DragMode> {
        prop::sample::select(vec![
            DragMode::Move,
            DragMode::N,
            DragMode::S,
            DragMode::E,
            DragMode::W,
            DragMode::NE,
            DragMode::NW,
            DragMode::SE,
            DragMode::SW,
        ])
    }

    /// Strategy for a valid starting rectangle.
    fn rect_strategy() -> impl Strategy<Value = CropRect> {
        (0.02f64..=1.0, 0.02f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(w, h, fx, fy)| {
            CropRect::new(fx * (1.0 - w), fy * (1.0 - h), w, h)
        })
    }

    fn aspect_strategy() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![Just(None), (0.1f64..10.0).prop_map(Some)]
    }

    proptest! {
        /// Property: every drag keeps the rectangle within the invariants.
        #[test]
        fn prop_drag_preserves_invariants(
            start in rect_strategy(),
            mode in mode_strategy(),
            dx in -3.0f64..3.0,
            dy in -3.0f64..3.0,
            aspect in aspect_strategy(),
        ) {
            let rect = drag_rect(&start, mode, dx, dy, aspect);
            prop_assert!(rect.is_valid(), "invalid rect {:?}", rect);
        }

        /// Property: a sequence of gestures never escapes the invariants.
        #[test]
        fn prop_drag_sequence_preserves_invariants(
            start in rect_strategy(),
            steps in prop::collection::vec(
                (mode_strategy(), -1.5f64..1.5, -1.5f64..1.5),
                1..20,
            ),
            aspect in aspect_strategy(),
        ) {
            let mut rect = start;
            for (mode, dx, dy) in steps {
                rect = drag_rect(&rect, mode, dx, dy, aspect);
                prop_assert!(rect.is_valid(), "invalid rect {:?}", rect);
            }
        }

        /// Property: a zero delta on a valid rectangle changes nothing
        /// unless the aspect lock reshapes it.
        #[test]
        fn prop_zero_delta_is_identity(
            start in rect_strategy(),
            mode in mode_strategy(),
        ) {
            let rect = drag_rect(&start, mode, 0.0, 0.0, None);
            prop_assert!((rect.x - start.x).abs() < 1e-12);
            prop_assert!((rect.y - start.y).abs() < 1e-12);
            prop_assert!((rect.width - start.width).abs() < 1e-12);
            prop_assert!((rect.height - start.height).abs() < 1e-12);
        }
    }
}
