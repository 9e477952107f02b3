//! Freehand redaction strokes, their undo/redo history, and the paint
//! gesture that captures them.

use serde::{Deserialize, Serialize};

use crate::geometry::in_bounds;

/// One committed freehand redaction gesture.
///
/// Points are normalized to the natural (unrotated, unflipped) image. The
/// radius is a fraction of the larger image dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<(f64, f64)>,
    pub radius: f64,
}

impl Stroke {
    pub fn new(radius: f64) -> Self {
        Self {
            points: Vec::new(),
            radius,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Express a brush size in image pixels as a fraction of the larger
/// display dimension.
pub fn brush_radius(brush_size: f64, display: (u32, u32)) -> f64 {
    let longest = display.0.max(display.1);
    if longest == 0 {
        return 0.0;
    }
    brush_size.max(0.0) / longest as f64
}

/// Linear undo/redo over committed strokes.
///
/// Two stacks: `applied` in commit order and `redo` holding strokes removed
/// by undo. Committing a new stroke discards the redo stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeHistory {
    applied: Vec<Stroke>,
    redo: Vec<Stroke>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strokes to render, in commit order.
    pub fn applied(&self) -> &[Stroke] {
        &self.applied
    }

    pub fn redo_stack(&self) -> &[Stroke] {
        &self.redo
    }

    /// Commit a finished stroke and clear the redo stack.
    pub fn commit(&mut self, stroke: Stroke) {
        self.applied.push(stroke);
        self.redo.clear();
    }

    /// Move the most recent stroke onto the redo stack.
    ///
    /// Returns false (and does nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.applied.pop() {
            Some(stroke) => {
                self.redo.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Move the most recently undone stroke back onto the applied stack.
    pub fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(stroke) => {
                self.applied.push(stroke);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Drop every stroke, applied and undone.
    pub fn clear(&mut self) {
        self.applied.clear();
        self.redo.clear();
    }
}

/// Paint interaction state. Only one stroke may be in progress at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PaintGesture {
    #[default]
    Idle,
    Painting(Stroke),
}

impl PaintGesture {
    /// Start a stroke at a normalized point.
    ///
    /// Refuses (and stays idle) when the point is outside the image or a
    /// stroke is already in progress.
    pub fn begin(&mut self, point: (f64, f64), radius: f64) -> bool {
        if self.is_active() || !in_bounds(point) {
            return false;
        }
        let mut stroke = Stroke::new(radius);
        stroke.points.push(point);
        *self = PaintGesture::Painting(stroke);
        true
    }

    /// Append a point to the stroke in progress.
    ///
    /// Points outside the image are skipped without aborting the stroke.
    pub fn extend(&mut self, point: (f64, f64)) -> bool {
        match self {
            PaintGesture::Painting(stroke) if in_bounds(point) => {
                stroke.points.push(point);
                true
            }
            _ => false,
        }
    }

    /// End the gesture, committing the stroke into `history`.
    ///
    /// Returns true when a stroke was committed. Empty strokes are dropped
    /// without touching the redo stack.
    pub fn finish(&mut self, history: &mut StrokeHistory) -> bool {
        match std::mem::take(self) {
            PaintGesture::Painting(stroke) if !stroke.is_empty() => {
                history.commit(stroke);
                true
            }
            _ => false,
        }
    }

    /// The stroke being painted, if any.
    pub fn in_progress(&self) -> Option<&Stroke> {
        match self {
            PaintGesture::Idle => None,
            PaintGesture::Painting(stroke) => Some(stroke),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PaintGesture::Painting(_))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
