//! Pointer handling for [`EditorSession`].
//!
//! Each handler takes the pointer position and the container size in
//! container pixels and returns whether the preview needs a redraw.
//! Leaving the surface ends gestures exactly like releasing the pointer.

use tracing::{debug, info};

use super::{EditorSession, Tool};
use crate::chroma::{sample_color, to_hex};
use crate::geometry::in_bounds;
use crate::pixelate::brush_radius;

impl EditorSession {
    /// Handle grab tolerance in normalized units for the current view.
    fn handle_tolerance(&self, container: (f64, f64)) -> (f64, f64) {
        let tol = self.config.handle_tolerance;
        match self.rendered_rect(container) {
            Some(rect) if rect.width > 0.0 && rect.height > 0.0 => (tol / rect.width, tol / rect.height),
            _ => (0.0, 0.0),
        }
    }

    pub fn pointer_down(&mut self, pos: (f64, f64), container: (f64, f64)) -> bool {
        let Some(point) = self.pointer_to_display(pos, container) else {
            return false;
        };

        match self.tool {
            Tool::Pan => {
                self.pan_anchor = Some(pos);
                false
            }
            Tool::Crop => {
                let tolerance = self.handle_tolerance(container);
                let crop = self.edit.crop;
                self.crop_gesture.begin(point, &crop, tolerance)
            }
            Tool::Pixelate => {
                let Some(display) = self.display_dimensions() else {
                    return false;
                };
                if !in_bounds(point) {
                    return false;
                }
                let natural = self.edit.orientation().display_to_natural(point.0, point.1);
                let radius = brush_radius(self.brush_size, display);
                self.paint.begin(natural, radius)
            }
            Tool::PickColor => self.pick_color(point),
        }
    }

    pub fn pointer_move(&mut self, pos: (f64, f64), container: (f64, f64)) -> bool {
        match self.tool {
            Tool::Pan => match self.pan_anchor {
                Some(last) => {
                    self.viewport.pan_by(pos.0 - last.0, pos.1 - last.1);
                    self.pan_anchor = Some(pos);
                    true
                }
                None => false,
            },
            Tool::Crop => {
                let Some(point) = self.pointer_to_display(pos, container) else {
                    return false;
                };
                let aspect = self.edit.crop_aspect();
                match self.crop_gesture.update(point, aspect) {
                    Some(rect) => {
                        self.edit.crop = rect;
                        true
                    }
                    None => false,
                }
            }
            Tool::Pixelate => {
                if !self.paint.is_active() {
                    return false;
                }
                let Some(point) = self.pointer_to_display(pos, container) else {
                    return false;
                };
                if !in_bounds(point) {
                    return false;
                }
                let natural = self.edit.orientation().display_to_natural(point.0, point.1);
                self.paint.extend(natural)
            }
            Tool::PickColor => false,
        }
    }

    pub fn pointer_up(&mut self, _pos: (f64, f64), _container: (f64, f64)) -> bool {
        self.pan_anchor = None;
        let cropped = self.crop_gesture.end();
        let committed = self.paint.finish(&mut self.edit.strokes);
        if committed {
            debug!("Committed stroke, {} applied", self.edit.strokes.applied().len());
        }
        cropped || committed
    }

    pub fn pointer_leave(&mut self, pos: (f64, f64), container: (f64, f64)) -> bool {
        self.pointer_up(pos, container)
    }

    /// Sample the rendered preview at a display-normalized point and make
    /// it the chroma key. Points outside the image are ignored.
    fn pick_color(&mut self, point: (f64, f64)) -> bool {
        if !in_bounds(point) {
            return false;
        }
        let Some(rendered) = self.render_preview() else {
            return false;
        };
        match sample_color(&rendered, point, self.config.sample_radius) {
            Some(color) => {
                info!("Picked background color {}", to_hex(color));
                self.edit.bg_removal.color = color;
                self.edit.bg_removal.enabled = true;
                true
            }
            None => false,
        }
    }
}
