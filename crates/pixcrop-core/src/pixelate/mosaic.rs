//! Block-averaging ("mosaic") redaction.
//!
//! For every captured point of a stroke, a square box of side `2r` around
//! the point is partitioned into `block_size` cells starting at the box
//! origin (the last row/column of cells is clipped to the box). Each cell is
//! replaced by the rounded mean of its red, green, blue and alpha channels.
//!
//! The box is derived from a circular brush radius but is not masked to a
//! circle. Strokes are applied in commit order and later strokes average
//! pixels earlier strokes already altered, so redaction compounds.

use crate::surface::{Surface, CHANNELS};

use super::Stroke;

/// Average every `block_size` cell inside the box `[cx - r, cx + r) x
/// [cy - r, cy + r)`, clipped to the surface.
pub fn pixelate_region(surface: &mut Surface, cx: i64, cy: i64, radius: i64, block_size: u32) {
    let (w, h) = (surface.width as i64, surface.height as i64);
    let x1 = cx.saturating_sub(radius).max(0);
    let y1 = cy.saturating_sub(radius).max(0);
    let x2 = cx.saturating_add(radius).min(w);
    let y2 = cy.saturating_add(radius).min(h);
    if x1 >= x2 || y1 >= y2 {
        return;
    }

    let bs = block_size.max(1) as i64;
    let mut by = y1;
    while by < y2 {
        let by2 = (by + bs).min(y2);
        let mut bx = x1;
        while bx < x2 {
            let bx2 = (bx + bs).min(x2);
            average_cell(surface, bx as u32, by as u32, bx2 as u32, by2 as u32);
            bx += bs;
        }
        by += bs;
    }
}

/// Replace every pixel in `[x1, x2) x [y1, y2)` with the cell's mean color.
fn average_cell(surface: &mut Surface, x1: u32, y1: u32, x2: u32, y2: u32) {
    let mut sums = [0u64; CHANNELS];
    let mut count = 0u64;

    for y in y1..y2 {
        let row = surface.offset(x1, y);
        let end = surface.offset(x2, y);
        for px in surface.pixels[row..end].chunks_exact(CHANNELS) {
            for (sum, &v) in sums.iter_mut().zip(px) {
                *sum += v as u64;
            }
            count += 1;
        }
    }
    if count == 0 {
        return;
    }

    // Round half up
    let mut mean = [0u8; CHANNELS];
    for (m, sum) in mean.iter_mut().zip(sums) {
        *m = ((sum + count / 2) / count) as u8;
    }

    for y in y1..y2 {
        let row = surface.offset(x1, y);
        let end = surface.offset(x2, y);
        for px in surface.pixels[row..end].chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&mean);
        }
    }
}

/// Apply one stroke to a surface of any size.
///
/// Point `(nx, ny)` maps to pixel `(floor(nx * W), floor(ny * H))` and the
/// radius to `round(radius * max(W, H))` pixels. A radius past the longer
/// side already covers the whole surface and is capped there.
pub fn apply_stroke(surface: &mut Surface, stroke: &Stroke, block_size: u32) {
    let (w, h) = (surface.width as f64, surface.height as f64);
    let longest = w.max(h);
    let r = (stroke.radius * longest).round().min(longest) as i64;
    if r <= 0 {
        return;
    }
    for &(nx, ny) in &stroke.points {
        let cx = (nx * w).floor() as i64;
        let cy = (ny * h).floor() as i64;
        pixelate_region(surface, cx, cy, r, block_size);
    }
}

/// Apply strokes in order.
pub fn apply_strokes(surface: &mut Surface, strokes: &[Stroke], block_size: u32) {
    for stroke in strokes {
        apply_stroke(surface, stroke, block_size);
    }
}

/// Render committed strokes, plus an optional stroke still being painted,
/// over a fresh copy of `base`.
///
/// The in-progress stroke is drawn as if committed but never stored, so an
/// abandoned gesture cannot leak into history. Undo and redo re-render
/// from the base because averaging cannot be inverted.
pub fn render_pixelation(
    base: &Surface,
    applied: &[Stroke],
    in_progress: Option<&Stroke>,
    block_size: u32,
) -> Surface {
    let mut surface = base.clone();
    apply_strokes(&mut surface, applied, block_size);
    if let Some(stroke) = in_progress {
        apply_stroke(&mut surface, stroke, block_size);
    }
    surface
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test surface where each pixel has a unique-ish color.
    fn gradient(width: u32, height: u32) -> Surface {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width.max(1)) as u8);
                pixels.push((y * 255 / height.max(1)) as u8);
                pixels.push(((x + y) % 256) as u8);
                pixels.push(255);
            }
        }
        Surface::new(width, height, pixels)
    }

    fn single_point(x: f64, y: f64, radius: f64) -> Stroke {
        Stroke {
            points: vec![(x, y)],
            radius,
        }
    }

    fn cell_is_uniform(s: &Surface, x1: u32, y1: u32, x2: u32, y2: u32) -> bool {
        let first = s.pixel(x1, y1);
        (y1..y2).all(|y| (x1..x2).all(|x| s.pixel(x, y) == first))
    }

    #[test]
    fn test_center_stroke_produces_sixteen_uniform_cells() {
        let base = gradient(100, 100);
        let mut s = base.clone();
        // radius 0.2 of 100px = 20px, so the box is [30, 70) on both axes
        apply_stroke(&mut s, &single_point(0.5, 0.5, 0.2), 10);

        let mut cells = 0;
        for cy in (30..70).step_by(10) {
            for cx in (30..70).step_by(10) {
                assert!(cell_is_uniform(&s, cx, cy, cx + 10, cy + 10));
                cells += 1;
            }
        }
        assert_eq!(cells, 16);

        // Neighbouring cells differ on a gradient
        assert_ne!(s.pixel(30, 30), s.pixel(40, 30));

        // Pixels outside the box are untouched
        assert_eq!(s.pixel(29, 50), base.pixel(29, 50));
        assert_eq!(s.pixel(70, 50), base.pixel(70, 50));
        assert_eq!(s.pixel(50, 29), base.pixel(50, 29));
        assert_eq!(s.pixel(50, 70), base.pixel(50, 70));
    }

    #[test]
    fn test_cell_mean_is_rounded() {
        // Two pixels: 0 and 1 average to 0.5, which rounds up to 1
        let mut s = Surface::new(2, 1, vec![0, 10, 100, 255, 1, 11, 101, 254]);
        pixelate_region(&mut s, 1, 0, 1, 2);
        assert_eq!(s.pixel(0, 0), Some([1, 11, 101, 255]));
        assert_eq!(s.pixel(1, 0), Some([1, 11, 101, 255]));
    }

    #[test]
    fn test_alpha_is_averaged() {
        let mut s = Surface::new(2, 1, vec![0, 0, 0, 0, 0, 0, 0, 200]);
        pixelate_region(&mut s, 1, 0, 1, 2);
        assert_eq!(s.pixel(0, 0).unwrap()[3], 100);
    }

    #[test]
    fn test_box_is_clipped_to_surface() {
        let base = gradient(20, 20);
        let mut s = base.clone();
        apply_stroke(&mut s, &single_point(0.0, 0.0, 0.25), 4);

        // Box is [-5, 5) clipped to [0, 5): cells [0,4) and [4,5)
        assert!(cell_is_uniform(&s, 0, 0, 4, 4));
        assert!(cell_is_uniform(&s, 4, 0, 5, 4));
        assert_eq!(s.pixel(5, 5), base.pixel(5, 5));
    }

    #[test]
    fn test_last_cell_is_clipped_to_box() {
        let base = gradient(50, 50);
        let mut s = base.clone();
        // r = 7, box [18, 32): cells of 10 then a 4-wide remainder
        pixelate_region(&mut s, 25, 25, 7, 10);
        assert!(cell_is_uniform(&s, 18, 18, 28, 28));
        assert!(cell_is_uniform(&s, 28, 18, 32, 28));
        assert_eq!(s.pixel(32, 20), base.pixel(32, 20));
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let base = gradient(30, 30);
        let mut s = base.clone();
        apply_stroke(&mut s, &single_point(0.5, 0.5, 0.0), 5);
        assert_eq!(s, base);
    }

    #[test]
    fn test_huge_radius_covers_whole_surface() {
        let mut s = gradient(20, 20);
        apply_stroke(&mut s, &single_point(0.5, 0.5, 1e300), 20);
        assert!(cell_is_uniform(&s, 0, 0, 20, 20));
    }

    #[test]
    fn test_extreme_region_bounds_saturate() {
        let base = gradient(10, 10);
        let mut s = base.clone();
        pixelate_region(&mut s, i64::MAX, i64::MAX, i64::MAX, 4);
        assert_eq!(s, base);

        pixelate_region(&mut s, i64::MIN, 0, 1, 4);
        assert_eq!(s, base);

        pixelate_region(&mut s, 5, 5, i64::MAX, 10);
        assert!(cell_is_uniform(&s, 0, 0, 10, 10));
    }

    #[test]
    fn test_block_size_zero_treated_as_one() {
        let base = gradient(10, 10);
        let mut s = base.clone();
        pixelate_region(&mut s, 5, 5, 2, 0);
        // Single-pixel cells average to themselves
        assert_eq!(s, base);
    }

    #[test]
    fn test_uniform_cell_is_idempotent() {
        let mut s = Surface::filled(16, 16, [12, 34, 56, 78]);
        let before = s.clone();
        pixelate_region(&mut s, 8, 8, 8, 4);
        assert_eq!(s, before);
    }

    #[test]
    fn test_strokes_compound_in_order() {
        let base = gradient(60, 60);
        let a = single_point(0.4, 0.4, 0.1);
        let b = single_point(0.5, 0.5, 0.1);

        let mut expected = base.clone();
        apply_stroke(&mut expected, &a, 5);
        apply_stroke(&mut expected, &b, 5);

        let rendered = render_pixelation(&base, &[a, b], None, 5);
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_in_progress_stroke_previewed_without_mutation() {
        let base = gradient(40, 40);
        let committed = vec![single_point(0.25, 0.25, 0.1)];
        let painting = single_point(0.75, 0.75, 0.1);

        let preview = render_pixelation(&base, &committed, Some(&painting), 4);
        let all = render_pixelation(&base, &[committed[0].clone(), painting.clone()], None, 4);
        assert_eq!(preview, all);

        // The base is never touched and committed-only render excludes the preview stroke
        let committed_only = render_pixelation(&base, &committed, None, 4);
        assert_ne!(committed_only, preview);
        assert_eq!(base, gradient(40, 40));
    }

    #[test]
    fn test_render_scales_with_surface_size() {
        // The same normalized stroke covers the same fraction of any surface
        let stroke = single_point(0.5, 0.5, 0.1);
        let small = render_pixelation(&gradient(50, 50), &[stroke.clone()], None, 5);
        let large = render_pixelation(&gradient(100, 100), &[stroke], None, 10);

        assert!(cell_is_uniform(&small, 20, 20, 25, 25));
        assert!(cell_is_uniform(&large, 40, 40, 50, 50));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
