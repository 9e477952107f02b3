//! Background removal by chroma key, and the color sampler that feeds it.

use crate::surface::{Surface, CHANNELS};

/// Make pixels near `key` transparent.
///
/// Distance is the Manhattan distance over RGB. With `tol = tolerance * 255`
/// (tolerance in [0, 1]):
/// - `d <= tol`: alpha becomes 0
/// - `tol < d <= 2 * tol`: alpha is scaled by `(d - tol) / tol`
/// - otherwise the pixel is untouched
pub fn chroma_key(surface: &mut Surface, key: [u8; 3], tolerance: f64) {
    let tol = tolerance.clamp(0.0, 1.0) * 255.0;

    for px in surface.pixels.chunks_exact_mut(CHANNELS) {
        let dist = (px[0] as i32 - key[0] as i32).abs()
            + (px[1] as i32 - key[1] as i32).abs()
            + (px[2] as i32 - key[2] as i32).abs();
        let dist = dist as f64;

        if dist <= tol {
            px[3] = 0;
        } else if dist <= tol * 2.0 {
            let factor = (dist - tol) / tol;
            px[3] = (px[3] as f64 * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Sample the color at a normalized point of `surface`.
///
/// With `radius > 0` the result is the rounded mean of the
/// `(2 * radius + 1)^2` neighbourhood, clipped to the surface. Returns
/// `None` when the point lies outside the surface.
pub fn sample_color(surface: &Surface, point: (f64, f64), radius: u32) -> Option<[u8; 3]> {
    if surface.is_empty() || !(0.0..=1.0).contains(&point.0) || !(0.0..=1.0).contains(&point.1) {
        return None;
    }

    // A point at exactly 1.0 belongs to the last pixel
    let cx = ((point.0 * surface.width as f64) as u32).min(surface.width - 1);
    let cy = ((point.1 * surface.height as f64) as u32).min(surface.height - 1);

    let x1 = cx.saturating_sub(radius);
    let y1 = cy.saturating_sub(radius);
    let x2 = cx.saturating_add(radius).min(surface.width - 1);
    let y2 = cy.saturating_add(radius).min(surface.height - 1);

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for y in y1..=y2 {
        for x in x1..=x2 {
            let i = surface.offset(x, y);
            for (c, sum) in sums.iter_mut().enumerate() {
                *sum += surface.pixels[i + c] as u64;
            }
            count += 1;
        }
    }

    let mut color = [0u8; 3];
    for (out, sum) in color.iter_mut().zip(sums) {
        *out = ((sum + count / 2) / count) as u8;
    }
    Some(color)
}

/// Format a color as `#rrggbb`.
pub fn to_hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}
