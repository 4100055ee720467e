use rayon::prelude::*;

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::{clamp_u8, floor_px, shifted_in_bounds};

/// Horizontal red/blue separation.
///
/// Reads a snapshot and pushes channels outward: each pixel's red lands `floor(amount)`
/// pixels to the right, its blue the same distance to the left. Targets outside the row are
/// skipped, so uncovered pixels keep their own values.
pub fn rgb_split(buf: &mut PixelBuffer, amount: f64) {
    let offset = floor_px(amount);
    if offset == 0 {
        return;
    }
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let src = buf.snapshot();
    let data = buf.as_bytes_mut();
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let idx = (row + x) * 4;
            if let Some(tx) = shifted_in_bounds(x, offset, w) {
                data[(row + tx) * 4] = src[idx];
            }
            if let Some(tx) = offset
                .checked_neg()
                .and_then(|neg| shifted_in_bounds(x, neg, w))
            {
                data[(row + tx) * 4 + 2] = src[idx + 2];
            }
        }
    }
}

/// Lens-style fringing: red sampled `floor(strength * 5)` pixels right, blue the same
/// distance left, green passed through. Reads a snapshot.
pub fn chromatic_aberration(buf: &mut PixelBuffer, strength: f64) {
    let offset = floor_px(strength * 5.0);
    if offset == 0 {
        return;
    }
    sample_red_blue(buf, offset);
}

fn sample_red_blue(buf: &mut PixelBuffer, offset: isize) {
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let src = buf.snapshot();
    let data = buf.as_bytes_mut();
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let idx = (row + x) * 4;
            if let Some(sx) = shifted_in_bounds(x, offset, w) {
                data[idx] = src[(row + sx) * 4];
            }
            if let Some(sx) = offset
                .checked_neg()
                .and_then(|neg| shifted_in_bounds(x, neg, w))
            {
                data[idx + 2] = src[(row + sx) * 4 + 2];
            }
        }
    }
}

/// Cyclic channel blend: `R <- lerp(R, G)`, `G <- lerp(G, B)`, `B <- lerp(B, R_orig)`.
///
/// Not part of the pipeline's effect set; callers apply it directly.
pub fn color_shift(buf: &mut PixelBuffer, amount: f64) {
    let keep = 1.0 - amount;
    buf.as_bytes_mut()
        .par_chunks_exact_mut(4)
        .for_each(|px| {
            let r = f64::from(px[0]);
            let g = f64::from(px[1]);
            let b = f64::from(px[2]);
            px[0] = clamp_u8(g * amount + r * keep);
            px[1] = clamp_u8(b * amount + g * keep);
            px[2] = clamp_u8(r * amount + b * keep);
        });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/channel.rs"]
mod tests;
