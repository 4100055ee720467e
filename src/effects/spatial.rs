use std::f64::consts::PI;

use rand::Rng;

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::{floor_px, shifted_in_bounds};

/// Sine-wave warp. Pixel `(x, y)` takes the full RGBA of
/// `(floor(x + sin(y * 0.1 + 2πp) * strength), floor(y + cos(x * 0.1 + 2πp) * strength))` from a
/// snapshot; sources outside the frame leave the pixel alone.
pub fn displacement(buf: &mut PixelBuffer, strength: f64, progress: f64) {
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let phase = progress * PI * 2.0;
    let src = buf.snapshot();
    let data = buf.as_bytes_mut();

    for y in 0..h {
        let dx = (y as f64 * 0.1 + phase).sin() * strength;
        for x in 0..w {
            let dy = (x as f64 * 0.1 + phase).cos() * strength;
            let sx = floor_px(x as f64 + dx);
            let sy = floor_px(y as f64 + dy);
            if sx < 0 || sy < 0 || sx as usize >= w || sy as usize >= h {
                continue;
            }
            let s = (sy as usize * w + sx as usize) * 4;
            let d = (y * w + x) * 4;
            data[d..d + 4].copy_from_slice(&src[s..s + 4]);
        }
    }
}

/// Tape tracking errors followed by a red-channel wobble.
///
/// Each row, with probability `intensity * 0.1`, is rotated by
/// `floor((r - 0.5) * width * intensity)` pixels with wraparound. Red is then pulled from
/// `floor(intensity * 5 * sin(4πp))` pixels over, reading the live buffer.
pub fn vhs_distortion<R: Rng + ?Sized>(
    buf: &mut PixelBuffer,
    intensity: f64,
    progress: f64,
    rng: &mut R,
) {
    let w = buf.width() as usize;
    let row_bytes = w * 4;
    let p = intensity * 0.1;
    let data = buf.as_bytes_mut();

    for row in data.chunks_exact_mut(row_bytes) {
        if rng.random::<f64>() >= p {
            continue;
        }
        let shift = floor_px((rng.random::<f64>() - 0.5) * w as f64 * intensity);
        let by = shift.rem_euclid(w as isize) as usize;
        row.rotate_right(by * 4);
    }

    let offset = floor_px(intensity * 5.0 * (progress * PI * 4.0).sin());
    if offset == 0 {
        return;
    }
    for row in data.chunks_exact_mut(row_bytes) {
        for x in 0..w {
            if let Some(sx) = shifted_in_bounds(x, offset, w) {
                row[x * 4] = row[sx * 4];
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/spatial.rs"]
mod tests;
