use crate::foundation::core::PixelBuffer;
use crate::foundation::math::clamp_u8;

/// Darken every even row's RGB by `1 - opacity`. Odd rows and alpha are untouched.
pub fn scanlines(buf: &mut PixelBuffer, opacity: f64) {
    let keep = 1.0 - opacity;
    let row_bytes = buf.width() as usize * 4;
    for row in buf.as_bytes_mut().chunks_exact_mut(row_bytes).step_by(2) {
        for px in row.chunks_exact_mut(4) {
            for c in &mut px[..3] {
                *c = clamp_u8(f64::from(*c) * keep);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scanlines.rs"]
mod tests;
