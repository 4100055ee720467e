use rand::Rng;

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::clamp_u8;

/// Speckle noise. Each pixel is hit with probability `intensity * 0.1`; a hit adds one signed
/// delta in `[-127.5, 127.5)` to R, G and B alike.
pub fn noise<R: Rng + ?Sized>(buf: &mut PixelBuffer, intensity: f64, rng: &mut R) {
    let p = intensity * 0.1;
    if p <= 0.0 {
        return;
    }
    for px in buf.as_bytes_mut().chunks_exact_mut(4) {
        if rng.random::<f64>() < p {
            let delta = (rng.random::<f64>() - 0.5) * 255.0;
            for c in &mut px[..3] {
                *c = clamp_u8(f64::from(*c) + delta);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/noise.rs"]
mod tests;
