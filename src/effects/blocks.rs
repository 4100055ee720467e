use rand::Rng;

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::floor_px;

/// Macroblock edge length used by [`datamosh`].
pub const DATAMOSH_BLOCK: usize = 16;

const BLOCK_GLITCH_CHANCE: f64 = 0.3;
const DATAMOSH_CHANCE_SCALE: f64 = 0.3;

fn tile_size(size: f64) -> usize {
    floor_px(size).max(1) as usize
}

/// Displace random `block_size` tiles.
///
/// Each tile, with probability 0.3, takes RGB from the live buffer at an offset drawn from
/// `[-block_size, block_size)` per axis. Source coordinates are clamped to the frame edge.
pub fn glitch_blocks<R: Rng + ?Sized>(buf: &mut PixelBuffer, block_size: f64, rng: &mut R) {
    let tile = tile_size(block_size);
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let max_x = w as isize - 1;
    let max_y = h as isize - 1;
    let data = buf.as_bytes_mut();

    for ty in (0..h).step_by(tile) {
        for tx in (0..w).step_by(tile) {
            if rng.random::<f64>() >= BLOCK_GLITCH_CHANCE {
                continue;
            }
            let off_x = floor_px((rng.random::<f64>() - 0.5) * block_size * 2.0);
            let off_y = floor_px((rng.random::<f64>() - 0.5) * block_size * 2.0);

            for y in ty..ty.saturating_add(tile).min(h) {
                let sy = (y as isize).saturating_add(off_y).clamp(0, max_y) as usize;
                for x in tx..tx.saturating_add(tile).min(w) {
                    let sx = (x as isize).saturating_add(off_x).clamp(0, max_x) as usize;
                    let src = (sy * w + sx) * 4;
                    let dst = (y * w + x) * 4;
                    data.copy_within(src..src + 3, dst);
                }
            }
        }
    }
}

/// Blocky downsample: every `pixel_size` block takes the RGB of its top-left pixel.
pub fn pixelate(buf: &mut PixelBuffer, pixel_size: f64) {
    let size = tile_size(pixel_size);
    if size == 1 {
        return;
    }
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let data = buf.as_bytes_mut();

    for by in (0..h).step_by(size) {
        for bx in (0..w).step_by(size) {
            let anchor = (by * w + bx) * 4;
            let rgb = [data[anchor], data[anchor + 1], data[anchor + 2]];
            for y in by..by.saturating_add(size).min(h) {
                for x in bx..bx.saturating_add(size).min(w) {
                    let i = (y * w + x) * 4;
                    data[i..i + 3].copy_from_slice(&rgb);
                }
            }
        }
    }
}

/// Macroblock smear.
///
/// Walks 16×16 blocks in raster order; each one, with probability `amount * 0.3`, copies RGB
/// from a random block origin of the live buffer, so later blocks can pick up earlier copies.
/// The origin is chosen so a full block fits, or 0 when the frame is narrower than a block.
pub fn datamosh<R: Rng + ?Sized>(buf: &mut PixelBuffer, amount: f64, rng: &mut R) {
    let p = amount * DATAMOSH_CHANCE_SCALE;
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let span_x = w.saturating_sub(DATAMOSH_BLOCK);
    let span_y = h.saturating_sub(DATAMOSH_BLOCK);
    let data = buf.as_bytes_mut();

    for ty in (0..h).step_by(DATAMOSH_BLOCK) {
        for tx in (0..w).step_by(DATAMOSH_BLOCK) {
            if rng.random::<f64>() >= p {
                continue;
            }
            let sx = (rng.random::<f64>() * span_x as f64).floor() as usize;
            let sy = (rng.random::<f64>() * span_y as f64).floor() as usize;

            let rows = DATAMOSH_BLOCK.min(h - ty).min(h - sy);
            let cols = DATAMOSH_BLOCK.min(w - tx).min(w - sx);
            for by in 0..rows {
                for bx in 0..cols {
                    let src = ((sy + by) * w + sx + bx) * 4;
                    let dst = ((ty + by) * w + tx + bx) * 4;
                    data.copy_within(src..src + 3, dst);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blocks.rs"]
mod tests;
