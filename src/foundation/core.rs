use crate::foundation::error::{GlitchError, GlitchResult};
use crate::foundation::math::Fnv1a64;

/// 0-based index of a captured frame within an export.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> GlitchResult<Self> {
        if den == 0 {
            return Err(GlitchError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(GlitchError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate.
    pub fn whole(fps: u32) -> GlitchResult<Self> {
        Self::new(fps, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Interleaved RGBA8 frame, row-major, top-to-bottom, straight (non-premultiplied) alpha.
///
/// Both dimensions are at least 1. Whoever holds the buffer owns it exclusively; effects
/// mutate it in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a transparent black buffer.
    pub fn new(width: u32, height: u32) -> GlitchResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> GlitchResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(GlitchError::validation(format!(
                "RGBA buffer length mismatch: expected {len} bytes, got {} bytes",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> GlitchResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: rgba.repeat(len / 4),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel `(x, y)`. Callers guarantee the coordinate is in bounds.
    #[inline(always)]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * 4
    }

    /// RGBA of pixel `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x as usize, y as usize);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite this buffer with `src` bytes of identical dimensions.
    ///
    /// Reuses the existing allocation when the dimensions match.
    pub fn copy_from(&mut self, width: u32, height: u32, src: &[u8]) -> GlitchResult<()> {
        let len = byte_len(width, height)?;
        if src.len() != len {
            return Err(GlitchError::validation(format!(
                "RGBA source length mismatch: expected {len} bytes, got {} bytes",
                src.len()
            )));
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.extend_from_slice(src);
        Ok(())
    }

    /// Stable 64-bit digest of the dimensions and pixel bytes.
    pub fn digest(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }

    /// Owned copy of the current pixel bytes for effects that read pre-mutation state.
    pub(crate) fn snapshot(&self) -> Vec<u8> {
        self.data.clone()
    }
}

fn byte_len(width: u32, height: u32) -> GlitchResult<usize> {
    if width == 0 || height == 0 {
        return Err(GlitchError::validation(
            "pixel buffer width/height must be non-zero",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| GlitchError::validation("pixel buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
