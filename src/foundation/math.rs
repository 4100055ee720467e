/// FNV-1a 64-bit hasher used for frame digests.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Store a float channel value the way a clamped byte array does: round half to even, then
/// clamp into `[0, 255]`. NaN stores as 0.
#[inline(always)]
pub(crate) fn clamp_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Floor a float into a signed pixel offset, saturating at the `isize` range.
#[inline(always)]
pub(crate) fn floor_px(v: f64) -> isize {
    if v.is_nan() {
        return 0;
    }
    v.floor() as isize
}

/// `base + delta` when the result lies in `[0, len)`.
#[inline(always)]
pub(crate) fn shifted_in_bounds(base: usize, delta: isize, len: usize) -> Option<usize> {
    let v = (base as isize).checked_add(delta)?;
    if v >= 0 && (v as usize) < len {
        Some(v as usize)
    } else {
        None
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
