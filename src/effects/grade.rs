use rayon::prelude::*;

use crate::config::params::{GlitchParams, ParamKey};
use crate::foundation::core::PixelBuffer;
use crate::foundation::math::clamp_u8;

/// Brightness, contrast and saturation adjustment. The default is the identity grade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorGrade {
    pub contrast: f64,
    pub brightness: f64,
    pub saturation: f64,
}

impl Default for ColorGrade {
    fn default() -> Self {
        Self {
            contrast: 1.0,
            brightness: 0.0,
            saturation: 1.0,
        }
    }
}

impl ColorGrade {
    /// Grade from config params; unset values fall back to the identity.
    pub fn from_params(params: &GlitchParams) -> Self {
        let id = Self::default();
        Self {
            contrast: params.get(ParamKey::Contrast).unwrap_or(id.contrast),
            brightness: params.get(ParamKey::Brightness).unwrap_or(id.brightness),
            saturation: params.get(ParamKey::Saturation).unwrap_or(id.saturation),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

// Rec. 601 luma weights.
const LUMA: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// Apply `grade` to RGB: brightness offset (`× 255`), contrast around mid-grey, then a
/// saturation blend against luma. Alpha is untouched.
pub fn color_grade(buf: &mut PixelBuffer, grade: ColorGrade) {
    if grade.is_identity() {
        return;
    }
    let lift = grade.brightness * 255.0;
    buf.as_bytes_mut()
        .par_chunks_exact_mut(4)
        .for_each(|px| {
            let mut rgb = [0.0f64; 3];
            for (out, &c) in rgb.iter_mut().zip(px.iter()) {
                let v = f64::from(c) + lift;
                *out = ((v / 255.0 - 0.5) * grade.contrast + 0.5) * 255.0;
            }
            let gray = LUMA[0] * rgb[0] + LUMA[1] * rgb[1] + LUMA[2] * rgb[2];
            for (c, v) in px.iter_mut().zip(rgb) {
                *c = clamp_u8(gray + (v - gray) * grade.saturation);
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grade.rs"]
mod tests;
