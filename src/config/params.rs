use serde::{Deserialize, Serialize};

/// Closed set of effect identifiers understood by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectId {
    Noise,
    RgbSplit,
    ChromaticAberration,
    Pixelate,
    Scanlines,
    GlitchBlocks,
    Displacement,
    VhsDistortion,
    Datamosh,
    ColorGrade,
}

impl EffectId {
    pub const ALL: [EffectId; 10] = [
        EffectId::Noise,
        EffectId::RgbSplit,
        EffectId::ChromaticAberration,
        EffectId::Pixelate,
        EffectId::Scanlines,
        EffectId::GlitchBlocks,
        EffectId::Displacement,
        EffectId::VhsDistortion,
        EffectId::Datamosh,
        EffectId::ColorGrade,
    ];

    /// Identifier as written in config JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            EffectId::Noise => "noise",
            EffectId::RgbSplit => "rgbSplit",
            EffectId::ChromaticAberration => "chromaticAberration",
            EffectId::Pixelate => "pixelate",
            EffectId::Scanlines => "scanlines",
            EffectId::GlitchBlocks => "glitchBlocks",
            EffectId::Displacement => "displacement",
            EffectId::VhsDistortion => "vhsDistortion",
            EffectId::Datamosh => "datamosh",
            EffectId::ColorGrade => "colorGrade",
        }
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EffectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown effect '{s}'"))
    }
}

/// Named numeric effect parameters. `None` means "not set": the effect that requires it is
/// skipped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlitchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aberration_strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanline_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_shift: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distortion_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement_strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vhs_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datamosh_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
}

/// Key into [`GlitchParams`], used by pipeline stages to declare what they require.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    NoiseIntensity,
    SplitDistance,
    AberrationStrength,
    PixelSize,
    ScanlineOpacity,
    BlockSize,
    ColorShift,
    DistortionAmount,
    DisplacementStrength,
    VhsIntensity,
    DatamoshAmount,
    Contrast,
    Brightness,
    Saturation,
}

impl GlitchParams {
    /// Value of `key`; non-finite values count as unset.
    pub fn get(&self, key: ParamKey) -> Option<f64> {
        self.slot(key).filter(|v| v.is_finite())
    }

    pub fn set(&mut self, key: ParamKey, value: Option<f64>) {
        *self.slot_mut(key) = value;
    }

    /// `self` with every `Some` field of `over` laid on top.
    pub fn merged(&self, over: &GlitchParams) -> GlitchParams {
        let mut out = self.clone();
        for key in ParamKey::ALL {
            if let Some(v) = over.slot(key) {
                out.set(key, Some(v));
            }
        }
        out
    }

    fn slot(&self, key: ParamKey) -> Option<f64> {
        match key {
            ParamKey::NoiseIntensity => self.noise_intensity,
            ParamKey::SplitDistance => self.split_distance,
            ParamKey::AberrationStrength => self.aberration_strength,
            ParamKey::PixelSize => self.pixel_size,
            ParamKey::ScanlineOpacity => self.scanline_opacity,
            ParamKey::BlockSize => self.block_size,
            ParamKey::ColorShift => self.color_shift,
            ParamKey::DistortionAmount => self.distortion_amount,
            ParamKey::DisplacementStrength => self.displacement_strength,
            ParamKey::VhsIntensity => self.vhs_intensity,
            ParamKey::DatamoshAmount => self.datamosh_amount,
            ParamKey::Contrast => self.contrast,
            ParamKey::Brightness => self.brightness,
            ParamKey::Saturation => self.saturation,
        }
    }

    fn slot_mut(&mut self, key: ParamKey) -> &mut Option<f64> {
        match key {
            ParamKey::NoiseIntensity => &mut self.noise_intensity,
            ParamKey::SplitDistance => &mut self.split_distance,
            ParamKey::AberrationStrength => &mut self.aberration_strength,
            ParamKey::PixelSize => &mut self.pixel_size,
            ParamKey::ScanlineOpacity => &mut self.scanline_opacity,
            ParamKey::BlockSize => &mut self.block_size,
            ParamKey::ColorShift => &mut self.color_shift,
            ParamKey::DistortionAmount => &mut self.distortion_amount,
            ParamKey::DisplacementStrength => &mut self.displacement_strength,
            ParamKey::VhsIntensity => &mut self.vhs_intensity,
            ParamKey::DatamoshAmount => &mut self.datamosh_amount,
            ParamKey::Contrast => &mut self.contrast,
            ParamKey::Brightness => &mut self.brightness,
            ParamKey::Saturation => &mut self.saturation,
        }
    }
}

impl ParamKey {
    pub const ALL: [ParamKey; 14] = [
        ParamKey::NoiseIntensity,
        ParamKey::SplitDistance,
        ParamKey::AberrationStrength,
        ParamKey::PixelSize,
        ParamKey::ScanlineOpacity,
        ParamKey::BlockSize,
        ParamKey::ColorShift,
        ParamKey::DistortionAmount,
        ParamKey::DisplacementStrength,
        ParamKey::VhsIntensity,
        ParamKey::DatamoshAmount,
        ParamKey::Contrast,
        ParamKey::Brightness,
        ParamKey::Saturation,
    ];
}

#[cfg(test)]
#[path = "../../tests/unit/config/params.rs"]
mod tests;
