use serde::{Deserialize, Serialize};

use crate::config::params::{EffectId, GlitchParams};
use crate::foundation::error::{GlitchError, GlitchResult};

/// Advisory render quality. Never changes pipeline math.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

/// Complete description of one glitch effect, as authored in the editor.
///
/// `shader_modules` is an ordered set in JSON but its order never affects rendering: the
/// pipeline always runs stages in its own canonical order.
///
/// Missing fields take their [`Default`] values; unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlitchConfig {
    pub effect_name: String,
    pub duration: f64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub reverse: bool,
    pub quality: Quality,
    pub shader_modules: Vec<EffectId>,
    pub params: GlitchParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            effect_name: "Untitled Effect".to_owned(),
            duration: 2.0,
            looping: true,
            reverse: false,
            quality: Quality::Medium,
            shader_modules: Vec::new(),
            params: default_params(),
            image_source: None,
        }
    }
}

/// Parameter values a fresh editor starts from.
pub fn default_params() -> GlitchParams {
    GlitchParams {
        noise_intensity: Some(0.5),
        split_distance: Some(3.0),
        aberration_strength: Some(0.5),
        pixel_size: Some(4.0),
        scanline_opacity: Some(0.3),
        block_size: Some(20.0),
        color_shift: Some(0.5),
        distortion_amount: Some(0.5),
        displacement_strength: Some(0.3),
        vhs_intensity: Some(0.4),
        datamosh_amount: Some(0.2),
        contrast: None,
        brightness: None,
        saturation: None,
    }
}

impl GlitchConfig {
    pub fn from_json_str(s: &str) -> GlitchResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| GlitchError::decode(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a config JSON file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> GlitchResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> GlitchResult<String> {
        serde_json::to_string(self).map_err(|e| GlitchError::encoding(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> GlitchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GlitchError::encoding(e.to_string()))
    }

    pub fn validate(&self) -> GlitchResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(GlitchError::validation(format!(
                "duration must be positive and finite, got {}",
                self.duration
            )));
        }
        Ok(())
    }

    pub fn has_module(&self, id: EffectId) -> bool {
        self.shader_modules.contains(&id)
    }

    /// Apply `patch` in place.
    ///
    /// Top-level fields are replaced when present. `params` is layered as
    /// `default params <- current params <- patch params`, so a patch can set but never clear
    /// a parameter.
    pub fn apply_patch(&mut self, patch: &GlitchConfigPatch) {
        if let Some(name) = &patch.effect_name {
            self.effect_name.clone_from(name);
        }
        if let Some(d) = patch.duration {
            self.duration = d;
        }
        if let Some(l) = patch.looping {
            self.looping = l;
        }
        if let Some(r) = patch.reverse {
            self.reverse = r;
        }
        if let Some(q) = patch.quality {
            self.quality = q;
        }
        if let Some(mods) = &patch.shader_modules {
            self.shader_modules.clone_from(mods);
        }
        if let Some(src) = &patch.image_source {
            self.image_source.clone_from(src);
        }
        if let Some(p) = &patch.params {
            self.params = default_params().merged(&self.params).merged(p);
        }
    }

    /// `self` with `patch` applied; validated.
    pub fn patched(&self, patch: &GlitchConfigPatch) -> GlitchResult<Self> {
        let mut next = self.clone();
        next.apply_patch(patch);
        next.validate()?;
        Ok(next)
    }
}

/// Partial [`GlitchConfig`].
///
/// `image_source` is doubly optional: `Some(None)` clears the image, `None` leaves it alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlitchConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shader_modules: Option<Vec<EffectId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<GlitchParams>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_source: Option<Option<String>>,
}

impl GlitchConfigPatch {
    pub fn params(params: GlitchParams) -> Self {
        Self {
            params: Some(params),
            ..Self::default()
        }
    }

    pub fn modules(ids: impl IntoIterator<Item = EffectId>) -> Self {
        Self {
            shader_modules: Some(ids.into_iter().collect()),
            ..Self::default()
        }
    }
}

// Distinguishes an explicit `null` from a missing key.
fn deserialize_some<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
