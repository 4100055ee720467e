use std::f64::consts::PI;

use rand::RngCore;

use crate::config::model::GlitchConfig;
use crate::config::params::{EffectId, GlitchParams, ParamKey};
use crate::effects;
use crate::foundation::core::PixelBuffer;

/// Per-frame inputs a stage reads besides the buffer.
#[derive(Clone, Copy, Debug)]
pub struct StageInputs<'a> {
    pub params: &'a GlitchParams,
    /// Effective progress in `[0, 1)`, after reverse handling.
    pub progress: f64,
}

impl StageInputs<'_> {
    // Stages only run once their required keys are present, so a miss here reads as 0.
    fn param(&self, key: ParamKey) -> f64 {
        self.params.get(key).unwrap_or(0.0)
    }
}

pub type StageFn = fn(&mut PixelBuffer, &StageInputs<'_>, &mut dyn RngCore);

/// One pipeline step: which module enables it, which params it needs, and what it does.
#[derive(Clone, Copy)]
pub struct Stage {
    pub id: EffectId,
    pub required: &'static [ParamKey],
    pub apply: StageFn,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("id", &self.id)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// `true` when `config` enables this stage and every required param is set.
    pub fn is_active(&self, config: &GlitchConfig) -> bool {
        config.has_module(self.id)
            && self
                .required
                .iter()
                .all(|&k| config.params.get(k).is_some())
    }
}

/// Canonical stage order. Spatial remaps act on already-corrupted color and chromatic
/// aberration always sees the final image.
pub static STAGES: [Stage; 10] = [
    Stage {
        id: EffectId::RgbSplit,
        required: &[ParamKey::SplitDistance],
        apply: |buf, inp, _| {
            let wave = 1.0 + (inp.progress * PI * 2.0).sin();
            effects::rgb_split(buf, inp.param(ParamKey::SplitDistance) * wave);
        },
    },
    Stage {
        id: EffectId::Noise,
        required: &[ParamKey::NoiseIntensity],
        apply: |buf, inp, rng| effects::noise(buf, inp.param(ParamKey::NoiseIntensity), rng),
    },
    Stage {
        id: EffectId::GlitchBlocks,
        required: &[ParamKey::BlockSize],
        apply: |buf, inp, rng| effects::glitch_blocks(buf, inp.param(ParamKey::BlockSize), rng),
    },
    Stage {
        id: EffectId::Scanlines,
        required: &[ParamKey::ScanlineOpacity],
        apply: |buf, inp, _| effects::scanlines(buf, inp.param(ParamKey::ScanlineOpacity)),
    },
    Stage {
        id: EffectId::Pixelate,
        required: &[ParamKey::PixelSize],
        apply: |buf, inp, _| effects::pixelate(buf, inp.param(ParamKey::PixelSize)),
    },
    Stage {
        id: EffectId::Displacement,
        required: &[ParamKey::DisplacementStrength],
        apply: |buf, inp, _| {
            effects::displacement(buf, inp.param(ParamKey::DisplacementStrength), inp.progress)
        },
    },
    Stage {
        id: EffectId::VhsDistortion,
        required: &[ParamKey::VhsIntensity],
        apply: |buf, inp, rng| {
            effects::vhs_distortion(buf, inp.param(ParamKey::VhsIntensity), inp.progress, rng)
        },
    },
    Stage {
        id: EffectId::Datamosh,
        required: &[ParamKey::DatamoshAmount],
        apply: |buf, inp, rng| effects::datamosh(buf, inp.param(ParamKey::DatamoshAmount), rng),
    },
    Stage {
        id: EffectId::ColorGrade,
        required: &[],
        apply: |buf, inp, _| {
            effects::color_grade(buf, effects::ColorGrade::from_params(inp.params))
        },
    },
    Stage {
        id: EffectId::ChromaticAberration,
        required: &[ParamKey::AberrationStrength],
        apply: |buf, inp, _| {
            effects::chromatic_aberration(buf, inp.param(ParamKey::AberrationStrength))
        },
    },
];

/// Ids of the stages `config` would run, in execution order.
pub fn active_stages(config: &GlitchConfig) -> Vec<EffectId> {
    STAGES
        .iter()
        .filter(|s| s.is_active(config))
        .map(|s| s.id)
        .collect()
}

/// Raw cycle progress mapped through `config.reverse`.
///
/// Reversed progress wraps back into `[0, 1)`, so the cycle start maps to 0 rather than 1.
pub fn effective_progress(config: &GlitchConfig, raw: f64) -> f64 {
    if config.reverse {
        (1.0 - raw).rem_euclid(1.0)
    } else {
        raw
    }
}

/// Run every active stage over `buf` in canonical order.
///
/// `progress` is the effective progress (see [`effective_progress`]). The order of
/// `config.shader_modules` never matters.
#[tracing::instrument(
    level = "trace",
    skip(buf, config, rng),
    fields(w = buf.width(), h = buf.height())
)]
pub fn apply_pipeline(
    buf: &mut PixelBuffer,
    config: &GlitchConfig,
    progress: f64,
    rng: &mut dyn RngCore,
) {
    let inputs = StageInputs {
        params: &config.params,
        progress,
    };
    for stage in STAGES.iter().filter(|s| s.is_active(config)) {
        (stage.apply)(buf, &inputs, rng);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/stages.rs"]
mod tests;
