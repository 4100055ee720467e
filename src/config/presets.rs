use crate::config::model::{GlitchConfig, Quality};
use crate::config::params::{EffectId, GlitchParams};

/// A named, ready-made configuration.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> GlitchConfig,
}

impl Preset {
    pub fn config(&self) -> GlitchConfig {
        (self.build)()
    }
}

static PRESETS: &[Preset] = &[
    Preset {
        id: "vhs-tape",
        name: "VHS Tape",
        description: "Worn cassette: tracking errors, scanlines and a soft red fringe",
        build: vhs_tape,
    },
    Preset {
        id: "digital-decay",
        name: "Digital Decay",
        description: "Corrupted stream with shifted blocks and smeared macroblocks",
        build: digital_decay,
    },
    Preset {
        id: "chroma-drift",
        name: "Chroma Drift",
        description: "Pulsing channel separation with lens fringing",
        build: chroma_drift,
    },
    Preset {
        id: "crt-scan",
        name: "CRT Scan",
        description: "Chunky pixels behind a dark scanline mask",
        build: crt_scan,
    },
    Preset {
        id: "heat-wave",
        name: "Heat Wave",
        description: "Rippling displacement with a warm, punchy grade",
        build: heat_wave,
    },
];

pub fn all() -> &'static [Preset] {
    PRESETS
}

pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

fn base(name: &str, modules: &[EffectId], params: GlitchParams) -> GlitchConfig {
    let defaults = GlitchConfig::default();
    GlitchConfig {
        effect_name: name.to_owned(),
        shader_modules: modules.to_vec(),
        params: defaults.params.merged(&params),
        ..defaults
    }
}

fn vhs_tape() -> GlitchConfig {
    base(
        "VHS Tape",
        &[
            EffectId::VhsDistortion,
            EffectId::Scanlines,
            EffectId::Noise,
            EffectId::ChromaticAberration,
        ],
        GlitchParams {
            vhs_intensity: Some(0.6),
            scanline_opacity: Some(0.35),
            noise_intensity: Some(0.4),
            aberration_strength: Some(0.6),
            ..GlitchParams::default()
        },
    )
}

fn digital_decay() -> GlitchConfig {
    GlitchConfig {
        duration: 3.0,
        quality: Quality::High,
        ..base(
            "Digital Decay",
            &[EffectId::GlitchBlocks, EffectId::Datamosh, EffectId::RgbSplit],
            GlitchParams {
                block_size: Some(24.0),
                datamosh_amount: Some(0.35),
                split_distance: Some(4.0),
                ..GlitchParams::default()
            },
        )
    }
}

fn chroma_drift() -> GlitchConfig {
    base(
        "Chroma Drift",
        &[EffectId::RgbSplit, EffectId::ChromaticAberration],
        GlitchParams {
            split_distance: Some(6.0),
            aberration_strength: Some(1.2),
            ..GlitchParams::default()
        },
    )
}

fn crt_scan() -> GlitchConfig {
    base(
        "CRT Scan",
        &[EffectId::Pixelate, EffectId::Scanlines, EffectId::ColorGrade],
        GlitchParams {
            pixel_size: Some(3.0),
            scanline_opacity: Some(0.5),
            contrast: Some(1.15),
            brightness: Some(-0.05),
            ..GlitchParams::default()
        },
    )
}

fn heat_wave() -> GlitchConfig {
    GlitchConfig {
        duration: 4.0,
        ..base(
            "Heat Wave",
            &[EffectId::Displacement, EffectId::ColorGrade],
            GlitchParams {
                displacement_strength: Some(4.0),
                contrast: Some(1.1),
                saturation: Some(1.3),
                ..GlitchParams::default()
            },
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/presets.rs"]
mod tests;
