use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn config(modules: &[EffectId]) -> GlitchConfig {
    GlitchConfig {
        shader_modules: modules.to_vec(),
        ..GlitchConfig::default()
    }
}

fn gradient(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8, 255]);
        }
    }
    PixelBuffer::from_rgba(w, h, data).unwrap()
}

#[test]
fn stage_table_is_in_canonical_order() {
    let ids: Vec<_> = STAGES.iter().map(|s| s.id).collect();
    assert_eq!(
        ids,
        vec![
            EffectId::RgbSplit,
            EffectId::Noise,
            EffectId::GlitchBlocks,
            EffectId::Scanlines,
            EffectId::Pixelate,
            EffectId::Displacement,
            EffectId::VhsDistortion,
            EffectId::Datamosh,
            EffectId::ColorGrade,
            EffectId::ChromaticAberration,
        ]
    );
}

#[test]
fn active_stages_follow_table_order_not_config_order() {
    let cfg = config(&[
        EffectId::ChromaticAberration,
        EffectId::Scanlines,
        EffectId::RgbSplit,
    ]);
    assert_eq!(
        active_stages(&cfg),
        vec![
            EffectId::RgbSplit,
            EffectId::Scanlines,
            EffectId::ChromaticAberration
        ]
    );
}

#[test]
fn missing_param_skips_stage_but_color_grade_needs_none() {
    let mut cfg = config(&[EffectId::Pixelate, EffectId::ColorGrade]);
    cfg.params.pixel_size = None;
    assert_eq!(active_stages(&cfg), vec![EffectId::ColorGrade]);

    cfg.params.pixel_size = Some(f64::NAN);
    assert_eq!(active_stages(&cfg), vec![EffectId::ColorGrade]);
}

#[test]
fn empty_module_list_is_noop() {
    let cfg = config(&[]);
    let mut buf = gradient(20, 12);
    let before = buf.clone();
    apply_pipeline(&mut buf, &cfg, 0.3, &mut StdRng::seed_from_u64(1));
    assert_eq!(buf, before);
}

#[test]
fn split_distance_zero_is_noop_at_any_progress() {
    let mut cfg = config(&[EffectId::RgbSplit]);
    cfg.params.split_distance = Some(0.0);
    for p in [0.0, 0.25, 0.5, 0.75, 0.99] {
        let mut buf = gradient(10, 4);
        let before = buf.clone();
        apply_pipeline(&mut buf, &cfg, p, &mut StdRng::seed_from_u64(0));
        assert_eq!(buf, before);
    }
}

#[test]
fn rgb_split_oscillates_with_progress() {
    let cfg = config(&[EffectId::RgbSplit]);
    // splitDistance 3: offset 3 at p = 0, 0 at p = 0.75 (sin = -1).
    let mut at_zero = gradient(10, 1);
    apply_pipeline(&mut at_zero, &cfg, 0.0, &mut StdRng::seed_from_u64(0));
    assert_eq!(at_zero.pixel(0, 0).unwrap()[0], 0);
    assert_eq!(at_zero.pixel(5, 0).unwrap()[0], 14);

    let mut at_trough = gradient(10, 1);
    apply_pipeline(&mut at_trough, &cfg, 0.75, &mut StdRng::seed_from_u64(0));
    assert_eq!(at_trough, gradient(10, 1));
}

#[test]
fn module_order_does_not_change_output() {
    let a = config(&[
        EffectId::Noise,
        EffectId::Datamosh,
        EffectId::RgbSplit,
        EffectId::VhsDistortion,
        EffectId::Scanlines,
    ]);
    let mut b = a.clone();
    b.shader_modules.reverse();

    let mut buf_a = gradient(40, 40);
    let mut buf_b = gradient(40, 40);
    apply_pipeline(&mut buf_a, &a, 0.4, &mut StdRng::seed_from_u64(99));
    apply_pipeline(&mut buf_b, &b, 0.4, &mut StdRng::seed_from_u64(99));
    assert_eq!(buf_a, buf_b);
}

#[test]
fn effective_progress_honours_reverse() {
    let mut cfg = GlitchConfig::default();
    assert_eq!(effective_progress(&cfg, 0.25), 0.25);
    cfg.reverse = true;
    assert_eq!(effective_progress(&cfg, 0.25), 0.75);
    assert_eq!(effective_progress(&cfg, 0.0), 0.0);
    for k in 0u32..60 {
        let p = effective_progress(&cfg, f64::from(k) / 60.0);
        assert!((0.0..1.0).contains(&p), "{k}: {p}");
    }
}
