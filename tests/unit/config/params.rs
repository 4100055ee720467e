use super::*;

#[test]
fn effect_ids_round_trip_through_their_json_names() {
    for id in EffectId::ALL {
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));
        assert_eq!(id.as_str().parse::<EffectId>().unwrap(), id);
    }
    assert!("bloom".parse::<EffectId>().is_err());
}

#[test]
fn non_finite_values_read_as_unset() {
    let p = GlitchParams {
        noise_intensity: Some(f64::NAN),
        pixel_size: Some(f64::INFINITY),
        block_size: Some(8.0),
        ..GlitchParams::default()
    };
    assert_eq!(p.get(ParamKey::NoiseIntensity), None);
    assert_eq!(p.get(ParamKey::PixelSize), None);
    assert_eq!(p.get(ParamKey::BlockSize), Some(8.0));
    assert_eq!(p.get(ParamKey::Contrast), None);
}

#[test]
fn merged_overlays_only_set_fields() {
    let base = GlitchParams {
        noise_intensity: Some(0.5),
        split_distance: Some(3.0),
        ..GlitchParams::default()
    };
    let over = GlitchParams {
        split_distance: Some(9.0),
        contrast: Some(1.2),
        ..GlitchParams::default()
    };
    let m = base.merged(&over);
    assert_eq!(m.noise_intensity, Some(0.5));
    assert_eq!(m.split_distance, Some(9.0));
    assert_eq!(m.contrast, Some(1.2));
}

#[test]
fn set_and_get_cover_every_key() {
    let mut p = GlitchParams::default();
    for (i, key) in ParamKey::ALL.into_iter().enumerate() {
        p.set(key, Some(i as f64));
    }
    for (i, key) in ParamKey::ALL.into_iter().enumerate() {
        assert_eq!(p.get(key), Some(i as f64));
    }
}
