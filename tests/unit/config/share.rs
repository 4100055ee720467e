use super::*;
use crate::config::params::EffectId;
use base64::Engine as _;

#[test]
fn share_string_round_trips() {
    let cfg = GlitchConfig {
        effect_name: "Shared".to_owned(),
        shader_modules: vec![EffectId::Scanlines],
        ..GlitchConfig::default()
    };
    let s = encode_shared(&cfg).unwrap();
    assert_eq!(decode_shared(&s).unwrap(), cfg);
    assert_eq!(decode_shared(&format!("  {s}\n")).unwrap(), cfg);
}

#[test]
fn url_safe_alphabet_is_accepted() {
    let cfg = GlitchConfig {
        effect_name: "??>>".repeat(8),
        ..GlitchConfig::default()
    };
    let json = cfg.to_json_string().unwrap();
    let s = BASE64_URL_SAFE.encode(json.as_bytes());
    assert_eq!(decode_shared(&s).unwrap(), cfg);
}

#[test]
fn malformed_share_strings_are_decode_errors() {
    for bad in ["", "%%%not base64%%%", "aGVsbG8=", "eyJkdXJhdGlvbiI6ICJ4In0="] {
        let err = decode_shared(bad).unwrap_err();
        assert!(matches!(err, GlitchError::Decode(_)), "{bad}: {err}");
    }
}

#[test]
fn config_sources_resolve() {
    let current = GlitchConfig::default();
    let preset = ConfigSource::Preset("vhs-tape".to_owned())
        .resolve(&current)
        .unwrap();
    assert_eq!(preset.effect_name, "VHS Tape");

    let stored = ConfigSource::Stored(r#"{"effectName":"Disk"}"#.to_owned())
        .resolve(&current)
        .unwrap();
    assert_eq!(stored.effect_name, "Disk");

    let edit = ConfigSource::Edit(GlitchConfigPatch {
        reverse: Some(true),
        ..GlitchConfigPatch::default()
    })
    .resolve(&current)
    .unwrap();
    assert!(edit.reverse);

    assert!(ConfigSource::Preset("missing".to_owned()).resolve(&current).is_err());
}
