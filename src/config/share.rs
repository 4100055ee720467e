use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD as BASE64_STANDARD, URL_SAFE as BASE64_URL_SAFE};

use crate::config::model::{GlitchConfig, GlitchConfigPatch};
use crate::config::presets;
use crate::foundation::error::{GlitchError, GlitchResult};

/// Share string: standard base64 of the config JSON.
pub fn encode_shared(config: &GlitchConfig) -> GlitchResult<String> {
    let json = config.to_json_string()?;
    Ok(BASE64_STANDARD.encode(json.as_bytes()))
}

/// Parse a share string. Accepts the standard and URL-safe alphabets; surrounding whitespace
/// is ignored.
pub fn decode_shared(s: &str) -> GlitchResult<GlitchConfig> {
    let s = s.trim();
    if s.is_empty() {
        return Err(GlitchError::decode("share string is empty"));
    }
    let bytes = BASE64_STANDARD
        .decode(s)
        .or_else(|_| BASE64_URL_SAFE.decode(s))
        .map_err(|e| GlitchError::decode(format!("share string is not base64: {e}")))?;
    let json = std::str::from_utf8(&bytes)
        .map_err(|e| GlitchError::decode(format!("share string is not UTF-8 JSON: {e}")))?;
    GlitchConfig::from_json_str(json)
}

/// Where a configuration arrives from.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigSource {
    /// Built-in preset id.
    Preset(String),
    /// Share string produced by [`encode_shared`].
    Shared(String),
    /// Stored JSON (gallery entry, file on disk).
    Stored(String),
    /// Incremental edit from a UI control.
    Edit(GlitchConfigPatch),
}

impl ConfigSource {
    /// Resolve into a full, validated config. `current` is the base for [`ConfigSource::Edit`].
    pub fn resolve(&self, current: &GlitchConfig) -> GlitchResult<GlitchConfig> {
        match self {
            ConfigSource::Preset(id) => presets::find(id)
                .map(presets::Preset::config)
                .ok_or_else(|| GlitchError::decode(format!("unknown preset '{id}'"))),
            ConfigSource::Shared(s) => decode_shared(s),
            ConfigSource::Stored(json) => GlitchConfig::from_json_str(json),
            ConfigSource::Edit(patch) => current.patched(patch),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConfigSource::Preset(_) => "preset",
            ConfigSource::Shared(_) => "shared",
            ConfigSource::Stored(_) => "stored",
            ConfigSource::Edit(_) => "edit",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/share.rs"]
mod tests;
