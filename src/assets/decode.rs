use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{GlitchError, GlitchResult};

/// Decoded source raster (straight-alpha RGBA8).
///
/// Immutable and cheap to clone; every frame redraws it into a fresh or recycled
/// [`PixelBuffer`] so effects never see a previous frame's corruption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap raw RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, rgba8: Vec<u8>) -> GlitchResult<Self> {
        // Reuse PixelBuffer's dimension/length validation.
        let checked = PixelBuffer::from_rgba(width, height, rgba8)?;
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(checked.into_bytes()),
        })
    }

    /// Decode encoded image bytes (PNG, JPEG, WebP, ...).
    pub fn decode(bytes: &[u8]) -> GlitchResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        Self::from_dynamic(dyn_img)
    }

    /// Decode an image file from disk.
    pub fn open(path: impl AsRef<Path>) -> GlitchResult<Self> {
        let path = path.as_ref();
        let dyn_img =
            image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
        Self::from_dynamic(dyn_img)
    }

    /// Decode a `data:image/...;base64,...` URL as produced by browser file readers.
    pub fn from_data_url(url: &str) -> GlitchResult<Self> {
        let Some(rest) = url.trim().strip_prefix("data:") else {
            return Err(GlitchError::decode("image source is not a data URL"));
        };
        let Some((meta, payload)) = rest.split_once(',') else {
            return Err(GlitchError::decode("data URL is missing the ',' separator"));
        };
        if !meta.ends_with(";base64") {
            return Err(GlitchError::decode("only base64 data URLs are supported"));
        }
        let bytes = BASE64_STANDARD
            .decode(payload)
            .map_err(|e| GlitchError::decode(format!("data URL payload: {e}")))?;
        Self::decode(&bytes)
    }

    /// Resolve a config `imageSource`: data URLs are decoded inline, anything else is treated
    /// as a file path relative to `base_dir`.
    pub fn resolve(source: &str, base_dir: &Path) -> GlitchResult<Self> {
        if source.trim_start().starts_with("data:") {
            return Self::from_data_url(source);
        }
        let path = Path::new(source);
        if path.is_absolute() {
            Self::open(path)
        } else {
            Self::open(base_dir.join(path))
        }
    }

    fn from_dynamic(dyn_img: image::DynamicImage) -> GlitchResult<Self> {
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Draw the untouched source into `dst`, resizing `dst` to the source dimensions.
    pub fn draw_into(&self, dst: &mut PixelBuffer) -> GlitchResult<()> {
        dst.copy_from(self.width, self.height, &self.rgba8)
    }

    /// Fresh frame buffer holding the untouched source.
    pub fn to_buffer(&self) -> GlitchResult<PixelBuffer> {
        PixelBuffer::from_rgba(self.width, self.height, self.rgba8.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
