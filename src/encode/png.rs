use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::ImageEncoder as _;
use image::codecs::png::PngEncoder;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, FrameStamp, SinkConfig, check_frame};
use crate::foundation::core::{FrameIndex, PixelBuffer};
use crate::foundation::error::{GlitchError, GlitchResult};

/// Encode `frame` as an RGBA8 PNG.
pub fn encode_png(frame: &PixelBuffer) -> GlitchResult<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            frame.as_bytes(),
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| GlitchError::encoding(format!("png encode failed: {e}")))?;
    if out.is_empty() {
        return Err(GlitchError::encoding("png encoder produced no data"));
    }
    Ok(out)
}

/// Write `frame` to `path` as PNG, creating parent directories.
pub fn write_png(path: &Path, frame: &PixelBuffer) -> GlitchResult<()> {
    let bytes = encode_png(frame)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Writes each frame to `<dir>/<prefix>_<index>.png`, zero-padded to five digits.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame".to_owned(),
            cfg: None,
            last_idx: None,
            written: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Files written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}_{:05}.png", self.prefix, idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> GlitchResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, stamp: FrameStamp, frame: &PixelBuffer) -> GlitchResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| GlitchError::encoding("png sequence sink not started"))?;
        check_frame(cfg, self.last_idx, stamp, frame)?;
        self.last_idx = Some(stamp.index);

        let path = self.frame_path(stamp.index);
        let bytes = encode_png(frame)?;
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        self.written.push(path);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn end(&mut self) -> GlitchResult<()> {
        if self.cfg.take().is_none() {
            return Err(GlitchError::encoding("png sequence sink not started"));
        }
        tracing::debug!(frames = self.written.len(), "png sequence written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
