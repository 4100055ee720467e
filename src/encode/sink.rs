use crate::foundation::core::{Fps, FrameIndex, PixelBuffer};
use crate::foundation::error::{GlitchError, GlitchResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Frames the exporter will push.
    pub total_frames: u64,
}

/// Position of one captured frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStamp {
    pub index: FrameIndex,
    /// Raw animation progress of the frame, before reverse handling.
    pub progress: f64,
}

/// Consumer of exported frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices between one
/// `begin` and its `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> GlitchResult<()>;
    fn push_frame(&mut self, stamp: FrameStamp, frame: &PixelBuffer) -> GlitchResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> GlitchResult<()>;
}

/// Keeps every frame in memory. Used by tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameStamp, PixelBuffer)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(FrameStamp, PixelBuffer)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchResult<()> {
        self.frames.clear();
        self.frames.reserve(cfg.total_frames.min(1024) as usize);
        self.cfg = Some(cfg);
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, stamp: FrameStamp, frame: &PixelBuffer) -> GlitchResult<()> {
        if self.cfg.is_none() {
            return Err(GlitchError::encoding("in-memory sink not started"));
        }
        self.frames.push((stamp, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> GlitchResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Reject a frame whose index does not follow `last` or whose size differs from `cfg`.
pub(crate) fn check_frame(
    cfg: &SinkConfig,
    last: Option<FrameIndex>,
    stamp: FrameStamp,
    frame: &PixelBuffer,
) -> GlitchResult<()> {
    if let Some(last) = last
        && stamp.index <= last
    {
        return Err(GlitchError::encoding(format!(
            "out-of-order frame index {} after {}",
            stamp.index.0, last.0
        )));
    }
    if frame.width() != cfg.width || frame.height() != cfg.height {
        return Err(GlitchError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width(),
            frame.height(),
            cfg.width,
            cfg.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
