use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assets::decode::SourceImage;
use crate::config::model::GlitchConfig;
use crate::encode::png::encode_png;
use crate::encode::sink::{FrameSink, FrameStamp, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, PixelBuffer};
use crate::foundation::error::{GlitchError, GlitchResult};
use crate::pipeline::{active_stages, apply_pipeline, effective_progress};

/// Progress used for still exports when the caller has no preference.
pub const DEFAULT_STILL_PROGRESS: f64 = 0.5;

/// Video capture length and rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoOpts {
    /// Seconds of animation to capture.
    pub duration: f64,
    pub fps: Fps,
}

impl VideoOpts {
    pub fn new(duration: f64, fps: u32) -> GlitchResult<Self> {
        Ok(Self {
            duration,
            fps: Fps::whole(fps)?,
        })
    }

    /// One animation cycle of `config` at `fps`.
    pub fn for_config(config: &GlitchConfig, fps: u32) -> GlitchResult<Self> {
        Self::new(config.duration, fps)
    }
}

/// Frame count and per-frame progress for a video export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoPlan {
    pub total_frames: u64,
    /// `duration × fps`, possibly fractional.
    pub frames_exact: f64,
}

impl VideoPlan {
    pub fn new(opts: &VideoOpts) -> GlitchResult<Self> {
        if !opts.duration.is_finite() || opts.duration <= 0.0 {
            return Err(GlitchError::validation(format!(
                "video duration must be positive and finite, got {}",
                opts.duration
            )));
        }
        let frames_exact = opts.duration * opts.fps.as_f64();
        // Snap values within float noise of an integer (0.1 s × 30 fps) before rounding up.
        let nearest = frames_exact.round();
        let total = if (frames_exact - nearest).abs() < 1e-9 {
            nearest
        } else {
            frames_exact.ceil()
        };
        if total < 1.0 || total > u32::MAX as f64 {
            return Err(GlitchError::validation(format!(
                "video would have {total} frames"
            )));
        }
        Ok(Self {
            total_frames: total as u64,
            frames_exact,
        })
    }

    /// Raw progress of frame `k`: `k / frames_exact`.
    pub fn progress_at(&self, k: u64) -> f64 {
        k as f64 / self.frames_exact
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub frames: u64,
    pub width: u32,
    pub height: u32,
}

/// Frame-accurate capture of a glitch animation.
///
/// Unlike the live scheduler, frame count and progress depend only on the requested
/// duration and rate, never on how fast frames render.
pub struct Exporter {
    source: Option<SourceImage>,
    rng: StdRng,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    /// Exporter with an OS-seeded RNG.
    pub fn new() -> Self {
        Self {
            source: None,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Exporter whose random effects replay identically for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            source: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn load_image(&mut self, image: SourceImage) {
        self.source = Some(image);
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    fn source(&self) -> GlitchResult<&SourceImage> {
        self.source.as_ref().ok_or(GlitchError::MissingImage)
    }

    /// One frame of `config` at raw `progress`.
    pub fn render_still(
        &mut self,
        config: &GlitchConfig,
        progress: f64,
    ) -> GlitchResult<PixelBuffer> {
        let mut buf = self.source()?.to_buffer()?;
        config.validate()?;
        let p = effective_progress(config, progress);
        apply_pipeline(&mut buf, config, p, &mut self.rng);
        Ok(buf)
    }

    /// [`Self::render_still`] encoded as PNG.
    #[tracing::instrument(skip(self, config), fields(effect = %config.effect_name))]
    pub fn export_still(
        &mut self,
        config: &GlitchConfig,
        progress: f64,
    ) -> GlitchResult<Vec<u8>> {
        let frame = self.render_still(config, progress)?;
        let png = encode_png(&frame)?;
        tracing::debug!(bytes = png.len(), "still exported");
        Ok(png)
    }

    /// Render every frame of `opts` and push it into `sink`.
    ///
    /// Fails with [`GlitchError::MissingImage`] before touching the sink when no image is
    /// loaded.
    #[tracing::instrument(skip(self, config, sink), fields(effect = %config.effect_name))]
    pub fn export_video(
        &mut self,
        config: &GlitchConfig,
        opts: &VideoOpts,
        sink: &mut dyn FrameSink,
    ) -> GlitchResult<ExportStats> {
        let source = self.source.as_ref().ok_or(GlitchError::MissingImage)?;
        config.validate()?;
        let plan = VideoPlan::new(opts)?;
        tracing::debug!(
            frames = plan.total_frames,
            stages = ?active_stages(config),
            "video export planned"
        );

        let (width, height) = (source.width(), source.height());
        sink.begin(SinkConfig {
            width,
            height,
            fps: opts.fps,
            total_frames: plan.total_frames,
        })?;

        let mut buf = source.to_buffer()?;
        for k in 0..plan.total_frames {
            let raw = plan.progress_at(k);
            source.draw_into(&mut buf)?;
            apply_pipeline(&mut buf, config, effective_progress(config, raw), &mut self.rng);
            sink.push_frame(
                FrameStamp {
                    index: FrameIndex(k),
                    progress: raw,
                },
                &buf,
            )?;
        }
        sink.end()?;

        Ok(ExportStats {
            frames: plan.total_frames,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
