use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assets::decode::SourceImage;
use crate::config::model::GlitchConfig;
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::GlitchResult;
use crate::pipeline::{apply_pipeline, effective_progress};
use crate::schedule::perf::{DEFAULT_PERF_WINDOW, PerformanceMonitor};
use crate::schedule::worker::{PipelineJob, PipelineResult, PipelineWorker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No source image; nothing is drawn.
    Idle,
    Running,
    Paused,
    /// A non-looping cycle completed. The last frame stays on display.
    Finished,
}

#[derive(Clone, Debug)]
pub struct SchedulerOpts {
    /// Fixed RNG seed for reproducible previews. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Run the pipeline on a [`PipelineWorker`] thread instead of inside `tick`.
    pub offload: bool,
    /// Frames averaged by the performance monitor.
    pub perf_window: usize,
}

impl Default for SchedulerOpts {
    fn default() -> Self {
        Self {
            seed: None,
            offload: false,
            perf_window: DEFAULT_PERF_WINDOW,
        }
    }
}

/// What a call to [`FrameScheduler::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    Idle,
    Paused,
    Finished,
    /// A new frame is on display, rendered at this effective progress.
    Rendered { progress: f64 },
    /// Offloaded frame still being processed.
    Pending,
}

/// Drives the effect pipeline from a wall clock for live preview.
///
/// The clock is injected: every time-dependent call takes `now`. Each source change or
/// config change bumps a generation counter so offloaded results computed for an older
/// generation are dropped instead of displayed.
pub struct FrameScheduler {
    opts: SchedulerOpts,
    config: Arc<GlitchConfig>,
    source: Option<SourceImage>,
    state: PlaybackState,
    start: Instant,
    paused_elapsed: Duration,
    frame: Option<PixelBuffer>,
    spare: Option<PixelBuffer>,
    generation: u64,
    rng: StdRng,
    worker: Option<PipelineWorker>,
    perf: PerformanceMonitor,
}

impl FrameScheduler {
    pub fn new(config: GlitchConfig, opts: SchedulerOpts) -> GlitchResult<Self> {
        config.validate()?;
        let rng = match opts.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let worker = if opts.offload {
            Some(PipelineWorker::spawn(opts.seed)?)
        } else {
            None
        };
        let perf = PerformanceMonitor::new(opts.perf_window);
        Ok(Self {
            opts,
            config: Arc::new(config),
            source: None,
            state: PlaybackState::Idle,
            start: Instant::now(),
            paused_elapsed: Duration::ZERO,
            frame: None,
            spare: None,
            generation: 0,
            rng,
            worker,
            perf,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn config(&self) -> &GlitchConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Frame currently on display, if any.
    pub fn frame(&self) -> Option<&PixelBuffer> {
        self.frame.as_ref()
    }

    pub fn perf(&self) -> &PerformanceMonitor {
        &self.perf
    }

    /// Start playing `image` from `now`.
    pub fn load_image(&mut self, image: SourceImage, now: Instant) {
        self.bump_generation();
        tracing::debug!(
            w = image.width(),
            h = image.height(),
            generation = self.generation,
            "source loaded"
        );
        self.source = Some(image);
        self.frame = None;
        self.spare = None;
        self.restart(now);
    }

    /// Drop the current source while a new one is being decoded. Nothing is drawn until
    /// [`Self::load_image`] is called again.
    pub fn begin_image_change(&mut self) {
        self.bump_generation();
        self.source = None;
        self.frame = None;
        self.spare = None;
        self.set_state(PlaybackState::Idle);
    }

    /// Swap in a new config and restart timing. A different `image_source` drops the current
    /// source as in [`Self::begin_image_change`].
    pub fn set_config(&mut self, config: GlitchConfig, now: Instant) -> GlitchResult<()> {
        config.validate()?;
        let image_changed = config.image_source != self.config.image_source;
        self.config = Arc::new(config);
        if image_changed {
            self.begin_image_change();
            return Ok(());
        }
        self.bump_generation();
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Paused => self.paused_elapsed = Duration::ZERO,
            PlaybackState::Running | PlaybackState::Finished => self.restart(now),
        }
        Ok(())
    }

    /// Hold the playback position. An offloaded frame still in flight is discarded.
    pub fn pause(&mut self, now: Instant) {
        if self.state == PlaybackState::Running {
            self.bump_generation();
            self.paused_elapsed = now.saturating_duration_since(self.start);
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Continue from the position held at [`Self::pause`].
    pub fn resume(&mut self, now: Instant) {
        if self.state == PlaybackState::Paused {
            self.start = now.checked_sub(self.paused_elapsed).unwrap_or(now);
            self.set_state(PlaybackState::Running);
        }
    }

    /// Advance playback to `now`, rendering a frame when running.
    pub fn tick(&mut self, now: Instant) -> GlitchResult<TickOutcome> {
        match self.state {
            PlaybackState::Idle => return Ok(TickOutcome::Idle),
            PlaybackState::Paused => return Ok(TickOutcome::Paused),
            PlaybackState::Finished => return Ok(TickOutcome::Finished),
            PlaybackState::Running => {}
        }
        let Some(source) = self.source.as_ref() else {
            self.set_state(PlaybackState::Idle);
            return Ok(TickOutcome::Idle);
        };

        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        let duration = self.config.duration;
        if !self.config.looping && elapsed >= duration {
            self.set_state(PlaybackState::Finished);
            return Ok(TickOutcome::Finished);
        }
        let raw = (elapsed % duration) / duration;
        let progress = effective_progress(&self.config, raw);

        let mut buf = match self.spare.take() {
            Some(b) => b,
            None => source.to_buffer()?,
        };
        source.draw_into(&mut buf)?;

        if self.worker.is_some() {
            return self.tick_offloaded(buf, progress, now);
        }

        apply_pipeline(&mut buf, &self.config, progress, &mut self.rng);
        self.present(buf, now);
        Ok(TickOutcome::Rendered { progress })
    }

    /// Wait up to `timeout` for an offloaded frame and display it if still current.
    ///
    /// Returns `true` when a frame was installed.
    pub fn settle(&mut self, timeout: Duration, now: Instant) -> GlitchResult<bool> {
        let Some(worker) = self.worker.as_mut() else {
            return Ok(false);
        };
        match worker.recv_timeout(timeout)? {
            Some(res) => Ok(self.accept(res, now)),
            None => Ok(false),
        }
    }

    /// Stop playback and release the source, frames and worker. Results still in flight are
    /// discarded.
    pub fn dispose(&mut self) {
        self.bump_generation();
        self.worker = None;
        self.source = None;
        self.frame = None;
        self.spare = None;
        self.perf.reset();
        self.set_state(PlaybackState::Idle);
    }

    fn tick_offloaded(
        &mut self,
        buf: PixelBuffer,
        progress: f64,
        now: Instant,
    ) -> GlitchResult<TickOutcome> {
        let Some(worker) = self.worker.as_mut() else {
            return Ok(TickOutcome::Pending);
        };
        let mut outcome = TickOutcome::Pending;
        if let Some(res) = worker.try_recv()? {
            let shown = res.progress;
            if self.accept(res, now) {
                outcome = TickOutcome::Rendered { progress: shown };
            }
        }

        let Some(worker) = self.worker.as_mut() else {
            return Ok(outcome);
        };
        if worker.is_busy() {
            self.spare = Some(buf);
        } else {
            worker.submit(PipelineJob {
                generation: self.generation,
                buffer: buf,
                config: Arc::clone(&self.config),
                progress,
            })?;
        }
        Ok(outcome)
    }

    fn accept(&mut self, res: PipelineResult, now: Instant) -> bool {
        if res.generation != self.generation || self.source.is_none() {
            tracing::debug!(
                got = res.generation,
                current = self.generation,
                "dropping stale pipeline result"
            );
            return false;
        }
        self.present(res.buffer, now);
        true
    }

    fn present(&mut self, buf: PixelBuffer, now: Instant) {
        if let Some(old) = self.frame.replace(buf)
            && self.spare.is_none()
        {
            self.spare = Some(old);
        }
        self.perf.record_frame(now);
    }

    fn restart(&mut self, now: Instant) {
        self.start = now;
        self.paused_elapsed = Duration::ZERO;
        if self.source.is_some() {
            self.set_state(PlaybackState::Running);
        }
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn set_state(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "playback state");
            self.state = next;
        }
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("offload", &self.opts.offload)
            .field("has_source", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
