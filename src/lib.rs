//! glitchkit applies animated glitch effects to still images.
//!
//! A [`GlitchConfig`] names the effects to run and their parameters. The same effect
//! pipeline backs two drivers:
//!
//! - [`FrameScheduler`] for live preview, driven by an injected wall clock
//! - [`Exporter`] for frame-accurate stills and videos, pushed into a [`FrameSink`]
//!
//! Configurations are plain serde JSON, shareable as base64 strings, and managed with
//! undo/redo by [`ConfigStore`].
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod effects;
pub mod encode;
pub mod export;
pub mod foundation;
pub mod pipeline;
pub mod schedule;
pub mod state;

pub use crate::assets::decode::SourceImage;
pub use crate::config::model::{GlitchConfig, GlitchConfigPatch, Quality, default_params};
pub use crate::config::params::{EffectId, GlitchParams, ParamKey};
pub use crate::config::presets::Preset;
pub use crate::config::share::{ConfigSource, decode_shared, encode_shared};
pub use crate::foundation::core::{Fps, FrameIndex, PixelBuffer};
pub use crate::foundation::error::{GlitchError, GlitchResult};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, encode_png, write_png};
pub use crate::encode::sink::{FrameSink, FrameStamp, InMemorySink, SinkConfig};
pub use crate::export::{DEFAULT_STILL_PROGRESS, ExportStats, Exporter, VideoOpts, VideoPlan};
pub use crate::pipeline::{active_stages, apply_pipeline, effective_progress};
pub use crate::schedule::{
    FrameScheduler, PerfMetrics, PerformanceMonitor, PipelineWorker, PlaybackState,
    SchedulerOpts, TickOutcome,
};
pub use crate::state::history::{History, MAX_HISTORY};
pub use crate::state::store::ConfigStore;
