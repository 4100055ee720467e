pub mod perf;
pub mod scheduler;
pub mod worker;

pub use perf::{PerfMetrics, PerformanceMonitor};
pub use scheduler::{FrameScheduler, PlaybackState, SchedulerOpts, TickOutcome};
pub use worker::{PipelineJob, PipelineResult, PipelineWorker};
