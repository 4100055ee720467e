use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default number of frame intervals averaged by [`PerformanceMonitor`].
pub const DEFAULT_PERF_WINDOW: usize = 60;

/// Snapshot of recent frame pacing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerfMetrics {
    /// Mean of per-frame rates, rounded to a whole number.
    pub fps: u32,
    /// Mean frame interval in milliseconds, rounded to two decimals.
    pub frame_time_ms: f64,
    /// Intervals currently in the window.
    pub samples: usize,
}

/// Rolling window of frame intervals.
#[derive(Clone, Debug)]
pub struct PerformanceMonitor {
    window: usize,
    last: Option<Instant>,
    intervals: VecDeque<Duration>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_PERF_WINDOW)
    }
}

impl PerformanceMonitor {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            last: None,
            intervals: VecDeque::with_capacity(window),
        }
    }

    /// Note that a frame was presented at `now`. The first call only starts the clock.
    pub fn record_frame(&mut self, now: Instant) {
        if let Some(prev) = self.last.replace(now) {
            self.intervals.push_back(now.saturating_duration_since(prev));
            while self.intervals.len() > self.window {
                self.intervals.pop_front();
            }
        }
    }

    pub fn metrics(&self) -> PerfMetrics {
        let samples = self.intervals.len();
        if samples == 0 {
            return PerfMetrics::default();
        }
        let total_ms: f64 = self.intervals.iter().map(|d| d.as_secs_f64() * 1000.0).sum();
        let rates: Vec<f64> = self
            .intervals
            .iter()
            .filter(|d| !d.is_zero())
            .map(|d| 1.0 / d.as_secs_f64())
            .collect();
        let fps = if rates.is_empty() {
            0.0
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        };
        PerfMetrics {
            fps: fps.round() as u32,
            frame_time_ms: (total_ms / samples as f64 * 100.0).round() / 100.0,
            samples,
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.intervals.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/perf.rs"]
mod tests;
