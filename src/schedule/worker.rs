use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context as _;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::model::GlitchConfig;
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{GlitchError, GlitchResult};
use crate::pipeline::apply_pipeline;

/// One frame handed to the worker. The buffer already holds the untouched source.
#[derive(Debug)]
pub struct PipelineJob {
    pub generation: u64,
    pub buffer: PixelBuffer,
    pub config: Arc<GlitchConfig>,
    pub progress: f64,
}

/// A processed frame, tagged with the generation it was submitted under.
#[derive(Debug)]
pub struct PipelineResult {
    pub generation: u64,
    pub buffer: PixelBuffer,
    pub progress: f64,
}

/// Runs the effect pipeline on a dedicated thread.
///
/// Buffers move to the worker and back through channels. At most one job is in flight.
pub struct PipelineWorker {
    jobs: Option<mpsc::SyncSender<PipelineJob>>,
    results: mpsc::Receiver<PipelineResult>,
    handle: Option<JoinHandle<()>>,
    in_flight: bool,
}

impl PipelineWorker {
    /// Spawn the worker thread. `seed` fixes its RNG; otherwise it is OS-seeded.
    pub fn spawn(seed: Option<u64>) -> GlitchResult<Self> {
        let (job_tx, job_rx) = mpsc::sync_channel::<PipelineJob>(1);
        let (res_tx, res_rx) = mpsc::sync_channel::<PipelineResult>(1);
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };

        let handle = thread::Builder::new()
            .name("glitchkit-pipeline".to_owned())
            .spawn(move || {
                while let Ok(mut job) = job_rx.recv() {
                    apply_pipeline(&mut job.buffer, &job.config, job.progress, &mut rng);
                    let out = PipelineResult {
                        generation: job.generation,
                        buffer: job.buffer,
                        progress: job.progress,
                    };
                    if res_tx.send(out).is_err() {
                        break;
                    }
                }
            })
            .context("failed to spawn pipeline worker thread")?;

        Ok(Self {
            jobs: Some(job_tx),
            results: res_rx,
            handle: Some(handle),
            in_flight: false,
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Hand `job` to the worker. Fails if a job is already in flight.
    pub fn submit(&mut self, job: PipelineJob) -> GlitchResult<()> {
        if self.in_flight {
            return Err(GlitchError::validation("pipeline worker already has a job in flight"));
        }
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| GlitchError::Other(anyhow::anyhow!("pipeline worker is shut down")))?;
        jobs.send(job)
            .map_err(|_| GlitchError::Other(anyhow::anyhow!("pipeline worker thread exited")))?;
        self.in_flight = true;
        Ok(())
    }

    /// Collect the finished job, if any, without blocking.
    pub fn try_recv(&mut self) -> GlitchResult<Option<PipelineResult>> {
        match self.results.try_recv() {
            Ok(res) => {
                self.in_flight = false;
                Ok(Some(res))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => self.disconnected(),
        }
    }

    /// Block up to `timeout` for the job in flight. Returns `None` when idle or timed out.
    pub fn recv_timeout(&mut self, timeout: Duration) -> GlitchResult<Option<PipelineResult>> {
        if !self.in_flight {
            return Ok(None);
        }
        match self.results.recv_timeout(timeout) {
            Ok(res) => {
                self.in_flight = false;
                Ok(Some(res))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => self.disconnected(),
        }
    }

    fn disconnected<T>(&mut self) -> GlitchResult<T> {
        self.in_flight = false;
        Err(GlitchError::Other(anyhow::anyhow!(
            "pipeline worker thread exited unexpectedly"
        )))
    }
}

impl Drop for PipelineWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop; a result it is still sending is
        // discarded once `results` drops with us.
        drop(self.jobs.take());
        while self.results.try_recv().is_ok() {}
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("pipeline worker thread panicked");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/worker.rs"]
mod tests;
