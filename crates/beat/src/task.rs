//! Background beat detection.
//!
//! Analysis of a full asset can take a while, so it runs on a dedicated
//! worker thread and reports exactly one completion (success or failure)
//! through a bounded channel. The owner polls with
//! [`try_result`](DetectionTask::try_result) from its own loop, or blocks
//! with [`wait`](DetectionTask::wait). Dropping the handle abandons the
//! run: the worker's send fails silently and the thread winds down on its
//! own. No partial results are ever observable.

use crossbeam::channel::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::detector::{detect, DetectorOptions};
use crate::error::{BeatError, BeatResult};

/// One detection run on a worker thread.
pub struct DetectionTask {
    result_rx: Receiver<BeatResult<Vec<f64>>>,
    worker: Option<JoinHandle<()>>,
    delivered: bool,
}

impl DetectionTask {
    /// Spawn a worker analyzing `samples`; delivers one completion.
    pub fn spawn(
        samples: Vec<f32>,
        sample_rate: u32,
        options: DetectorOptions,
    ) -> BeatResult<Self> {
        let (result_tx, result_rx) = channel::bounded(1);

        let worker = thread::Builder::new()
            .name("beat-detect".to_string())
            .spawn(move || {
                tracing::debug!(
                    samples = samples.len(),
                    sample_rate,
                    "Detection worker started"
                );
                let outcome = detect(&samples, sample_rate, &options);
                // Send fails only when the task was abandoned.
                let _ = result_tx.send(outcome);
            })?;

        Ok(Self {
            result_rx,
            worker: Some(worker),
            delivered: false,
        })
    }

    /// Non-blocking poll for the completion.
    ///
    /// Returns the outcome exactly once; later calls return `None`.
    pub fn try_result(&mut self) -> Option<BeatResult<Vec<f64>>> {
        if self.delivered {
            return None;
        }
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.delivered = true;
                self.reap_worker();
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.delivered = true;
                self.reap_worker();
                Some(Err(BeatError::WorkerExited))
            }
        }
    }

    /// Whether the completion has already been taken.
    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// Block until the worker finishes and return its outcome.
    pub fn wait(mut self) -> BeatResult<Vec<f64>> {
        let outcome = self
            .result_rx
            .recv()
            .unwrap_or(Err(BeatError::WorkerExited));
        self.delivered = true;
        self.reap_worker();
        outcome
    }

    /// Abandon the run. The worker keeps going but its result is discarded.
    pub fn cancel(self) {
        tracing::debug!("Detection task cancelled");
        // Drop runs; the receiver disconnects and the worker detaches.
    }

    fn reap_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for DetectionTask {
    fn drop(&mut self) {
        // An unfinished worker is detached rather than joined, so dropping
        // (cancelling) never blocks on the analysis.
        self.worker.take();
    }
}
