//! Playback driver thread.
//!
//! The transport never advances on its own; something must call
//! [`crate::transport::TransportState::tick`] once per frame period.
//! `PlaybackDriver` is that something: a timer thread that briefly locks
//! the shared document each period and ticks it. All policy (rate,
//! range, stopping) lives in the transport itself; the driver only keeps
//! time.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::error::StateResult;
use crate::state::ProjectState;

enum DriverCommand {
    Stop,
}

/// Owns the timer thread driving a shared document's transport.
pub struct PlaybackDriver {
    command_tx: Sender<DriverCommand>,
    worker: Option<JoinHandle<()>>,
}

impl PlaybackDriver {
    /// Spawn a driver ticking `shared` at its transport's frame rate.
    pub fn spawn(shared: Arc<Mutex<ProjectState>>) -> StateResult<Self> {
        let (command_tx, command_rx) = channel::unbounded();
        let worker = thread::Builder::new()
            .name("playback-driver".to_string())
            .spawn(move || driver_main(shared, command_rx))?;
        Ok(Self {
            command_tx,
            worker: Some(worker),
        })
    }

    /// Stop the timer and join the thread. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.command_tx.send(DriverCommand::Stop);
            if worker.join().is_err() {
                tracing::error!("Playback driver thread panicked");
            }
        }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn driver_main(shared: Arc<Mutex<ProjectState>>, command_rx: Receiver<DriverCommand>) {
    tracing::debug!("Playback driver started");
    loop {
        let period = {
            let state = shared.lock();
            Duration::from_secs_f64(state.transport.fps.frame_duration_secs())
        };
        match command_rx.recv_timeout(period) {
            Ok(DriverCommand::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                shared.lock().transport.tick();
            }
        }
    }
    tracing::debug!("Playback driver stopped");
}
