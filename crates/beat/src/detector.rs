//! Energy-based beat detection.
//!
//! The detector splits a mono signal into fixed-size frames, compares each
//! frame's energy against an adaptive window of recent history, and reports
//! the times of frames that stand out. Two gates must both pass: a ratio
//! gate (energy vs window mean) and a deviation gate (energy vs mean plus a
//! multiple of the window's standard deviation). A refractory gap then
//! keeps rapid re-triggers from producing beat clusters.
//!
//! This is an intensity heuristic, not tempo tracking: no FFT, no
//! inter-onset modeling, just onset times.

use serde::{Deserialize, Serialize};

use crate::error::{BeatError, BeatResult};

/// Below this standard deviation the energy window is treated as flat
/// (near-silence) and the gates degenerate to "any energy at all".
const SILENCE_EPSILON: f64 = 1e-7;

/// Tuning parameters for [`detect`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorOptions {
    /// Samples per analysis frame (non-overlapping).
    pub frame_size: usize,
    /// Maximum number of prior frames in the adaptive energy window.
    pub history_size: usize,
    /// Ratio gate: frame energy must exceed this multiple of the window mean.
    pub energy_threshold: f64,
    /// Deviation gate: frame energy must exceed the window mean by this many
    /// window standard deviations.
    pub sensitivity: f64,
    /// Minimum separation between accepted beats, in seconds.
    pub refractory_gap_sec: f64,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            history_size: 43,
            energy_threshold: 1.3,
            sensitivity: 1.5,
            refractory_gap_sec: 0.25,
        }
    }
}

/// Detect beat onset times in a normalized mono signal.
///
/// Returns strictly increasing timestamps in seconds. A signal shorter
/// than one frame (or all silence) yields an empty sequence. The ragged
/// tail that does not fill a whole frame is discarded.
pub fn detect(samples: &[f32], sample_rate: u32, options: &DetectorOptions) -> BeatResult<Vec<f64>> {
    if sample_rate == 0 {
        return Err(BeatError::InvalidSampleRate(sample_rate));
    }
    let frame_size = options.frame_size.max(1);
    let history_size = options.history_size.max(1);

    let energies: Vec<f64> = samples.chunks_exact(frame_size).map(frame_energy).collect();

    let gap_frames = refractory_frames(options.refractory_gap_sec, sample_rate, frame_size);
    let frame_secs = frame_size as f64 / sample_rate as f64;

    let mut beats = Vec::new();
    let mut last_accepted: Option<usize> = None;

    // Frame 0 has no history and is never a candidate.
    for i in 1..energies.len() {
        let window = &energies[i.saturating_sub(history_size)..i];
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        let variance =
            window.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / window.len() as f64;
        let stddev = variance.sqrt();
        let energy = energies[i];

        let is_onset = if stddev < SILENCE_EPSILON {
            energy > 0.0
        } else {
            energy > options.energy_threshold * mean
                && energy > mean + options.sensitivity * stddev
        };
        if !is_onset {
            continue;
        }

        // Earliest beat in a cluster wins; later candidates inside the
        // refractory gap are dropped.
        if let Some(last) = last_accepted {
            if i - last < gap_frames {
                continue;
            }
        }
        last_accepted = Some(i);
        beats.push(i as f64 * frame_secs);
    }

    tracing::debug!(
        beats = beats.len(),
        frames = energies.len(),
        sample_rate,
        "Beat detection complete"
    );
    Ok(beats)
}

/// Mean of squared samples over one frame (f64 accumulator).
fn frame_energy(frame: &[f32]) -> f64 {
    let sum_sq: f64 = frame.iter().map(|s| *s as f64 * *s as f64).sum();
    sum_sq / frame.len() as f64
}

/// Refractory gap in whole frames, rounded up.
fn refractory_frames(gap_sec: f64, sample_rate: u32, frame_size: usize) -> usize {
    (gap_sec * sample_rate as f64 / frame_size as f64).ceil().max(0.0) as usize
}
