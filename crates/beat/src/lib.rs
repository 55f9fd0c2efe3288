//! `sc-beat` — Beat detection for the SnapCut editing engine.
//!
//! Turns provider audio into the beat grid the timeline snaps against:
//!
//! - **PCM**: `decode_i16le` / `encode_i16le` (16-bit little-endian mono)
//! - **Detection**: `detect` + `DetectorOptions` (adaptive energy onset gates)
//! - **Tasking**: `DetectionTask` (one-shot, cancellable worker-thread run)
//! - **Errors**: `BeatError` (thiserror-based)
//!
//! The detector is deliberately simple intensity analysis: it reports
//! onset times, not tempo. Its output feeds the timeline wholesale; a
//! failed run leaves whatever grid was there before untouched.

pub mod detector;
pub mod error;
pub mod pcm;
pub mod task;

// Re-export commonly used items at crate root
pub use detector::{detect, DetectorOptions};
pub use error::{BeatError, BeatResult};
pub use pcm::{decode_i16le, encode_i16le};
pub use task::DetectionTask;
