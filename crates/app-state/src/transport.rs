//! Playback transport: frame-quantized playhead, shuttle, in/out range.
//!
//! The playhead is stored as a whole frame count, never as seconds, so
//! repeated ticks cannot drift off the frame grid. Seconds are derived
//! on demand through the transport's frame rate.

use sc_common::{FrameNumber, Rational, TimeCode};
use serde::{Deserialize, Serialize};

/// Largest speed multiplier the shuttle ladder reaches.
pub const MAX_SHUTTLE_RATE: f64 = 32.0;

/// Direction of a shuttle step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShuttleDirection {
    Forward,
    Reverse,
}

impl ShuttleDirection {
    fn sign(self) -> f64 {
        match self {
            ShuttleDirection::Forward => 1.0,
            ShuttleDirection::Reverse => -1.0,
        }
    }
}

/// Transport state for the document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransportState {
    /// Current playhead position in frames.
    pub playhead_frame: FrameNumber,
    /// Frame rate the playhead is quantized to.
    pub fps: Rational,
    /// Signed speed multiplier: `0.0` is paused, negative plays backwards.
    pub play_rate: f64,
    /// Optional range start in timeline time.
    pub in_point: Option<TimeCode>,
    /// Optional range end in timeline time.
    pub out_point: Option<TimeCode>,
    /// Fractional frames carried between ticks at non-integer rates.
    /// Session-local; never replicated.
    #[serde(skip)]
    frame_carry: f64,
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportState {
    /// Create a paused transport at frame zero, 30 fps.
    pub fn new() -> Self {
        Self {
            playhead_frame: FrameNumber::ZERO,
            fps: Rational::FPS_30,
            play_rate: 0.0,
            in_point: None,
            out_point: None,
            frame_carry: 0.0,
        }
    }

    /// Playhead position in seconds.
    pub fn playhead_secs(&self) -> f64 {
        self.playhead_timecode().as_secs()
    }

    /// Playhead position as a timecode.
    pub fn playhead_timecode(&self) -> TimeCode {
        self.playhead_frame.as_timecode(self.fps)
    }

    /// Whether the transport is currently moving in either direction.
    pub fn is_playing(&self) -> bool {
        self.play_rate != 0.0
    }

    /// Jump to a time in seconds. Negative times land on frame zero, and
    /// the target is quantized to the nearest frame.
    pub fn seek_secs(&mut self, secs: f64) {
        self.playhead_frame = TimeCode::from_secs(secs.max(0.0)).as_frame(self.fps);
        self.frame_carry = 0.0;
        tracing::debug!(frame = self.playhead_frame.0, "Playhead seek");
    }

    /// Move the playhead by a signed number of frames, stopping at zero.
    pub fn nudge_frames(&mut self, delta: i64) {
        self.playhead_frame = self.playhead_frame.offset(delta);
        self.frame_carry = 0.0;
        tracing::debug!(delta, frame = self.playhead_frame.0, "Playhead nudge");
    }

    /// Start forward playback at normal speed.
    pub fn play(&mut self) {
        self.set_play_rate(1.0);
    }

    /// Stop playback, keeping the playhead where it is.
    pub fn pause(&mut self) {
        self.play_rate = 0.0;
        self.frame_carry = 0.0;
        tracing::debug!(frame = self.playhead_frame.0, "Transport paused");
    }

    /// Toggle between paused and normal-speed forward playback.
    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Set the signed speed multiplier directly.
    /// Clamped to `[-MAX_SHUTTLE_RATE, MAX_SHUTTLE_RATE]`; non-finite
    /// values are ignored.
    pub fn set_play_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            tracing::debug!(rate, "Ignoring non-finite play rate");
            return;
        }
        self.play_rate = rate.clamp(-MAX_SHUTTLE_RATE, MAX_SHUTTLE_RATE);
    }

    /// Step the shuttle ladder one notch in `direction`.
    ///
    /// From pause the rate becomes `±1`. A step in the direction already
    /// playing doubles the speed up to [`MAX_SHUTTLE_RATE`]; a step
    /// against it snaps back to `±1` in the new direction.
    pub fn step_shuttle(&mut self, direction: ShuttleDirection) {
        let sign = direction.sign();
        let next = if self.play_rate == 0.0 || self.play_rate.signum() != sign {
            sign
        } else {
            (self.play_rate * 2.0).clamp(-MAX_SHUTTLE_RATE, MAX_SHUTTLE_RATE)
        };
        self.play_rate = next;
        tracing::debug!(rate = self.play_rate, "Shuttle step");
    }

    /// Set the range start.
    pub fn set_in_point(&mut self, time: TimeCode) {
        self.in_point = Some(time);
        tracing::debug!(in_point = %time, "In-point set");
    }

    /// Set the range end.
    pub fn set_out_point(&mut self, time: TimeCode) {
        self.out_point = Some(time);
        tracing::debug!(out_point = %time, "Out-point set");
    }

    /// Clear both range points.
    pub fn clear_in_out(&mut self) {
        self.in_point = None;
        self.out_point = None;
        tracing::debug!("In/out points cleared");
    }

    /// The effective playback range, if one is active.
    ///
    /// A range needs a defined out-point; a missing in-point counts as
    /// zero. An out-point at or before the in-point deactivates the
    /// range rather than erroring.
    pub fn active_range(&self) -> Option<(TimeCode, TimeCode)> {
        let out = self.out_point?;
        let start = self.in_point.unwrap_or(TimeCode::ZERO);
        if out.as_secs() <= start.as_secs() {
            return None;
        }
        Some((start, out))
    }

    /// Advance the playhead by one tick's worth of frames at the current
    /// rate.
    ///
    /// Crossing an active out-point pins the playhead onto it and pauses;
    /// a transport that starts at or past the out-point plays on. Reverse
    /// playback pins at frame zero and pauses there.
    pub fn tick(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.frame_carry += self.play_rate;
        let whole = self.frame_carry.trunc() as i64;
        self.frame_carry -= whole as f64;
        if whole == 0 {
            return;
        }

        let before = self.playhead_frame;
        self.playhead_frame = self.playhead_frame.offset(whole);

        if whole < 0 && self.playhead_frame == FrameNumber::ZERO {
            tracing::debug!("Reverse playback reached frame zero");
            self.pause();
            return;
        }
        if whole > 0 {
            if let Some((_, out)) = self.active_range() {
                let out_frame = out.as_frame(self.fps);
                if before < out_frame && self.playhead_frame >= out_frame {
                    self.playhead_frame = out_frame;
                    tracing::debug!(frame = out_frame.0, "Playback stopped at out-point");
                    self.pause();
                }
            }
        }
    }

    /// Pull the playhead back inside `[0, extent_secs]` after the
    /// document shrank underneath it.
    pub fn clamp_to_extent(&mut self, extent_secs: f64) {
        if self.playhead_secs() > extent_secs {
            self.seek_secs(extent_secs);
        }
    }
}
