//! Drag and trim gestures.
//!
//! Interactive edits run in two phases. While the pointer moves, the
//! gesture produces transient proposals that never touch the timeline;
//! when it ends, a single commit applies the final proposal through the
//! normal update path (where interval validation still applies).
//! Cancelling discards the gesture outright, so a half-finished drag can
//! never leave the document in an intermediate state.

use sc_common::ClipId;

use crate::error::EditResult;
use crate::snap::{find_snap, snap_references, DEFAULT_SNAP_THRESHOLD};
use crate::timeline::Timeline;
use crate::types::ClipPatch;

/// Which handle the pointer grabbed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GestureMode {
    /// Slide the whole clip; duration is preserved.
    Move,
    /// Drag the left edge; the right edge stays put.
    TrimStart,
    /// Drag the right edge; the left edge stays put.
    TrimEnd,
}

/// A transient proposal for where the clip would land.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GesturePreview {
    pub start: f64,
    pub end: f64,
    /// The reference the moving edge locked onto, if any.
    pub snapped_to: Option<f64>,
}

/// An in-flight drag.
///
/// Holds the origin snapshot and a reference list frozen at gesture
/// start; the timeline itself stays untouched until [`commit`](Self::commit).
#[derive(Clone, Debug)]
pub struct DragGesture {
    clip_id: ClipId,
    mode: GestureMode,
    origin_start: f64,
    origin_end: f64,
    references: Vec<f64>,
    threshold: f64,
}

impl DragGesture {
    /// Begin a gesture on a clip.
    ///
    /// Returns `None` when the clip is gone; a stale reference is not an
    /// error, the gesture just never starts.
    pub fn begin(timeline: &Timeline, clip_id: &ClipId, mode: GestureMode) -> Option<Self> {
        let clip = timeline.clip(clip_id)?;
        let gesture = Self {
            clip_id: clip_id.clone(),
            mode,
            origin_start: clip.start,
            origin_end: clip.end,
            references: snap_references(timeline, clip_id),
            threshold: DEFAULT_SNAP_THRESHOLD,
        };
        tracing::debug!(clip_id = %clip_id, ?mode, "Gesture started");
        Some(gesture)
    }

    /// Override the snap capture distance for this gesture.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn clip_id(&self) -> &ClipId {
        &self.clip_id
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    /// The transient proposal for the current pointer delta.
    ///
    /// Pure: call it as often as the pointer moves, nothing is written.
    /// Trim proposals may be inverted mid-drag; that only matters at
    /// commit time.
    pub fn preview(&self, delta_secs: f64) -> GesturePreview {
        match self.mode {
            GestureMode::Move => {
                let candidate = self.origin_start + delta_secs;
                let snapped_to = find_snap(candidate, &self.references, self.threshold);
                let start = snapped_to.unwrap_or(candidate);
                GesturePreview {
                    start,
                    end: start + (self.origin_end - self.origin_start),
                    snapped_to,
                }
            }
            GestureMode::TrimStart => {
                let candidate = self.origin_start + delta_secs;
                let snapped_to = find_snap(candidate, &self.references, self.threshold);
                GesturePreview {
                    start: snapped_to.unwrap_or(candidate),
                    end: self.origin_end,
                    snapped_to,
                }
            }
            GestureMode::TrimEnd => {
                let candidate = self.origin_end + delta_secs;
                let snapped_to = find_snap(candidate, &self.references, self.threshold);
                GesturePreview {
                    start: self.origin_start,
                    end: snapped_to.unwrap_or(candidate),
                    snapped_to,
                }
            }
        }
    }

    /// End the gesture, applying the final proposal as one update.
    ///
    /// An inverted trim is rejected by interval validation and the stored
    /// clip stays exactly as it was.
    pub fn commit(self, timeline: &mut Timeline, delta_secs: f64) -> EditResult<()> {
        let proposal = self.preview(delta_secs);
        tracing::debug!(
            clip_id = %self.clip_id,
            start = proposal.start,
            end = proposal.end,
            "Gesture commit"
        );
        timeline.update_clip(&self.clip_id, ClipPatch::span(proposal.start, proposal.end))
    }

    /// Abandon the gesture without touching the timeline.
    pub fn cancel(self) {
        tracing::debug!(clip_id = %self.clip_id, "Gesture cancelled");
    }
}
