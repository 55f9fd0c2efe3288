//! Edge snapping.
//!
//! Gestures pull clip edges toward nearby reference points: the beat grid
//! plus the edges of same-lane neighbors. Resolution is a plain linear
//! scan over a frozen reference list; with the list fixed for the length
//! of a gesture, equal-distance ties always resolve to the same
//! reference and the proposal never flickers.

use sc_common::ClipId;

use crate::timeline::Timeline;

/// Default capture distance in seconds.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.1;

/// Find the reference closest to `candidate`, within `threshold`.
///
/// The first reference at the minimal distance wins, so ties resolve by
/// position in the slice. Returns `None` when nothing is close enough.
pub fn find_snap(candidate: f64, references: &[f64], threshold: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for &reference in references {
        let distance = (candidate - reference).abs();
        if distance > threshold {
            continue;
        }
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, reference)),
        }
    }
    best.map(|(_, reference)| reference)
}

/// Collect the points a moving clip may snap to: every beat, then the
/// start and end of each same-lane sibling. The moving clip's own edges
/// are excluded so it cannot snap to itself.
pub fn snap_references(timeline: &Timeline, moving: &ClipId) -> Vec<f64> {
    let mut references: Vec<f64> = timeline.beats().to_vec();
    if let Some(lane) = timeline.clip(moving).map(|clip| clip.lane) {
        for clip in timeline.clips_sorted() {
            if clip.lane != lane || &clip.id == moving {
                continue;
            }
            references.push(clip.start);
            references.push(clip.end);
        }
    }
    references
}
