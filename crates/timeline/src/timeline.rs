//! The authoritative timeline document and its edit operations.
//!
//! All mutation funnels through `Timeline`'s methods (single-writer
//! discipline). Operations are synchronous and tolerant: a reference to a
//! clip that no longer exists is absorbed as a no-op, and the one hard
//! failure is constructing an interval that cannot exist. Derived state
//! (the track list and the total duration) is consistent again before
//! every method returns.

use std::collections::{HashMap, HashSet};

use sc_common::{AssetId, ClipId, GroupId};
use serde::{Deserialize, Serialize};

use crate::error::EditResult;
use crate::snap::find_snap;
use crate::types::{validate_interval, Clip, ClipPatch, Track, TrackKind};

/// The document every editing surface reads and writes.
///
/// Clips live in a map keyed by id; ordering is a presentation concern,
/// so consumers that need it call [`clips_sorted`](Self::clips_sorted).
/// Tracks are synthesized per lane and the beat grid is replaced
/// wholesale by detection runs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Timeline {
    clips: HashMap<ClipId, Clip>,
    tracks: Vec<Track>,
    beats: Vec<f64>,
    duration_secs: f64,
    next_clip_seq: u64,
    next_group_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn clip(&self, id: &ClipId) -> Option<&Clip> {
        self.clips.get(id)
    }

    /// Clips ordered by start time (id as tiebreak, so the order is
    /// deterministic even for identical intervals).
    pub fn clips_sorted(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.values().collect();
        clips.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        clips
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Total extent in seconds: the maximum clip end, or 0 when empty.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn beats(&self) -> &[f64] {
        &self.beats
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, lane: usize) -> Option<&Track> {
        self.tracks.get(lane)
    }

    pub fn max_lane(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.tracks.len() - 1)
        }
    }

    // -----------------------------------------------------------------------
    // Clip mutation
    // -----------------------------------------------------------------------

    /// Place a new clip. The lane's tracks are materialized as needed and
    /// the timeline extent grows to cover the new end.
    pub fn add_clip(
        &mut self,
        start: f64,
        end: f64,
        lane: usize,
        asset_id: Option<AssetId>,
        group_id: Option<GroupId>,
    ) -> EditResult<ClipId> {
        validate_interval(start, end)?;
        let id = self.mint_clip_id();
        let clip = Clip::new(id.clone(), start, end, lane, asset_id, group_id)?;
        self.backfill_tracks(lane);
        // A new clip can only extend the timeline, never shrink it.
        self.duration_secs = self.duration_secs.max(end);
        self.clips.insert(id.clone(), clip);
        tracing::debug!(clip_id = %id, lane, start, end, "Added clip");
        Ok(id)
    }

    /// Merge a partial update into an existing clip.
    ///
    /// Unknown ids are absorbed as no-ops. The merged interval is
    /// validated before anything is stored; a rejected patch leaves the
    /// clip untouched. The extent is recomputed over all clips since an
    /// update can shrink it.
    pub fn update_clip(&mut self, id: &ClipId, patch: ClipPatch) -> EditResult<()> {
        let (start, end, lane) = match self.clips.get(id) {
            Some(current) => (
                patch.start.unwrap_or(current.start),
                patch.end.unwrap_or(current.end),
                patch.lane.unwrap_or(current.lane),
            ),
            None => {
                tracing::debug!(clip_id = %id, "Update ignored: unknown clip");
                return Ok(());
            }
        };
        validate_interval(start, end)?;

        if let Some(clip) = self.clips.get_mut(id) {
            clip.start = start;
            clip.end = end;
            clip.lane = lane;
            if let Some(asset_id) = patch.asset_id {
                clip.asset_id = Some(asset_id);
            }
            if let Some(group_id) = patch.group_id {
                clip.group_id = Some(group_id);
            }
        }
        self.backfill_tracks(lane);
        self.recalculate_duration();
        tracing::debug!(clip_id = %id, start, end, lane, "Updated clip");
        Ok(())
    }

    /// Remove a clip. Unknown ids are absorbed as no-ops.
    ///
    /// With `ripple` set, every clip on the same lane starting strictly
    /// after the removed clip shifts left by the removed duration, closing
    /// the gap. Other lanes are untouched, so clips linked across lanes
    /// can fall out of sync; callers wanting lockstep must ripple each
    /// lane themselves.
    pub fn remove_clip(&mut self, id: &ClipId, ripple: bool) {
        let removed = match self.clips.remove(id) {
            Some(clip) => clip,
            None => {
                tracing::debug!(clip_id = %id, "Remove ignored: unknown clip");
                return;
            }
        };
        if ripple {
            let shift = removed.duration();
            for clip in self.clips.values_mut() {
                if clip.lane == removed.lane && clip.start > removed.start {
                    clip.start -= shift;
                    clip.end -= shift;
                }
            }
        }
        self.recalculate_duration();
        tracing::debug!(clip_id = %removed.id, lane = removed.lane, ripple, "Removed clip");
    }

    /// Split every clip that spans `time`, across all lanes at once.
    ///
    /// The cut is boundary-exclusive: a clip starting or ending exactly at
    /// `time` is left alone. The left half keeps the original id and group;
    /// the right half gets a fresh id. Right halves of clips that shared a
    /// group are linked under one fresh group, so a video/audio pair splits
    /// into two pairs rather than four loose clips.
    ///
    /// Returns the ids of the newly created right halves.
    pub fn split_clip_at(&mut self, time: f64) -> Vec<ClipId> {
        let affected: Vec<ClipId> = self
            .clips_sorted()
            .into_iter()
            .filter(|clip| time > clip.start && time < clip.end)
            .map(|clip| clip.id.clone())
            .collect();

        let mut fresh_groups: HashMap<GroupId, GroupId> = HashMap::new();
        let mut created = Vec::with_capacity(affected.len());

        for id in affected {
            let (end, lane, asset_id, group_id) = match self.clips.get(&id) {
                Some(clip) => (
                    clip.end,
                    clip.lane,
                    clip.asset_id.clone(),
                    clip.group_id.clone(),
                ),
                None => continue,
            };

            let right_group = group_id.map(|group| match fresh_groups.get(&group) {
                Some(fresh) => fresh.clone(),
                None => {
                    let fresh = self.mint_group_id();
                    fresh_groups.insert(group, fresh.clone());
                    fresh
                }
            });

            if let Some(clip) = self.clips.get_mut(&id) {
                clip.end = time;
            }
            let right_id = self.mint_clip_id();
            let right = Clip {
                id: right_id.clone(),
                start: time,
                end,
                lane,
                asset_id,
                group_id: right_group,
            };
            self.clips.insert(right_id.clone(), right);
            tracing::debug!(clip_id = %id, right_id = %right_id, time, "Split clip");
            created.push(right_id);
        }

        if !created.is_empty() {
            self.recalculate_duration();
        }
        created
    }

    /// Drop a clip onto a lane, pushing it right past any occupied space.
    ///
    /// While the candidate window overlaps existing clips, the start moves
    /// forward to the farthest end among the clips it currently collides
    /// with. The clip always lands at or after the requested start with
    /// its duration intact; earlier gaps are never considered.
    pub fn insert_clip_on_lane(
        &mut self,
        lane: usize,
        start: f64,
        duration: f64,
        asset_id: Option<AssetId>,
        group_id: Option<GroupId>,
    ) -> EditResult<ClipId> {
        let resolved = self.resolve_insert_start(lane, start, duration);
        if resolved != start {
            tracing::debug!(lane, requested = start, resolved, "Insertion pushed past overlap");
        }
        self.add_clip(resolved, resolved + duration, lane, asset_id, group_id)
    }

    /// Insert an asset's clips, linking video and audio halves.
    ///
    /// Video assets land as a pair on a (video, audio) lane couple sharing
    /// one fresh group; each lane resolves overlap independently. Audio
    /// assets land as a single clip on an audio lane. Without an explicit
    /// target the clips append on fresh lanes past the current maximum,
    /// starting at 0.
    pub fn insert_asset(
        &mut self,
        kind: TrackKind,
        duration: f64,
        asset_id: Option<AssetId>,
        at: Option<(usize, f64)>,
    ) -> EditResult<Vec<ClipId>> {
        validate_interval(0.0, duration)?;
        let next_lane = self.max_lane().map(|lane| lane + 1).unwrap_or(0);
        match kind {
            TrackKind::Video => {
                // The pair needs an even lane; an odd target is nudged down
                // when explicit, up when appending.
                let video_lane = match at {
                    Some((lane, _)) => lane - lane % 2,
                    None => next_lane + next_lane % 2,
                };
                let start = at.map(|(_, start)| start).unwrap_or(0.0);
                let group = self.mint_group_id();
                let video = self.insert_clip_on_lane(
                    video_lane,
                    start,
                    duration,
                    asset_id.clone(),
                    Some(group.clone()),
                )?;
                let audio = self.insert_clip_on_lane(
                    video_lane + 1,
                    start,
                    duration,
                    asset_id,
                    Some(group),
                )?;
                Ok(vec![video, audio])
            }
            TrackKind::Audio => {
                let lane = match at {
                    Some((lane, _)) if lane % 2 == 1 => lane,
                    Some((lane, _)) => lane + 1,
                    None => next_lane + 1 - next_lane % 2,
                };
                let start = at.map(|(_, start)| start).unwrap_or(0.0);
                let id = self.insert_clip_on_lane(lane, start, duration, asset_id, None)?;
                Ok(vec![id])
            }
        }
    }

    /// Pull the requested clips onto the beat grid, keeping groups intact.
    ///
    /// Clips are visited in start order and each group moves at most once:
    /// the earliest member's start snaps to the nearest beat within
    /// `threshold` and every clip sharing its group shifts by the same
    /// delta. A clip (or group) whose start has no beat nearby stays put.
    ///
    /// Returns the number of clips that moved.
    pub fn align_clips_to_beats(&mut self, ids: &[ClipId], threshold: f64) -> usize {
        let mut ordered: Vec<ClipId> = {
            let requested: HashSet<&ClipId> = ids.iter().collect();
            self.clips_sorted()
                .into_iter()
                .filter(|clip| requested.contains(&clip.id))
                .map(|clip| clip.id.clone())
                .collect()
        };
        let mut visited_groups: HashSet<GroupId> = HashSet::new();
        let mut moved = 0;

        for id in ordered.drain(..) {
            let (start, group_id) = match self.clips.get(&id) {
                Some(clip) => (clip.start, clip.group_id.clone()),
                None => continue,
            };
            if let Some(group) = &group_id {
                if !visited_groups.insert(group.clone()) {
                    continue;
                }
            }
            let target = match find_snap(start, &self.beats, threshold) {
                Some(target) => target,
                None => continue,
            };
            let delta = target - start;
            if delta == 0.0 {
                continue;
            }

            let members: Vec<ClipId> = match &group_id {
                Some(group) => self
                    .clips
                    .values()
                    .filter(|clip| clip.group_id.as_ref() == Some(group))
                    .map(|clip| clip.id.clone())
                    .collect(),
                None => vec![id.clone()],
            };
            for member in &members {
                if let Some(clip) = self.clips.get_mut(member) {
                    clip.start += delta;
                    clip.end += delta;
                }
            }
            tracing::debug!(clip_id = %id, delta, target, members = members.len(), "Aligned to beat");
            moved += members.len();
        }

        if moved > 0 {
            self.recalculate_duration();
        }
        moved
    }

    // -----------------------------------------------------------------------
    // Beats and tracks
    // -----------------------------------------------------------------------

    /// Replace the beat grid wholesale. Beats are kept sorted so snap
    /// consumers can rely on a non-decreasing sequence no matter where the
    /// grid came from.
    pub fn set_beats(&mut self, mut beats: Vec<f64>) {
        beats.retain(|beat| beat.is_finite());
        beats.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        tracing::debug!(beats = beats.len(), "Replaced beat grid");
        self.beats = beats;
    }

    pub fn clear_beats(&mut self) {
        self.beats.clear();
    }

    pub fn set_track_muted(&mut self, lane: usize, muted: bool) {
        if let Some(track) = self.tracks.get_mut(lane) {
            track.muted = muted;
        }
    }

    pub fn set_track_locked(&mut self, lane: usize, locked: bool) {
        if let Some(track) = self.tracks.get_mut(lane) {
            track.locked = locked;
        }
    }

    /// Full reset: drops every clip, track, and beat. The only operation
    /// that destroys tracks.
    pub fn reset(&mut self) {
        tracing::debug!(
            clips = self.clips.len(),
            tracks = self.tracks.len(),
            "Resetting timeline"
        );
        *self = Self::default();
    }

    /// Re-derive cached state after this timeline was swapped in from an
    /// external document (a replication payload or a file load).
    ///
    /// Duration and the track list are recomputed from the clips, and the
    /// beat grid is re-sorted, so a payload produced by an older peer can
    /// never leave the document internally inconsistent.
    pub fn normalize(&mut self) {
        self.beats.retain(|beat| beat.is_finite());
        self.beats
            .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(max_lane) = self.clips.values().map(|clip| clip.lane).max() {
            self.backfill_tracks(max_lane);
        }
        self.recalculate_duration();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn mint_clip_id(&mut self) -> ClipId {
        let id = ClipId::new(format!("clip_{}", self.next_clip_seq));
        self.next_clip_seq += 1;
        id
    }

    fn mint_group_id(&mut self) -> GroupId {
        let id = GroupId::new(format!("group_{}", self.next_group_seq));
        self.next_group_seq += 1;
        id
    }

    /// Materialize tracks up to and including `lane`.
    fn backfill_tracks(&mut self, lane: usize) {
        while self.tracks.len() <= lane {
            let track = Track::for_lane(self.tracks.len());
            tracing::debug!(lane = track.lane, label = %track.label, "Materialized track");
            self.tracks.push(track);
        }
    }

    fn recalculate_duration(&mut self) {
        self.duration_secs = self
            .clips
            .values()
            .map(|clip| clip.end)
            .fold(0.0_f64, f64::max);
    }

    fn resolve_insert_start(&self, lane: usize, mut start: f64, duration: f64) -> f64 {
        loop {
            let mut pushed_to: Option<f64> = None;
            for clip in self.clips.values() {
                if clip.lane == lane && clip.overlaps(start, start + duration) {
                    match pushed_to {
                        Some(edge) if clip.end <= edge => {}
                        _ => pushed_to = Some(clip.end),
                    }
                }
            }
            match pushed_to {
                // Overlap implies clip.end > start, so every push moves
                // strictly forward and the loop terminates.
                Some(edge) => start = edge,
                None => return start,
            }
        }
    }
}
