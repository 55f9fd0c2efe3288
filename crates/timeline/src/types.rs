//! Timeline data model: clips, tracks, lane conventions.

use sc_common::{AssetId, ClipId, GroupId};
use serde::{Deserialize, Serialize};

use crate::error::{EditError, EditResult};

/// Kind of content a track carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    /// Lane parity convention: even lanes carry video, odd lanes audio.
    pub fn for_lane(lane: usize) -> Self {
        if lane % 2 == 0 {
            TrackKind::Video
        } else {
            TrackKind::Audio
        }
    }
}

/// One horizontal band of the timeline.
///
/// Tracks are synthesized from lane indices, never created directly:
/// referencing lane N materializes every track up to N so the list is
/// never sparse. They disappear only on a full reset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub lane: usize,
    pub kind: TrackKind,
    pub label: String,
    pub locked: bool,
    pub muted: bool,
}

impl Track {
    /// Build the track implied by a lane index: kind from parity, label
    /// numbered per kind ("V1", "A1", "V2", ...).
    pub fn for_lane(lane: usize) -> Self {
        let kind = TrackKind::for_lane(lane);
        let ordinal = lane / 2 + 1;
        let label = match kind {
            TrackKind::Video => format!("V{ordinal}"),
            TrackKind::Audio => format!("A{ordinal}"),
        };
        Self {
            lane,
            kind,
            label,
            locked: false,
            muted: false,
        }
    }
}

/// A media interval placed on the timeline.
///
/// `start`/`end` are seconds forming a half-open interval `[start, end)`
/// with strictly positive length. Clips on the same lane may overlap at
/// rest; overlap is only resolved when new material is dropped in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub start: f64,
    pub end: f64,
    pub lane: usize,
    /// Media backing this clip. May dangle after the asset is removed;
    /// consumers render a dangling reference as unknown media.
    pub asset_id: Option<AssetId>,
    /// Clips sharing a group move together in group-aware operations.
    pub group_id: Option<GroupId>,
}

impl Clip {
    pub fn new(
        id: ClipId,
        start: f64,
        end: f64,
        lane: usize,
        asset_id: Option<AssetId>,
        group_id: Option<GroupId>,
    ) -> EditResult<Self> {
        validate_interval(start, end)?;
        Ok(Self {
            id,
            start,
            end,
            lane,
            asset_id,
            group_id,
        })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open containment test: `start <= time < end`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// True when this clip's interval crosses `[from, to)`.
    pub fn overlaps(&self, from: f64, to: f64) -> bool {
        self.start < to && self.end > from
    }
}

/// Partial update for `Timeline::update_clip`.
///
/// `None` fields keep their current values. Ids are set-only; a patch
/// cannot clear `asset_id` or `group_id`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClipPatch {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub lane: Option<usize>,
    pub asset_id: Option<AssetId>,
    pub group_id: Option<GroupId>,
}

impl ClipPatch {
    /// Patch moving both interval bounds at once.
    pub fn span(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }
}

/// A clip interval must have strictly positive length.
pub fn validate_interval(start: f64, end: f64) -> EditResult<()> {
    if !(end > start) {
        return Err(EditError::InvalidInterval { start, end });
    }
    Ok(())
}
