//! Replication snapshots.
//!
//! Collaboration replicates whole documents: a peer encodes its state to
//! JSON bytes, the other side decodes and swaps its own document for the
//! payload. There is no operation log and no merging; the last writer
//! wins at the document level. The engine only has to guarantee that a
//! swapped-in document is immediately editable and that a bad payload
//! never destroys local state.

use serde::{Deserialize, Serialize};

use crate::error::StateResult;
use crate::media::AssetEntry;
use crate::state::ProjectState;
use sc_timeline::Timeline;

/// The replicated portion of a document.
///
/// Transport and the dirty flag are session-local and stay out of the
/// payload; every peer keeps its own playhead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Project name.
    pub project_name: String,
    /// Clips, tracks, and the beat grid.
    pub timeline: Timeline,
    /// The asset registry.
    pub assets: Vec<AssetEntry>,
}

impl DocumentSnapshot {
    /// Capture a snapshot of the current document.
    pub fn capture(state: &ProjectState) -> Self {
        Self {
            project_name: state.project_name.clone(),
            timeline: state.timeline.clone(),
            assets: state.assets.clone(),
        }
    }

    /// Encode to the wire format.
    pub fn encode(&self) -> StateResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from the wire format.
    pub fn decode(bytes: &[u8]) -> StateResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Swap this snapshot in as the local document.
    ///
    /// Replaces the timeline, assets, and project name wholesale. The
    /// local transport survives, pulled back inside the new document's
    /// extent so the playhead cannot dangle past the end.
    pub fn restore(&self, state: &mut ProjectState) {
        state.project_name = self.project_name.clone();
        state.timeline = self.timeline.clone();
        state.assets = self.assets.clone();
        state.timeline.normalize();
        state.sync_transport();
        state.mark_dirty();
        tracing::debug!(
            clips = state.timeline.clip_count(),
            assets = state.assets.len(),
            "Snapshot restored"
        );
    }
}

impl ProjectState {
    /// Encode this document for a peer.
    pub fn encode_update(&self) -> StateResult<Vec<u8>> {
        DocumentSnapshot::capture(self).encode()
    }

    /// Decode a peer's payload and swap it in.
    ///
    /// A payload that fails to decode leaves the local document exactly
    /// as it was.
    pub fn apply_update(&mut self, bytes: &[u8]) -> StateResult<()> {
        let snapshot = DocumentSnapshot::decode(bytes)?;
        snapshot.restore(self);
        Ok(())
    }
}
