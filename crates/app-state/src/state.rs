//! Central document state for the editing engine.
//!
//! `ProjectState` owns the timeline, the transport, and the asset
//! registry, and wires them together: imports place clips, edits clamp
//! the transport, and beat analysis feeds the timeline's beat grid.

use sc_beat::{decode_i16le, detect, DetectionTask, DetectorOptions};
use sc_common::{AssetId, ClipId};
use sc_timeline::{apply_command, CommandOutcome, Timeline, TrackKind};
use serde::{Deserialize, Serialize};

use crate::error::StateResult;
use crate::media::{AssetEntry, AssetKind, MediaProvider};
use crate::transport::TransportState;

/// The complete document: everything a session edits and replicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectState {
    /// Name of the current project.
    pub project_name: String,
    /// Clips, tracks, and the beat grid.
    pub timeline: Timeline,
    /// Playhead, rate, and in/out range.
    pub transport: TransportState,
    /// All imported assets.
    pub assets: Vec<AssetEntry>,
    /// Whether the document has unsaved changes.
    pub is_dirty: bool,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectState {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            project_name: "Untitled Project".to_string(),
            timeline: Timeline::new(),
            transport: TransportState::new(),
            assets: Vec::new(),
            is_dirty: false,
        }
    }

    /// Mark the document as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        if !self.is_dirty {
            self.is_dirty = true;
            tracing::debug!(project = %self.project_name, "Document marked dirty");
        }
    }

    /// Mark the document as saved.
    pub fn mark_clean(&mut self) {
        if self.is_dirty {
            self.is_dirty = false;
            tracing::debug!(project = %self.project_name, "Document marked clean");
        }
    }

    /// Find a registered asset by id.
    pub fn find_asset(&self, id: &AssetId) -> Option<&AssetEntry> {
        self.assets.iter().find(|asset| asset.id == *id)
    }

    /// Display name for an optional asset reference. Clips whose asset
    /// was removed (or that never had one) fall back to a placeholder.
    pub fn asset_display_name(&self, id: Option<&AssetId>) -> &str {
        id.and_then(|id| self.find_asset(id))
            .map(|asset| asset.name.as_str())
            .unwrap_or("Unknown Asset")
    }

    /// Import an asset: register it and drop its clips onto the timeline.
    ///
    /// Video assets land as a linked picture/sound pair, audio assets as
    /// a single clip. Returns the ids of the placed clips.
    pub fn import_asset(&mut self, entry: AssetEntry) -> StateResult<Vec<ClipId>> {
        let kind = match entry.kind {
            AssetKind::Video => TrackKind::Video,
            AssetKind::Audio => TrackKind::Audio,
        };
        let placed = self.timeline.insert_asset(
            kind,
            entry.duration_secs,
            Some(entry.id.clone()),
            None,
        )?;

        tracing::info!(
            asset_id = %entry.id,
            name = %entry.name,
            clips = placed.len(),
            "Imported asset"
        );
        if let Some(existing) = self.assets.iter_mut().find(|asset| asset.id == entry.id) {
            *existing = entry;
        } else {
            self.assets.push(entry);
        }
        self.after_edit();
        Ok(placed)
    }

    /// Remove an asset from the registry.
    ///
    /// Clips referring to it stay on the timeline; their display name
    /// falls back to the placeholder. Returns the removed entry, or
    /// `None` if the id was not registered.
    pub fn remove_asset(&mut self, id: &AssetId) -> Option<AssetEntry> {
        let pos = self.assets.iter().position(|asset| asset.id == *id)?;
        let entry = self.assets.remove(pos);
        tracing::debug!(asset_id = %id, "Removed asset");
        self.mark_dirty();
        Some(entry)
    }

    /// Split every clip under the playhead.
    pub fn split_at_playhead(&mut self) -> Vec<ClipId> {
        let at = self.transport.playhead_secs();
        let produced = self.timeline.split_clip_at(at);
        if !produced.is_empty() {
            self.after_edit();
        }
        produced
    }

    /// Parse and run one line of command text against the timeline.
    pub fn run_command(&mut self, text: &str) -> CommandOutcome {
        let outcome = apply_command(&mut self.timeline, text);
        if matches!(outcome, CommandOutcome::Applied(_)) {
            self.after_edit();
        }
        outcome
    }

    /// Run beat detection on an asset's audio and replace the beat grid.
    ///
    /// Blocks until analysis finishes. On any failure the existing grid
    /// is left untouched. Returns the number of beats found.
    pub fn detect_beats_blocking(
        &mut self,
        provider: &dyn MediaProvider,
        asset: &AssetId,
        options: &DetectorOptions,
    ) -> StateResult<usize> {
        let pcm = provider.samples(asset)?;
        let samples = decode_i16le(&pcm.data);
        let beats = detect(&samples, pcm.sample_rate, options)?;
        let count = beats.len();
        self.timeline.set_beats(beats);
        self.mark_dirty();
        tracing::info!(asset_id = %asset, beats = count, "Beat detection complete");
        Ok(count)
    }

    /// Kick off beat detection on a worker thread.
    ///
    /// The returned task is polled (or waited on) by the caller; feed its
    /// outcome back through [`ProjectState::absorb_detection`]. The
    /// document is not touched until then.
    pub fn start_beat_detection(
        &self,
        provider: &dyn MediaProvider,
        asset: &AssetId,
        options: DetectorOptions,
    ) -> StateResult<DetectionTask> {
        let pcm = provider.samples(asset)?;
        let samples = decode_i16le(&pcm.data);
        Ok(DetectionTask::spawn(samples, pcm.sample_rate, options)?)
    }

    /// Absorb a finished detection: replace the beat grid on success,
    /// keep the previous grid on failure.
    pub fn absorb_detection(
        &mut self,
        outcome: sc_beat::BeatResult<Vec<f64>>,
    ) -> StateResult<usize> {
        match outcome {
            Ok(beats) => {
                let count = beats.len();
                self.timeline.set_beats(beats);
                self.mark_dirty();
                tracing::info!(beats = count, "Beat detection complete");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Beat detection failed; keeping previous grid");
                Err(err.into())
            }
        }
    }

    /// Pull the transport back inside the document after an edit.
    pub fn sync_transport(&mut self) {
        self.transport.clamp_to_extent(self.timeline.duration_secs());
    }

    /// Reset the document to a fresh, empty project.
    pub fn reset(&mut self) {
        tracing::info!(project = %self.project_name, "Resetting document");
        *self = Self::new();
    }

    fn after_edit(&mut self) {
        self.mark_dirty();
        self.sync_transport();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MemoryMediaProvider, RawPcm};
    use sc_beat::encode_i16le;

    fn video_entry(id: &str, duration: f64) -> AssetEntry {
        AssetEntry {
            id: AssetId::new(id),
            name: format!("{id}.mp4"),
            kind: AssetKind::Video,
            duration_secs: duration,
        }
    }

    fn audio_entry(id: &str, duration: f64) -> AssetEntry {
        AssetEntry {
            id: AssetId::new(id),
            name: format!("{id}.wav"),
            kind: AssetKind::Audio,
            duration_secs: duration,
        }
    }

    /// Mono PCM with short loud bursts at the given times.
    fn impulse_pcm(sample_rate: u32, duration_secs: f64, impulse_times: &[f64]) -> RawPcm {
        let total = (duration_secs * sample_rate as f64) as usize;
        let mut samples = vec![0.0_f32; total];
        for &at in impulse_times {
            let start = (at * sample_rate as f64) as usize;
            for n in 0..128 {
                if start + n < total {
                    samples[start + n] = 0.9 * (-(n as f32) / 32.0).exp();
                }
            }
        }
        RawPcm {
            data: encode_i16le(&samples),
            sample_rate,
        }
    }

    #[test]
    fn new_document_defaults() {
        let state = ProjectState::new();
        assert_eq!(state.project_name, "Untitled Project");
        assert!(state.timeline.is_empty());
        assert!(state.assets.is_empty());
        assert!(!state.is_dirty);
    }

    #[test]
    fn import_video_places_linked_pair_and_registers() {
        let mut state = ProjectState::new();
        let placed = state.import_asset(video_entry("m1", 5.0)).unwrap();
        assert_eq!(placed.len(), 2);
        assert_eq!(state.timeline.clip_count(), 2);
        assert_eq!(state.assets.len(), 1);
        assert!(state.is_dirty);

        let video = state.timeline.clip(&placed[0]).unwrap();
        let audio = state.timeline.clip(&placed[1]).unwrap();
        assert_eq!(video.lane, 0);
        assert_eq!(audio.lane, 1);
        assert_eq!(video.group_id, audio.group_id);
        assert!(video.group_id.is_some());
        assert_eq!(video.asset_id, Some(AssetId::new("m1")));
    }

    #[test]
    fn import_audio_places_single_clip() {
        let mut state = ProjectState::new();
        let placed = state.import_asset(audio_entry("a1", 3.0)).unwrap();
        assert_eq!(placed.len(), 1);
        let clip = state.timeline.clip(&placed[0]).unwrap();
        assert_eq!(clip.lane, 1);
        assert!(clip.group_id.is_none());
    }

    #[test]
    fn import_rejects_non_positive_duration() {
        let mut state = ProjectState::new();
        let err = state.import_asset(video_entry("m1", 0.0)).unwrap_err();
        assert!(err.to_string().starts_with("Edit failed:"));
        assert!(state.timeline.is_empty());
        assert!(state.assets.is_empty());
    }

    #[test]
    fn reimport_replaces_registry_entry() {
        let mut state = ProjectState::new();
        state.import_asset(audio_entry("a1", 3.0)).unwrap();
        let mut renamed = audio_entry("a1", 4.0);
        renamed.name = "retake.wav".to_string();
        state.import_asset(renamed).unwrap();

        assert_eq!(state.assets.len(), 1);
        assert_eq!(state.assets[0].name, "retake.wav");
        // Both imports placed clips.
        assert_eq!(state.timeline.clip_count(), 2);
    }

    #[test]
    fn removed_asset_leaves_clips_with_placeholder_name() {
        let mut state = ProjectState::new();
        let placed = state.import_asset(audio_entry("a1", 3.0)).unwrap();
        assert!(state.remove_asset(&AssetId::new("a1")).is_some());
        assert!(state.remove_asset(&AssetId::new("a1")).is_none());

        let clip = state.timeline.clip(&placed[0]).unwrap();
        assert_eq!(clip.asset_id, Some(AssetId::new("a1")));
        assert_eq!(
            state.asset_display_name(clip.asset_id.as_ref()),
            "Unknown Asset"
        );
    }

    #[test]
    fn asset_display_name_resolves_registered_assets() {
        let mut state = ProjectState::new();
        state.import_asset(audio_entry("a1", 3.0)).unwrap();
        let id = AssetId::new("a1");
        assert_eq!(state.asset_display_name(Some(&id)), "a1.wav");
        assert_eq!(state.asset_display_name(None), "Unknown Asset");
    }

    #[test]
    fn split_at_playhead_splits_under_the_cut() {
        let mut state = ProjectState::new();
        state.import_asset(video_entry("m1", 4.0)).unwrap();
        state.transport.seek_secs(1.0);

        let produced = state.split_at_playhead();
        assert_eq!(produced.len(), 2);
        assert_eq!(state.timeline.clip_count(), 4);

        // Playhead outside every clip: nothing happens.
        state.transport.seek_secs(9.0);
        state.sync_transport();
        assert!(state.split_at_playhead().is_empty());
    }

    #[test]
    fn run_command_edits_the_timeline() {
        let mut state = ProjectState::new();
        state.import_asset(audio_entry("a1", 4.0)).unwrap();

        match state.run_command("split at 2s") {
            CommandOutcome::Applied(_) => {}
            other => panic!("expected Applied, got {other:?}"),
        }
        assert_eq!(state.timeline.clip_count(), 2);

        assert!(matches!(
            state.run_command("make it pop"),
            CommandOutcome::NotRecognized
        ));
    }

    #[test]
    fn command_edit_clamps_transport() {
        let mut state = ProjectState::new();
        state.import_asset(audio_entry("a1", 4.0)).unwrap();
        state.transport.seek_secs(4.0);

        match state.run_command("delete clip 1") {
            CommandOutcome::Applied(_) => {}
            other => panic!("expected Applied, got {other:?}"),
        }
        assert!(state.timeline.is_empty());
        assert_eq!(state.transport.playhead_secs(), 0.0);
    }

    #[test]
    fn detect_beats_blocking_fills_the_grid() {
        let mut state = ProjectState::new();
        state.import_asset(audio_entry("a1", 3.0)).unwrap();

        let mut provider = MemoryMediaProvider::new();
        provider.insert(
            AssetId::new("a1"),
            impulse_pcm(10_240, 3.0, &[0.5, 1.5, 2.5]),
        );

        let count = state
            .detect_beats_blocking(&provider, &AssetId::new("a1"), &DetectorOptions::default())
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(state.timeline.beats().len(), 3);
        assert!((state.timeline.beats()[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn failed_detection_keeps_previous_grid() {
        let mut state = ProjectState::new();
        state.timeline.set_beats(vec![1.0, 2.0]);
        state.mark_clean();

        let mut provider = MemoryMediaProvider::new();
        provider.insert(
            AssetId::new("broken"),
            RawPcm {
                data: vec![0, 0],
                sample_rate: 0,
            },
        );

        // Unknown asset.
        assert!(state
            .detect_beats_blocking(&provider, &AssetId::new("nope"), &DetectorOptions::default())
            .is_err());
        // Invalid sample rate.
        assert!(state
            .detect_beats_blocking(
                &provider,
                &AssetId::new("broken"),
                &DetectorOptions::default()
            )
            .is_err());

        assert_eq!(state.timeline.beats(), &[1.0, 2.0]);
        assert!(!state.is_dirty);
    }

    #[test]
    fn background_detection_roundtrip() {
        let mut state = ProjectState::new();
        let mut provider = MemoryMediaProvider::new();
        provider.insert(
            AssetId::new("a1"),
            impulse_pcm(10_240, 3.0, &[0.5, 1.5]),
        );

        let task = state
            .start_beat_detection(&provider, &AssetId::new("a1"), DetectorOptions::default())
            .unwrap();
        assert!(state.timeline.beats().is_empty());

        let outcome = task.wait();
        let count = state.absorb_detection(outcome).unwrap();
        assert_eq!(count, 2);
        assert_eq!(state.timeline.beats().len(), 2);
    }

    #[test]
    fn absorb_detection_failure_is_an_error_and_keeps_grid() {
        let mut state = ProjectState::new();
        state.timeline.set_beats(vec![0.25]);
        let outcome = Err(sc_beat::BeatError::InvalidSampleRate(0));
        assert!(state.absorb_detection(outcome).is_err());
        assert_eq!(state.timeline.beats(), &[0.25]);
    }

    #[test]
    fn reset_restores_a_fresh_document() {
        let mut state = ProjectState::new();
        state.project_name = "Cut One".to_string();
        state.import_asset(video_entry("m1", 5.0)).unwrap();
        state.transport.seek_secs(2.0);

        state.reset();
        assert_eq!(state.project_name, "Untitled Project");
        assert!(state.timeline.is_empty());
        assert!(state.assets.is_empty());
        assert_eq!(state.transport.playhead_secs(), 0.0);
        assert!(!state.is_dirty);
    }

    #[test]
    fn dirty_flag_tracks_edits() {
        let mut state = ProjectState::new();
        assert!(!state.is_dirty);
        state.mark_dirty();
        assert!(state.is_dirty);
        state.mark_clean();
        assert!(!state.is_dirty);
    }
}
