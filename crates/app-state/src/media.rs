//! Media library entries and the provider boundary.
//!
//! The engine never decodes containers itself. Anything that can hand
//! back raw PCM for an asset id implements [`MediaProvider`], and the
//! document only stores lightweight [`AssetEntry`] records describing
//! what was imported.

use std::collections::HashMap;

use sc_common::AssetId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of media an asset carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Picture plus sound; occupies a linked pair of lanes.
    Video,
    /// Sound only; occupies a single audio lane.
    Audio,
}

/// One imported media file as the document remembers it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Stable identifier clips refer back to.
    pub id: AssetId,
    /// Display name shown in the library and clip labels.
    pub name: String,
    /// What the asset contains.
    pub kind: AssetKind,
    /// Source duration in seconds.
    pub duration_secs: f64,
}

/// Raw audio as a provider hands it over: interleaved 16-bit
/// little-endian mono PCM plus the rate it was sampled at.
#[derive(Clone, Debug, Default)]
pub struct RawPcm {
    /// Sample bytes, two per sample, least significant byte first.
    pub data: Vec<u8>,
    /// Samples per second.
    pub sample_rate: u32,
}

/// Errors a media provider can report.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The provider has no samples for this asset.
    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),
}

/// Source of decoded audio for analysis.
pub trait MediaProvider {
    /// Fetch the full PCM stream for an asset.
    fn samples(&self, asset: &AssetId) -> Result<RawPcm, MediaError>;
}

/// Provider backed by an in-memory map.
///
/// Used by tests and offline tooling; a real deployment wraps a decoder
/// behind the same trait.
#[derive(Debug, Default)]
pub struct MemoryMediaProvider {
    buffers: HashMap<AssetId, RawPcm>,
}

impl MemoryMediaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the PCM stream for an asset.
    pub fn insert(&mut self, asset: AssetId, pcm: RawPcm) {
        self.buffers.insert(asset, pcm);
    }
}

impl MediaProvider for MemoryMediaProvider {
    fn samples(&self, asset: &AssetId) -> Result<RawPcm, MediaError> {
        self.buffers
            .get(asset)
            .cloned()
            .ok_or_else(|| MediaError::UnknownAsset(asset.clone()))
    }
}
