//! Entity identifiers for timeline state.
//!
//! Ids are plain strings behind newtypes so clip/asset/group references
//! can never be mixed up at call sites. They serialize as bare strings,
//! which keeps replicated JSON documents readable and lets `ClipId` act
//! as a JSON map key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a clip placed on the timeline.
///
/// Minted by the timeline from a monotonic counter (`"clip_7"`); remote
/// documents carry their own counters, so ids stay unique across a swap.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClipId(pub String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an imported media asset.
///
/// Clips keep their `AssetId` even after the asset is removed from the
/// registry; the dangling reference renders as an unknown asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier linking clips that move together (e.g. the video and audio
/// halves of one imported asset).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
