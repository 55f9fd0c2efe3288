//! `sc-common` — Shared types for the SnapCut editing engine.
//!
//! This crate is the foundation the other engine crates depend on.
//! It defines the core abstractions:
//!
//! - **Time**: `FrameNumber`, `TimeCode`, `Rational` (newtypes for safety)
//! - **Identity**: `ClipId`, `AssetId`, `GroupId` (string newtypes minted by the engine)

pub mod ids;
pub mod types;

// Re-export commonly used items at crate root
pub use ids::{AssetId, ClipId, GroupId};
pub use types::{FrameNumber, Rational, TimeCode};
