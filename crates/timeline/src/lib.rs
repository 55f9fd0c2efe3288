//! `sc-timeline` — Interval model and edit engine for the SnapCut editing engine.
//!
//! The timeline is the authoritative document: clips keyed by id, tracks
//! synthesized from lane indices (even lanes video, odd lanes audio), and
//! the beat grid detection produces. All mutation funnels through
//! [`Timeline`]'s synchronous methods; stale references are tolerated as
//! no-ops and derived state is consistent again before every return.
//!
//! - **Model**: `Clip`, `Track`, `TrackKind`, `ClipPatch`
//! - **Engine**: `Timeline` (add/update/remove, ripple, split, insert, align)
//! - **Snapping**: `find_snap`, `snap_references`
//! - **Gestures**: `DragGesture` (transient previews, one commit)
//! - **Commands**: `parse_command`, `apply_command` (text control surface)
//! - **Errors**: `EditError` (thiserror-based)

pub mod command;
pub mod error;
pub mod gesture;
pub mod snap;
pub mod timeline;
pub mod types;

// Re-export commonly used items at crate root
pub use command::{apply_command, parse_command, Command, CommandOutcome};
pub use error::{EditError, EditResult};
pub use gesture::{DragGesture, GestureMode, GesturePreview};
pub use snap::{find_snap, snap_references, DEFAULT_SNAP_THRESHOLD};
pub use timeline::Timeline;
pub use types::{Clip, ClipPatch, Track, TrackKind};
