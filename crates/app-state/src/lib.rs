//! `sc-app-state` -- Document state for the SnapCut editing engine.
//!
//! This crate provides:
//!
//! - **`ProjectState`**: Central document holding the timeline, transport, and asset registry.
//! - **`TransportState`**: Frame-quantized playhead with shuttle, in/out range, and tick-driven playback.
//! - **`MediaProvider`**: Boundary trait for fetching raw PCM; decoding lives outside the engine.
//! - **`DocumentSnapshot`**: Whole-document replication payload (JSON bytes, last writer wins).
//! - **`PlaybackDriver`**: Timer thread ticking a shared document's transport.
//!
//! # Architecture
//!
//! ```text
//! ProjectState (central document)
//! ├── timeline: Timeline             (clips, tracks, beat grid)
//! ├── transport: TransportState      (playhead, rate, in/out)
//! ├── assets: Vec<AssetEntry>        (what was imported)
//! └── project metadata               (name, dirty flag)
//!
//! PlaybackDriver ── ticks ──> transport     (one thread per session)
//! MediaProvider  ── PCM ────> beat detection
//! DocumentSnapshot <─ bytes ─> peers        (wholesale swap)
//! ```

pub mod driver;
pub mod error;
pub mod media;
pub mod snapshot;
pub mod state;
pub mod transport;

// Re-export primary types at crate root for convenience.
pub use driver::PlaybackDriver;
pub use error::{StateError, StateResult};
pub use media::{AssetEntry, AssetKind, MediaError, MediaProvider, MemoryMediaProvider, RawPcm};
pub use snapshot::DocumentSnapshot;
pub use state::ProjectState;
pub use transport::{ShuttleDirection, TransportState, MAX_SHUTTLE_RATE};
