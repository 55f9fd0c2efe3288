//! Error types for document-level operations.

use thiserror::Error;

/// Errors surfaced by [`crate::state::ProjectState`] operations.
///
/// Each subsystem keeps its own error type; this enum aggregates them at
/// the document boundary so callers handle one type.
#[derive(Error, Debug)]
pub enum StateError {
    /// A timeline edit was rejected.
    #[error("Edit failed: {0}")]
    Edit(#[from] sc_timeline::EditError),

    /// Beat analysis failed.
    #[error("Beat detection failed: {0}")]
    Beat(#[from] sc_beat::BeatError),

    /// A media provider could not supply samples.
    #[error("Media lookup failed: {0}")]
    Media(#[from] crate::media::MediaError),

    /// A replication payload could not be encoded or decoded.
    #[error("Replication payload error: {0}")]
    Replication(#[from] serde_json::Error),

    /// An OS-level failure (thread spawn).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for document operations.
pub type StateResult<T> = Result<T, StateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_error_converts_and_displays() {
        let edit = sc_timeline::EditError::InvalidInterval {
            start: 2.0,
            end: 1.0,
        };
        let err: StateError = edit.into();
        let msg = err.to_string();
        assert!(msg.starts_with("Edit failed:"));
        assert!(msg.contains("[2, 1)"));
    }

    #[test]
    fn replication_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: StateError = bad.into();
        assert!(err.to_string().starts_with("Replication payload error:"));
    }
}
