//! Beat detection error types (thiserror-based).

use thiserror::Error;

/// Beat detection error type.
#[derive(Error, Debug)]
pub enum BeatError {
    /// The sample rate must be positive; zero cannot describe a signal.
    #[error("Invalid sample rate: {0} Hz (must be positive)")]
    InvalidSampleRate(u32),

    /// The detection worker exited without delivering a result.
    #[error("Detection worker exited without a result")]
    WorkerExited,

    /// Worker thread could not be spawned.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for beat detection results.
pub type BeatResult<T> = Result<T, BeatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BeatError::InvalidSampleRate(0);
        assert_eq!(err.to_string(), "Invalid sample rate: 0 Hz (must be positive)");
    }

    #[test]
    fn error_io_conversion() {
        let io_err = std::io::Error::other("no threads");
        let err: BeatError = io_err.into();
        assert!(matches!(err, BeatError::Io(_)));
    }
}
