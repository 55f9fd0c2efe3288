//! Timeline edit errors (thiserror-based).

use thiserror::Error;

/// Timeline editing error type.
///
/// The edit API is deliberately tolerant: references to clips that no
/// longer exist are absorbed as no-ops. The one hard failure is a clip
/// interval that cannot exist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Clip intervals are half-open `[start, end)` and must have strictly
    /// positive length. NaN bounds fail the comparison and land here too.
    #[error("Invalid clip interval [{start}, {end}): end must be greater than start")]
    InvalidInterval { start: f64, end: f64 },
}

/// Convenience alias for edit results.
pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EditError::InvalidInterval { start: 5.0, end: 2.0 };
        assert_eq!(
            err.to_string(),
            "Invalid clip interval [5, 2): end must be greater than start"
        );
    }
}
