//! Error types for the c4life engine.

use c4life_data::RuleFormatError;
use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed rule serialization
    #[error("Rule format error: {0}")]
    RuleFormat(#[from] RuleFormatError),

    /// A grid of the wrong size was handed to a fixed-size component
    #[error(
        "Dimension mismatch: expected {expected_width}x{expected_height}, found {found_width}x{found_height}"
    )]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        found_width: usize,
        found_height: usize,
    },

    /// Cell buffer length does not match rows × cols
    #[error("Buffer length mismatch: expected {expected} cells, found {found}")]
    BufferLength { expected: usize, found: usize },

    /// Orbit size outside {1, 2, 4}
    #[error("Invalid orbit size {0}: C4 orbits have 1, 2 or 4 members")]
    InvalidOrbitSize(usize),

    /// Orbit table that does not partition the 512 patterns
    #[error("Invalid orbit table: {0}")]
    InvalidOrbitTable(String),

    /// Neighbourhood function that disagrees within an orbit
    #[error("Function is not rotation-invariant on orbit {orbit}")]
    NotRotationInvariant { orbit: usize },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    #[must_use]
    pub fn dimension_mismatch(expected: (usize, usize), found: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            found_width: found.0,
            found_height: found.1,
        }
    }

    #[must_use]
    pub fn invalid_orbit_table<S: Into<String>>(msg: S) -> Self {
        Self::InvalidOrbitTable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::dimension_mismatch((32, 32), (16, 8));
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 32x32, found 16x8"
        );
    }

    #[test]
    fn test_from_rule_format_error() {
        let err: CoreError = RuleFormatError::Length {
            expected: 35,
            found: 2,
        }
        .into();
        assert!(matches!(err, CoreError::RuleFormat(_)));
        assert!(err.to_string().contains("35"));
    }
}
