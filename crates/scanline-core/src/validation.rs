//! # Validation Module
//!
//! Value checks applied to setting updates before they reach any state.
//!
//! ## Usage
//! ```rust
//! use scanline_core::validation::validate_continuous_threshold;
//!
//! assert!(validate_continuous_threshold(-1).is_ok());
//! assert!(validate_continuous_threshold(10).is_ok());
//! assert!(validate_continuous_threshold(11).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_CONTINUOUS_THRESHOLD, MIN_CONTINUOUS_THRESHOLD};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates the duplicate threshold of continuous scanning.
///
/// ## Rules
/// - `-1` means duplicates are never filtered
/// - `0..=10` is the number of seconds between duplicate reports
pub fn validate_continuous_threshold(value: i32) -> ValidationResult<()> {
    if !(MIN_CONTINUOUS_THRESHOLD..=MAX_CONTINUOUS_THRESHOLD).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "continuousThreshold".to_string(),
            min: MIN_CONTINUOUS_THRESHOLD as i64,
            max: MAX_CONTINUOUS_THRESHOLD as i64,
            value: value as i64,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bounds() {
        for ok in [-1, 0, 5, 10] {
            assert!(validate_continuous_threshold(ok).is_ok(), "{ok}");
        }
        for bad in [-2, 11, i32::MAX, i32::MIN] {
            assert!(validate_continuous_threshold(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_threshold_error_fields() {
        let err = validate_continuous_threshold(42).unwrap_err();
        match err {
            ValidationError::OutOfRange { min, max, value, .. } => {
                assert_eq!((min, max, value), (-1, 10, 42));
            }
        }
    }
}
