//! # Error Types
//!
//! Domain-specific error types for snip-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  snip-core errors (this file)                                          │
//! │  ├── CoreError        - Loyalty rule violations, lookup misses         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  snip-store errors (separate crate)                                    │
//! │  ├── StoreError       - Key-value storage failures                     │
//! │  └── SessionError     - Login / register / profile failures            │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Customer cannot be found.
    ///
    /// ## When This Occurs
    /// - `add_visit` references an unknown customer while the store runs with
    ///   `OrphanVisitPolicy::Reject`
    /// - `update_customer` with an id that was never issued
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Caller supplied a points value that disagrees with the accrual rule.
    ///
    /// ## User Workflow
    /// ```text
    /// Record Visit (amount: R 350, points: 40)
    ///      │
    ///      ▼
    /// calculate_points(R 350) = 35
    ///      │
    ///      ▼
    /// PointsMismatch { expected: 35, supplied: 40 }
    /// ```
    #[error("Points mismatch: amount earns {expected} points, {supplied} supplied")]
    PointsMismatch { expected: i64, supplied: i64 },

    /// A check-in link could not be parsed.
    #[error("Invalid check-in link: {0}")]
    InvalidLink(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// The form layer checks the same rules, the store checks them again.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed phone or email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., a phone number already enrolled).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PointsMismatch {
            expected: 35,
            supplied: 40,
        };
        assert_eq!(
            err.to_string(),
            "Points mismatch: amount earns 35 points, 40 supplied"
        );

        let err = CoreError::CustomerNotFound("c-42".to_string());
        assert_eq!(err.to_string(), "Customer not found: c-42");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("phone").to_string(), "phone is required");

        let err = ValidationError::Duplicate {
            field: "phone".to_string(),
            value: "+27701234567".to_string(),
        };
        assert_eq!(err.to_string(), "phone '+27701234567' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("barber").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
