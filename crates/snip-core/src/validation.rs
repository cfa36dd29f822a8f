//! # Validation Module
//!
//! Input validation for customer enrolment, visit recording and sign-up.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form / CLI arguments                                         │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: LoyaltyStore / SessionStore (Rust)                           │
//! │  ├── THIS MODULE: field rules                                          │
//! │  └── Invariants: unique phone, points = floor(amount / 10)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_SERVICES_PER_VISIT, MAX_VISIT_AMOUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Optional leading `+`, then digits, spaces or hyphens
/// - At least 7 digits, at most 20 characters
///
/// ```rust
/// use snip_core::validation::validate_phone;
///
/// assert!(validate_phone("+27701234567").is_ok());
/// assert!(validate_phone("").is_err());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    if phone.len() > MAX_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LEN,
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let valid_chars = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();

    if !valid_chars || digits < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: format!(
                "must be an optional '+' followed by at least {} digits",
                MIN_PHONE_DIGITS
            ),
        });
    }

    Ok(())
}

/// Validates a person's or salon's name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only the shape `local@domain.tld` is checked.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Validates a password at sign-up. Demo accounts only.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    Ok(())
}

// =============================================================================
// Visit Validators
// =============================================================================

/// Validates the services rendered in a visit.
///
/// ## Rules
/// - At least one service
/// - No blank service names
/// - At most `MAX_SERVICES_PER_VISIT`
pub fn validate_services(services: &[String]) -> ValidationResult<()> {
    if services.is_empty() {
        return Err(ValidationError::required("services"));
    }

    if services.iter().any(|s| s.trim().is_empty()) {
        return Err(ValidationError::InvalidFormat {
            field: "services".to_string(),
            reason: "service names must not be blank".to_string(),
        });
    }

    if services.len() > MAX_SERVICES_PER_VISIT {
        return Err(ValidationError::OutOfRange {
            field: "services".to_string(),
            min: 1,
            max: MAX_SERVICES_PER_VISIT as i64,
        });
    }

    Ok(())
}

/// Validates a visit amount in cents: `0..=MAX_VISIT_AMOUNT`.
///
/// Zero is allowed (complimentary service).
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() || amount > MAX_VISIT_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 0,
            max: MAX_VISIT_AMOUNT.cents(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
