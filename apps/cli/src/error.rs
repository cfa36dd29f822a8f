//! # API Error Type
//!
//! The one error type commands return. Every layer's error converts into it.
//!
//! ```text
//! ValidationError ─► CoreError ──────┐
//! StoreError ──────► SessionError ───┼──► ApiError { code, message } ──► stderr, exit 1
//! ConfigError ───────────────────────┘
//! ```
//!
//! Storage details are logged, not shown; the user gets a generic message.

use serde::Serialize;
use snip_core::{CoreError, ValidationError};
use snip_store::{SessionError, StoreError};

use crate::state::ConfigError;

/// Error returned from CLI commands.
///
/// With `--json` it is printed as:
/// ```json
/// { "code": "NOT_FOUND", "message": "Customer not found: +27700000000" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code.
    pub code: ErrorCode,

    /// Human-readable message.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    /// Not logged in, or bad credentials.
    Unauthorized,
    /// Value already taken (phone, email).
    Conflict,
    /// Loyalty rule violated.
    BusinessLogic,
    StorageError,
    ConfigError,
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_logged_in() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Not logged in. Run `snip login` first.")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            ErrorCode::ValidationError | ErrorCode::ConfigError => 2,
            ErrorCode::Unauthorized => 3,
            _ => 1,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { .. } => {
                ApiError::new(ErrorCode::Conflict, err.to_string())
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CustomerNotFound(id) => ApiError::not_found("Customer", &id),
            CoreError::PointsMismatch { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::InvalidLink(_) => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, key } => ApiError::not_found(&entity, &key),
            StoreError::ConnectionFailed(e) => {
                tracing::error!("Storage connection failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage connection failed")
            }
            StoreError::MigrationFailed(e) => {
                tracing::error!("Storage migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage migration failed")
            }
            StoreError::QueryFailed(e) | StoreError::Internal(e) => {
                tracing::error!("Storage operation failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            StoreError::Serialization(e) => {
                tracing::error!("Stored record unreadable: {}", e);
                ApiError::new(ErrorCode::StorageError, "Stored record is unreadable")
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => {
                ApiError::new(ErrorCode::Unauthorized, err.to_string())
            }
            SessionError::NotLoggedIn => ApiError::not_logged_in(),
            SessionError::EmailTaken(_) => ApiError::new(ErrorCode::Conflict, err.to_string()),
            SessionError::Validation(e) => e.into(),
            SessionError::Storage(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err: ApiError = CoreError::CustomerNotFound("c-1".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Customer not found: c-1");

        let err: ApiError = CoreError::Validation(ValidationError::Duplicate {
            field: "phone".into(),
            value: "+27701234567".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err: ApiError = StoreError::QueryFailed("no such table: kv_store".into()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("kv_store"));
    }

    #[test]
    fn test_session_errors() {
        let err: ApiError = SessionError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.exit_code(), 3);

        let err: ApiError = SessionError::EmailTaken("demo@sniprewards.com".into()).into();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(ApiError::not_found("Customer", "42")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Customer not found: 42");
    }
}
