use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Callers match on these,
// never on the human-readable message string.

/// Stable error code constants.
///
/// The CLI prints `error [CODE]: message`. Codes never change; messages may
/// be reworded.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const CAPACITY_EXCEEDED: &str = "CAPACITY_EXCEEDED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type shared by every module and the CLI.
///
/// Each variant maps to a stable error code (see [`error_code`]). `Display`
/// is just the message so callers can prefix it however they like.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Input data is missing, malformed or out of range.
    #[error("{0}")]
    Validation(String),

    /// Status change attempted from a state that does not allow it.
    #[error("{0}")]
    InvalidTransition(String),

    /// A write would consume more than is left.
    #[error("{0}")]
    CapacityExceeded(String),

    /// No session established.
    #[error("{0}")]
    Unauthorized(String),

    /// Session role does not allow the operation.
    #[error("{0}")]
    PermissionDenied(String),

    /// Storage backend failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::InvalidTransition(_) => error_code::INVALID_TRANSITION,
            ServiceError::CapacityExceeded(_) => error_code::CAPACITY_EXCEEDED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::PermissionDenied(_) => error_code::PERMISSION_DENIED,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// JSON body `{"code": ..., "message": ...}` for machine-readable output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        })
    }
}
