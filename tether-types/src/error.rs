//! Error kinds surfaced by every network-backed operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for every network-backed operation.
///
/// `map` transforms a success without touching a failure; the closure is
/// never invoked on the failure branch.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the client layer.
///
/// Only recoverable conditions live here. Contract violations (fetching an
/// entity that has no id, reassigning an id) panic instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        violations: Vec<FieldViolation>,
    },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unexpected server response: {message}")]
    Unknown { status: Option<u16>, message: String },
}

/// Field-level detail attached to a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// The closed set of failure categories, for branching without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkFailure,
    NotFound,
    ValidationFailure,
    PermissionDenied,
    Conflict,
    Unknown,
}

impl ApiError {
    /// Creates a validation failure without field detail.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Creates an unclassified failure with no HTTP status.
    pub fn unknown(message: impl Into<String>) -> Self {
        ApiError::Unknown {
            status: None,
            message: message.into(),
        }
    }

    /// Classifies a failing HTTP status code.
    pub fn from_status(status: u16, message: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => ApiError::Validation { message, violations },
            401 | 403 => ApiError::PermissionDenied(message),
            404 => ApiError::NotFound(message),
            409 | 412 => ApiError::Conflict(message),
            _ => ApiError::Unknown {
                status: Some(status),
                message,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::NetworkFailure,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation { .. } => ErrorKind::ValidationFailure,
            ApiError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Returns true if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Unknown { status, .. } => status.is_some_and(|s| s >= 500),
            _ => false,
        }
    }

    /// Field-level detail, empty for every kind but validation.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ApiError::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}
