//! # Error Types
//!
//! Structured error types for cap_core. Each variant maps to one of the
//! failure kinds the workflow distinguishes, so the UI can decide what to
//! clear and what to show without parsing strings.
//!
//! ## Example
//!
//! ```rust
//! use cap_core::errors::{CapError, CapResult};
//!
//! fn validate_spacing(s_x: f64) -> CapResult<()> {
//!     if s_x <= 0.0 {
//!         return Err(CapError::validation("s_x", s_x.to_string(), "Spacing must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_spacing(3.75).is_ok());
//! assert_eq!(validate_spacing(0.0).unwrap_err().error_code(), "VALIDATION");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cap_core operations
pub type CapResult<T> = Result<T, CapError>;

/// Message shown for any transport-level failure.
pub const SERVICE_UNREACHABLE: &str = "Calculation service unreachable. Is the backend running?";

/// Structured error type for client operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CapError {
    /// Malformed user input; blocks the request entirely
    #[error("Invalid input for '{field}': {value} - {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    /// The service answered but returned nothing usable
    #[error("Empty result: {what}")]
    EmptyResult { what: String },

    /// Network failure or unreachable service
    #[error("Transport error: {reason}")]
    Transport { reason: String },

    /// An action was attempted before the stage it depends on
    #[error("Cannot {action}: {reason}")]
    Precondition { action: String, reason: String },

    /// The service reported an error in its response body
    #[error("Service error: {message}")]
    Service { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Session file is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CapError {
    /// Create a Validation error
    pub fn validation(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CapError::Validation {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an EmptyResult error
    pub fn empty_result(what: impl Into<String>) -> Self {
        CapError::EmptyResult { what: what.into() }
    }

    /// Create a Transport error
    pub fn transport(reason: impl Into<String>) -> Self {
        CapError::Transport { reason: reason.into() }
    }

    /// Create a Precondition error
    pub fn precondition(action: impl Into<String>, reason: impl Into<String>) -> Self {
        CapError::Precondition {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create a Service error
    pub fn service(message: impl Into<String>) -> Self {
        CapError::Service { message: message.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CapError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CapError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if retrying the same action may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CapError::Transport { .. } | CapError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CapError::Validation { .. } => "VALIDATION",
            CapError::EmptyResult { .. } => "EMPTY_RESULT",
            CapError::Transport { .. } => "TRANSPORT",
            CapError::Precondition { .. } => "PRECONDITION",
            CapError::Service { .. } => "SERVICE",
            CapError::Serialization { .. } => "SERIALIZATION_ERROR",
            CapError::FileError { .. } => "FILE_ERROR",
            CapError::FileLocked { .. } => "FILE_LOCKED",
            CapError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CapError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Text surfaced to the user in the single error line.
    ///
    /// Transport failures collapse to a generic message; everything else
    /// carries its own detail.
    pub fn user_message(&self) -> String {
        match self {
            CapError::Transport { .. } => SERVICE_UNREACHABLE.to_string(),
            CapError::Validation { reason, .. } => reason.clone(),
            CapError::EmptyResult { what } => what.clone(),
            CapError::Precondition { reason, .. } => reason.clone(),
            CapError::Service { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for CapError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CapError::Serialization {
                reason: err.to_string(),
            }
        } else {
            CapError::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CapError {
    fn from(err: serde_json::Error) -> Self {
        CapError::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CapError::validation("s_x", "-1", "Spacing must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Validation\""));
        let roundtrip: CapError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CapError::empty_result("x").error_code(), "EMPTY_RESULT");
        assert_eq!(CapError::precondition("a", "b").error_code(), "PRECONDITION");
        assert_eq!(CapError::transport("down").error_code(), "TRANSPORT");
    }

    #[test]
    fn test_transport_message_is_generic() {
        let err = CapError::transport("tcp connect error: Connection refused (os error 111)");
        assert_eq!(err.user_message(), SERVICE_UNREACHABLE);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_precondition_message_is_reason() {
        let err = CapError::precondition("calculate pile forces", "Please generate pile coordinates first.");
        assert_eq!(err.user_message(), "Please generate pile coordinates first.");
        assert!(!err.is_recoverable());
    }
}
