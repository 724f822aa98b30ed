//! Error types for the Purposely engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Purposely content engine.
///
/// Every public entry point either resolves or fails with one of these
/// variants; the short `reason()` code is what callers (the UI layer)
/// key their retry affordances on.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PurposelyError {
    /// An upstream generation call exceeded its time budget.
    #[error("Generation timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The upstream payload could not be turned into a usable record.
    #[error("Bad response from generator: {0}")]
    BadResponse(String),

    /// The only returned candidate collided with history.
    #[error("Generated content duplicates previously served content")]
    Duplicate,

    /// The operation was cancelled mid-flight.
    #[error("Operation aborted")]
    Aborted,

    /// The persistence layer failed (degraded to empty history by callers).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation collaborator itself rejected the call.
    #[error("Upstream generator error: {0}")]
    Upstream(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PurposelyError {
    /// Creates a BadResponse error
    pub fn bad_response(message: impl Into<String>) -> Self {
        Self::BadResponse(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short machine-readable reason code surfaced to callers.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::BadResponse(_) => "bad_response",
            Self::Duplicate => "duplicate",
            Self::Aborted => "aborted",
            Self::Storage(_) => "storage_unavailable",
            Self::Serialization { .. } => "serialization",
            Self::Config(_) => "config",
            Self::Upstream(_) => "upstream",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the single-retry budget of `generate_one` applies.
    ///
    /// Cancellation is never retried; everything that counts as a normal
    /// generation failure (timeout, unparseable payload, duplicate, an
    /// upstream rejection) is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::BadResponse(_) | Self::Duplicate | Self::Upstream(_)
        )
    }

    /// Check if this is an Aborted error
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this is a Duplicate error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PurposelyError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for PurposelyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PurposelyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (edges only)
impl From<anyhow::Error> for PurposelyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PurposelyError>`.
pub type Result<T> = std::result::Result<T, PurposelyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_match_taxonomy() {
        assert_eq!(PurposelyError::Timeout { elapsed_ms: 12000 }.reason(), "timeout");
        assert_eq!(PurposelyError::bad_response("junk").reason(), "bad_response");
        assert_eq!(PurposelyError::Duplicate.reason(), "duplicate");
        assert_eq!(PurposelyError::Aborted.reason(), "aborted");
        assert_eq!(PurposelyError::storage("io").reason(), "storage_unavailable");
    }

    #[test]
    fn test_aborted_is_not_retryable() {
        assert!(!PurposelyError::Aborted.is_retryable());
        assert!(PurposelyError::Timeout { elapsed_ms: 1 }.is_retryable());
        assert!(PurposelyError::Duplicate.is_retryable());
        assert!(PurposelyError::bad_response("x").is_retryable());
    }
}
