//! Error types for the form filler.

use thiserror::Error;

/// A shared error type for the form filler core.
///
/// Persistence and URL operations are best-effort side channels: their public
/// entry points log and swallow these errors. The fallible `try_*` variants
/// return them so callers and tests can inspect what went wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormFillError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// The local key-value store is blocked or absent (non-browser context,
    /// disabled storage)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A write would exceed the storage quota
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", "timestamp", etc.
        message: String,
    },

    /// Address (URL) could not be parsed or rewritten
    #[error("Address error: {0}")]
    Address(String),

    /// The backend could not provide the requested PDF bytes
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FormFillError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a StorageUnavailable error
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Creates a Serialization error for the given format
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates an Address error
    pub fn address(message: impl Into<String>) -> Self {
        Self::Address(message.into())
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a quota error
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if the storage backend refused access entirely
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for FormFillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for FormFillError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for FormFillError {
    fn from(err: chrono::ParseError) -> Self {
        Self::Serialization {
            format: "timestamp".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (for collaborator adapters that report with anyhow)
impl From<anyhow::Error> for FormFillError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, FormFillError>`.
pub type Result<T> = std::result::Result<T, FormFillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: FormFillError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        match err {
            FormFillError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_json_error_is_serialization() {
        let err: FormFillError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }

    #[test]
    fn test_quota_message() {
        let err = FormFillError::QuotaExceeded {
            needed: 12,
            quota: 10,
        };
        assert!(err.is_quota_exceeded());
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded: 12 bytes needed, 10 bytes allowed"
        );
    }
}
