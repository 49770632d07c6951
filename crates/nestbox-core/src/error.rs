//! Error types and result handling for webhook capture operations.
//!
//! Defines the error taxonomy shared by the store, the domain service, and
//! the HTTP layer: missing webhooks, storage failures, and stored items that
//! no longer match the shape a caller requested. Storage failures propagate
//! unchanged; the core performs no internal retries.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for webhook capture operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No webhook descriptor exists for the given id.
    #[error("webhook not found: {0}")]
    WebhookNotFound(String),

    /// Underlying storage call failed.
    #[error("store error: {0}")]
    Store(String),

    /// A stored item could not be decoded into the requested shape.
    ///
    /// Surfaced explicitly rather than substituting defaults so that data
    /// corruption is never silently masked.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Caller supplied a malformed identifier or key.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl CoreError {
    /// Creates a store error with the given context.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = CoreError::WebhookNotFound("abc-123".to_string());
        assert_eq!(err.to_string(), "webhook not found: abc-123");

        let err = CoreError::store("PutItem failed: timeout");
        assert_eq!(err.to_string(), "store error: PutItem failed: timeout");
    }

    #[test]
    fn serde_errors_map_to_deserialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = CoreError::from(parse_err);
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}
