//! Unified error handling for the ARK message layer
//!
//! Every fallible operation in this crate surfaces one of these variants
//! synchronously to its caller. There are no retries and no partial-failure
//! recovery here; resilience belongs to the transport layer.

use thiserror::Error;

/// Main error type for ARK message operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArkMsgsError {
    /// Registry lookup by a name that was never registered
    #[error("Unknown message type '{0}'")]
    UnknownType(String),

    /// Registration of a name that is already present in the registry
    #[error("Message type '{0}' is already registered")]
    DuplicateRegistration(String),

    /// Message could not be encoded to wire bytes
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Wire bytes are not a valid encoding of the target type
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Response envelope carries no nested request envelope
    #[error("Envelope has no request envelope attached")]
    MissingRequest,

    /// Latency was requested before both timestamps were populated
    #[error("Envelope {0} timestamp is not set")]
    TimestampNotSet(&'static str),

    /// Malformed pose-algebra input (bad axis sequence, degenerate quaternion, ...)
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Parameterization the pose algebra cannot solve
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type for ARK message operations
pub type ArkMsgsResult<T> = Result<T, ArkMsgsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArkMsgsError::UnknownType("ark.Missing".to_string());
        assert!(err.to_string().contains("ark.Missing"));

        let err = ArkMsgsError::TimestampNotSet("sent");
        assert!(err.to_string().contains("sent"));
    }
}
