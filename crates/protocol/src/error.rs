//! Error types for the protocol crate

use thiserror::Error;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur when decoding wire messages
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Malformed upstream message
    #[error("malformed upstream message: {0}")]
    Decode(#[from] serde_json::Error),
}
