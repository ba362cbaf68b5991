//! Error types for the upstream crate

use thiserror::Error;

/// Result type for upstream operations
pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Errors that can occur on the firehose link
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// WebSocket-level failure (connect, read, protocol)
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
