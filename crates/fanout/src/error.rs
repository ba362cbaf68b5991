//! Error types for the fan-out crate

use thiserror::Error;

/// Result type for fan-out operations
pub type Result<T> = std::result::Result<T, FanoutError>;

/// Errors that can occur delivering to a consumer
#[derive(Debug, Error)]
pub enum FanoutError {
    /// The consumer's transport is gone
    #[error("sink closed")]
    SinkClosed,

    /// Transport-level delivery failure
    #[error("delivery failed: {0}")]
    Delivery(String),
}
