//! Error types for the cache crate

use thiserror::Error;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during profile lookups
#[derive(Debug, Error)]
pub enum CacheError {
    /// Fetcher construction failed (e.g. TLS or proxy misconfiguration)
    #[error("failed to initialize fetcher: {0}")]
    Init(String),

    /// Transport-level request failure
    #[error("profile request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The lookup endpoint answered with a non-success status
    #[error("profile lookup for '{did}' returned status {status}")]
    Status { did: String, status: u16 },
}
