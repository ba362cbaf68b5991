//! Relay error types

use thiserror::Error;

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors raised while assembling or running the relay
#[derive(Debug, Error)]
pub enum RelayError {
    /// Profile cache or fetcher setup failed
    #[error("cache: {0}")]
    Cache(#[from] firetap_cache::CacheError),

    /// Configuration failed to load or validate
    #[error("config: {0}")]
    Config(#[from] firetap_config::ConfigError),
}
