//! firetap configuration
//!
//! TOML-based configuration loading with sensible defaults. A minimal
//! config should just work - only specify what you need to change.
//!
//! # Example Minimal Config
//!
//! ```toml
//! [upstream]
//! collection = "app.bsky.feed.post"
//! ```
//!
//! # Example Full Config
//!
//! See `configs/example.toml` for all available options.

mod cache;
mod delivery;
mod error;
mod logging;
mod upstream;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use cache::CacheConfig;
pub use delivery::DeliveryConfig;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use upstream::UpstreamSourceConfig;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Firehose subscription settings
    pub upstream: UpstreamSourceConfig,

    /// Author profile cache settings
    pub cache: CacheConfig,

    /// Delivery defaults and stats reporting
    pub delivery: DeliveryConfig,

    /// Internal logging
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        raw.parse()
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if !self.upstream.endpoint.starts_with("ws://") && !self.upstream.endpoint.starts_with("wss://")
        {
            return Err(ConfigError::invalid_value(
                "upstream",
                "endpoint",
                "must be a ws:// or wss:// URL",
            ));
        }
        if self.upstream.collection.is_empty() {
            return Err(ConfigError::invalid_value(
                "upstream",
                "collection",
                "must not be empty",
            ));
        }
        if self.upstream.reconnect_delay.is_zero() {
            return Err(ConfigError::invalid_value(
                "upstream",
                "reconnect_delay",
                "must be positive",
            ));
        }
        if !self.cache.api_url.starts_with("http://") && !self.cache.api_url.starts_with("https://")
        {
            return Err(ConfigError::invalid_value(
                "cache",
                "api_url",
                "must be an http:// or https:// URL",
            ));
        }
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::invalid_value("cache", "ttl", "must be positive"));
        }
        if self.delivery.default_interval.is_zero() {
            return Err(ConfigError::invalid_value(
                "delivery",
                "default_interval",
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
