//! Profile cache configuration

use std::time::Duration;

use serde::Deserialize;

/// Author profile cache settings
///
/// # Example
///
/// ```toml
/// [cache]
/// api_url = "https://public.api.bsky.app"
/// ttl = "24h"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// AppView base URL for profile lookups
    /// Default: the public AppView
    pub api_url: String,

    /// Time-to-live for cached profiles
    /// Default: 24h
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api_url: "https://public.api.bsky.app".into(),
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}
