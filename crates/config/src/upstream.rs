//! Firehose subscription configuration

use std::time::Duration;

use serde::Deserialize;

/// Upstream (Jetstream) subscription settings
///
/// # Example
///
/// ```toml
/// [upstream]
/// endpoint = "wss://jetstream2.us-east.bsky.network/subscribe"
/// collection = "app.bsky.feed.post"
/// reconnect_delay = "5s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSourceConfig {
    /// Jetstream subscribe endpoint
    /// Default: the public us-east instance
    pub endpoint: String,

    /// Collection NSID to subscribe to
    /// Default: "app.bsky.feed.post"
    pub collection: String,

    /// Fixed wait between reconnect attempts
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub reconnect_delay: Duration,
}

impl Default for UpstreamSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "wss://jetstream2.us-east.bsky.network/subscribe".into(),
            collection: "app.bsky.feed.post".into(),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}
