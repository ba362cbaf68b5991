//! Delivery and reporting configuration

use std::time::Duration;

use serde::Deserialize;

/// Delivery defaults and stats reporting
///
/// # Example
///
/// ```toml
/// [delivery]
/// default_interval = "1s"
/// stats_interval = "30s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Delivery interval used when a consumer does not specify one
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub default_interval: Duration,

    /// How often the relay logs hub/cache/link counters
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub stats_interval: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            default_interval: Duration::from_millis(1000),
            stats_interval: Duration::from_secs(30),
        }
    }
}
