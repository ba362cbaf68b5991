//! Relay assembly
//!
//! Wires the upstream link, the process-wide hub, and the shared
//! profile cache together from one [`Config`]. The relay itself holds
//! no event state; it is the composition root plus a periodic stats
//! reporter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use firetap_cache::{BskyProfileFetcher, ProfileCache};
use firetap_config::Config;
use firetap_fanout::{EventSink, Hub, SessionConfig, SessionHandle};
use firetap_upstream::{UpstreamConfig, UpstreamLink};

use crate::error::Result;

/// The assembled relay: one upstream link, one hub, one profile cache.
pub struct Relay {
    hub: Arc<Hub>,
    cache: Arc<ProfileCache>,
    link: Arc<UpstreamLink>,
    default_interval: Duration,
    stats_interval: Duration,
}

impl Relay {
    /// Assemble a relay from configuration, attached to the
    /// process-wide hub.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Cache`](crate::RelayError::Cache) if the
    /// profile HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = BskyProfileFetcher::new(config.cache.api_url.as_str())?;
        let cache = Arc::new(ProfileCache::new(Arc::new(fetcher), config.cache.ttl));
        let link = Arc::new(UpstreamLink::new(UpstreamConfig {
            endpoint: config.upstream.endpoint.clone(),
            collection: config.upstream.collection.clone(),
            reconnect_delay: config.upstream.reconnect_delay,
        }));
        Ok(Self::assemble(
            Arc::clone(Hub::global()),
            cache,
            link,
            config.delivery.default_interval,
            config.delivery.stats_interval,
        ))
    }

    fn assemble(
        hub: Arc<Hub>,
        cache: Arc<ProfileCache>,
        link: Arc<UpstreamLink>,
        default_interval: Duration,
        stats_interval: Duration,
    ) -> Self {
        Self {
            hub,
            cache,
            link,
            default_interval,
            stats_interval,
        }
    }

    /// Register a consumer and start its delivery timer.
    ///
    /// `filter` is a case-insensitive substring match over post text
    /// (empty matches everything); `interval` falls back to the
    /// configured default when absent; `enrich` attaches cached author
    /// profiles. The session stays live until the handle is stopped or
    /// dropped.
    pub fn subscribe(
        &self,
        filter: impl Into<String>,
        interval: Option<Duration>,
        enrich: bool,
        sink: Arc<dyn EventSink>,
    ) -> SessionHandle {
        let config = SessionConfig {
            filter: filter.into(),
            interval: interval.unwrap_or(self.default_interval),
            enrich,
        };
        let handle = self.hub.subscribe(config, Arc::clone(&self.cache), sink);
        handle.start();
        handle
    }

    /// Drive the upstream link until `shutdown` fires, dispatching every
    /// decoded event through the hub. Also runs the stats reporter.
    pub async fn run(&self, shutdown: Arc<Notify>) {
        self.spawn_stats_reporter(Arc::clone(&shutdown));
        let hub = Arc::clone(&self.hub);
        Arc::clone(&self.link)
            .run(move |event| hub.dispatch(event), shutdown)
            .await;
    }

    /// The fan-out hub this relay dispatches into.
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// The shared author profile cache.
    pub fn cache(&self) -> &Arc<ProfileCache> {
        &self.cache
    }

    /// The upstream link.
    pub fn link(&self) -> &Arc<UpstreamLink> {
        &self.link
    }

    fn spawn_stats_reporter(&self, shutdown: Arc<Notify>) -> JoinHandle<()> {
        let hub = Arc::clone(&self.hub);
        let cache = Arc::clone(&self.cache);
        let link = Arc::clone(&self.link);
        let period = self.stats_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval fires immediately; swallow the first tick.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let h = hub.stats();
                        let c = cache.stats();
                        let l = link.stats();
                        info!(
                            link_state = ?l.state,
                            messages = l.messages,
                            decode_failures = l.decode_failures,
                            sessions = h.sessions,
                            dispatched = h.dispatched,
                            cache_entries = c.entries,
                            cache_hits = c.hits,
                            cache_misses = c.misses,
                            "relay stats"
                        );
                    }
                    _ = shutdown.notified() => break,
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "core_test.rs"]
mod tests;
