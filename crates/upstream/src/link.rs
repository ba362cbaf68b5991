//! WebSocket link with fixed-delay reconnect
//!
//! # Connection lifecycle
//!
//! The link is an explicit state machine with the single legal path
//! Disconnected → Connecting → Connected → Disconnected. One run loop
//! drives it, so a second connection attempt can never start while a
//! prior connection still exists. On any close or error the loop waits
//! the fixed reconnect delay and tries again, forever; there is no retry
//! cap and no backoff growth.
//!
//! # Decode failures
//!
//! A frame that fails to decode is counted and dropped. It never tears
//! down the connection and never reaches the dispatcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use futures::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use firetap_protocol::RawEvent;

use crate::error::Result;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Default Jetstream subscribe endpoint.
pub const DEFAULT_ENDPOINT: &str = "wss://jetstream2.us-east.bsky.network/subscribe";

/// Default collection pinned into the subscription.
pub const DEFAULT_COLLECTION: &str = "app.bsky.feed.post";

/// Default wait between connection attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Upstream link configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Jetstream subscribe endpoint.
    pub endpoint: String,

    /// Collection NSID; fixes the subscription scope at connect time.
    pub collection: String,

    /// Fixed wait between connection attempts.
    pub reconnect_delay: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            collection: DEFAULT_COLLECTION.into(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LinkState {
    /// No connection; waiting out the reconnect delay or not yet started.
    Disconnected = 0,
    /// A connection attempt is in flight.
    Connecting = 1,
    /// Reading frames.
    Connected = 2,
}

/// The single upstream subscription shared by all sessions.
pub struct UpstreamLink {
    config: UpstreamConfig,
    state: AtomicU8,
    messages: AtomicU64,
    decode_failures: AtomicU64,
    connects: AtomicU64,
}

impl UpstreamLink {
    /// Create a link; it connects when [`run`](Self::run) is called.
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            config,
            state: AtomicU8::new(LinkState::Disconnected as u8),
            messages: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            connects: AtomicU64::new(0),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> LinkState {
        match self.state.load(Ordering::Acquire) {
            1 => LinkState::Connecting,
            2 => LinkState::Connected,
            _ => LinkState::Disconnected,
        }
    }

    fn set_state(&self, state: LinkState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// The full subscribe URL, collection scope included.
    pub fn subscribe_url(&self) -> String {
        format!(
            "{}?wantedCollections={}",
            self.config.endpoint, self.config.collection
        )
    }

    /// Decode one text frame and hand it to the dispatcher.
    fn handle_frame<F>(&self, raw: &str, dispatch: &F)
    where
        F: Fn(RawEvent),
    {
        match RawEvent::decode(raw) {
            Ok(event) => {
                self.messages.fetch_add(1, Ordering::Relaxed);
                dispatch(event);
            }
            Err(e) => {
                self.decode_failures.fetch_add(1, Ordering::Relaxed);
                debug!(error = %e, "discarding undecodable frame");
            }
        }
    }

    /// One connection attempt against the subscribe URL.
    async fn connect(&self, url: &str) -> Result<WsStream> {
        let (stream, response) = connect_async(url).await?;
        self.connects.fetch_add(1, Ordering::Relaxed);
        info!(status = %response.status(), "firehose connected");
        Ok(stream)
    }

    /// Run the link until `shutdown` fires.
    ///
    /// Connects, reads frames, dispatches decoded events, and reconnects
    /// after the fixed delay on any close or error. Dispatch is invoked
    /// synchronously per decoded event, in arrival order.
    pub async fn run<F>(self: Arc<Self>, dispatch: F, shutdown: Arc<Notify>)
    where
        F: Fn(RawEvent) + Send + Sync + 'static,
    {
        let url = self.subscribe_url();

        loop {
            self.set_state(LinkState::Connecting);
            info!(url = %url, "connecting to firehose");

            let stream = match self.connect(&url).await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(error = %e, "firehose connect failed");
                    self.set_state(LinkState::Disconnected);
                    if wait_or_shutdown(self.config.reconnect_delay, &shutdown).await {
                        return;
                    }
                    continue;
                }
            };
            self.set_state(LinkState::Connected);

            let (_write, mut read) = stream.split();
            loop {
                tokio::select! {
                    frame = read.next() => match frame {
                        Some(Ok(Message::Text(text))) => self.handle_frame(&text, &dispatch),
                        // Binary, ping and pong frames carry no events.
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!(error = %e, "firehose read error");
                            break;
                        }
                        None => {
                            info!("firehose closed by server");
                            break;
                        }
                    },
                    _ = shutdown.notified() => {
                        self.set_state(LinkState::Disconnected);
                        return;
                    }
                }
            }

            self.set_state(LinkState::Disconnected);
            if wait_or_shutdown(self.config.reconnect_delay, &shutdown).await {
                return;
            }
        }
    }

    /// Current counters.
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            messages: self.messages.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            connects: self.connects.load(Ordering::Relaxed),
            state: self.state(),
        }
    }
}

/// Snapshot of link counters.
#[derive(Debug, Clone, Copy)]
pub struct LinkStats {
    /// Frames decoded and dispatched.
    pub messages: u64,
    /// Frames dropped as undecodable.
    pub decode_failures: u64,
    /// Successful connections since startup.
    pub connects: u64,
    /// Current connection state.
    pub state: LinkState,
}

/// Returns true when shutdown fired during the wait.
async fn wait_or_shutdown(delay: Duration, shutdown: &Notify) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = shutdown.notified() => true,
    }
}

#[cfg(test)]
#[path = "link_test.rs"]
mod tests;
