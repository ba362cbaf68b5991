//! Subscriber sessions
//!
//! One [`Session`] per connected consumer. The intake path (driven by
//! the hub) filters and queues; the delivery path (a per-session timer
//! task) drains one event per tick into the consumer's sink. The two
//! paths share only the queue and the liveness flag.
//!
//! # Ordering
//!
//! Events reach every session in upstream arrival order. Within one
//! session with enrichment enabled, each event's profile lookup runs on
//! its own task, so two events may enqueue in resolution order rather
//! than arrival order. This relaxation is deliberate; delivery is strict
//! FIFO over whatever order the queue received.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, trace, warn};

use firetap_cache::ProfileCache;
use firetap_protocol::{DeliverableEvent, RawEvent};

use crate::hub::Hub;
use crate::sink::EventSink;

/// Default delivery cadence when the consumer does not specify one.
pub const DEFAULT_DELIVERY_INTERVAL: Duration = Duration::from_millis(1000);

static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Subscription parameters, passed through by the transport layer from
/// the connection upgrade.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Case-insensitive substring filter; empty matches everything.
    pub filter: String,

    /// Delivery interval; one event is drained per tick.
    pub interval: Duration,

    /// Attach author profiles from the cache.
    pub enrich: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filter: String::new(),
            interval: DEFAULT_DELIVERY_INTERVAL,
            enrich: false,
        }
    }
}

/// Server-side state for one connected consumer.
pub struct Session {
    id: u64,
    /// Lowercased filter term; empty matches all.
    filter: String,
    enrich: bool,
    interval: Duration,
    queue: Mutex<VecDeque<DeliverableEvent>>,
    live: AtomicBool,
    stop_signal: Notify,
    cache: Arc<ProfileCache>,
    sink: Arc<dyn EventSink>,
    enqueued: AtomicU64,
    delivered: AtomicU64,
}

impl Session {
    pub(crate) fn new(
        config: SessionConfig,
        cache: Arc<ProfileCache>,
        sink: Arc<dyn EventSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            filter: config.filter.to_lowercase(),
            enrich: config.enrich,
            interval: config.interval,
            queue: Mutex::new(VecDeque::new()),
            live: AtomicBool::new(true),
            stop_signal: Notify::new(),
            cache,
            sink,
            enqueued: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
        })
    }

    /// Unique session id.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True until teardown begins.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Current queue depth.
    pub fn queue_len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Total events queued and delivered so far.
    pub fn counters(&self) -> (u64, u64) {
        (
            self.enqueued.load(Ordering::Relaxed),
            self.delivered.load(Ordering::Relaxed),
        )
    }

    /// Hub intake: filter, project, optionally enrich, enqueue.
    ///
    /// Enrichment runs on its own task so one session's pending lookup
    /// never stalls dispatch to other sessions.
    pub(crate) fn intake(self: &Arc<Self>, event: &Arc<RawEvent>) {
        if !self.is_live() {
            return;
        }
        let Some(text) = event.text() else {
            return;
        };
        if !self.filter.is_empty() && !text.to_lowercase().contains(self.filter.as_str()) {
            return;
        }

        // Queue depth is sampled before this event is appended; clients
        // rely on the stale snapshot.
        let depth = self.queue.lock().len();
        let Some(deliverable) = DeliverableEvent::from_raw(event, depth) else {
            return;
        };

        if self.enrich {
            let session = Arc::clone(self);
            let did = event.did.clone();
            tokio::spawn(async move {
                let author = session.cache.get(&did).await;
                // The consumer may have disconnected while the lookup was
                // in flight; a dead session must not accept the result.
                if !session.is_live() {
                    trace!(session = session.id, "discarding enrichment after teardown");
                    return;
                }
                let deliverable = match author {
                    Some(profile) => deliverable.with_author((*profile).clone()),
                    // Miss or failure: deliver without the author block.
                    None => deliverable,
                };
                session.push(deliverable);
            });
        } else {
            self.push(deliverable);
        }
    }

    fn push(&self, event: DeliverableEvent) {
        if !self.is_live() {
            return;
        }
        // Unbounded by design: a slow consumer grows its own queue.
        self.queue.lock().push_back(event);
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Delivery loop: at most one event per tick, strict FIFO, an empty
    /// tick is a no-op.
    fn run_delivery(self: Arc<Self>) -> impl std::future::Future<Output = ()> {
        // The ticker is created eagerly so the delivery epoch is the
        // moment the loop is started, not the task's first poll.
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        async move {
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !self.is_live() {
                            break;
                        }
                        let next = self.queue.lock().pop_front();
                        let Some(event) = next else {
                            continue;
                        };
                        match self.sink.deliver(&event).await {
                            Ok(()) => {
                                self.delivered.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(e) => {
                                warn!(session = self.id, error = %e, "delivery failed");
                            }
                        }
                    }
                    _ = self.stop_signal.notified() => break,
                }
            }
            debug!(session = self.id, "delivery loop stopped");
        }
    }

    /// Begin teardown: no intake or delivery happens after this returns.
    /// Queued items are discarded; there is no flush on close.
    pub(crate) fn shutdown(&self) {
        if self.live.swap(false, Ordering::AcqRel) {
            self.stop_signal.notify_waiters();
            self.queue.lock().clear();
        }
    }
}

/// Handle owned by the transport layer for one consumer connection.
///
/// `start` registers the session with the hub and starts its delivery
/// timer; `stop` tears everything down. Both are idempotent, and `stop`
/// also runs on drop so an abandoned handle never leaks a session.
pub struct SessionHandle {
    session: Arc<Session>,
    hub: Arc<Hub>,
    started: AtomicBool,
    delivery: Mutex<Option<JoinHandle<()>>>,
}

impl SessionHandle {
    pub(crate) fn new(session: Arc<Session>, hub: Arc<Hub>) -> Self {
        Self {
            session,
            hub,
            started: AtomicBool::new(false),
            delivery: Mutex::new(None),
        }
    }

    /// Register with the hub and start the delivery timer.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }
        self.hub.register(Arc::clone(&self.session));
        let task = tokio::spawn(Arc::clone(&self.session).run_delivery());
        *self.delivery.lock() = Some(task);
        debug!(session = self.session.id(), "session started");
    }

    /// Tear down: mark the session dead, unregister it, stop the timer,
    /// discard queued events.
    pub fn stop(&self) {
        if !self.session.is_live() {
            return;
        }
        self.session.shutdown();
        self.hub.unregister(self.session.id());
        self.delivery.lock().take();
        debug!(session = self.session.id(), "session stopped");
    }

    /// The underlying session.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
