//! Process-wide fan-out hub
//!
//! The hub owns the live set of sessions and hands every decoded
//! upstream event to each of them in one pass. There is exactly one hub
//! per process ([`Hub::global`]); its registry still supports concurrent
//! registration, teardown, and dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, trace};

use firetap_cache::ProfileCache;
use firetap_protocol::RawEvent;

use crate::session::{Session, SessionConfig, SessionHandle};
use crate::sink::EventSink;

static GLOBAL_HUB: OnceLock<Arc<Hub>> = OnceLock::new();

/// Fan-out point between the upstream link and subscriber sessions.
pub struct Hub {
    sessions: RwLock<Vec<Arc<Session>>>,
    dispatched: AtomicU64,
}

impl Hub {
    /// Create a standalone hub (tests wire their own).
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(Vec::new()),
            dispatched: AtomicU64::new(0),
        })
    }

    /// The process-wide hub, lazily initialized on first use.
    pub fn global() -> &'static Arc<Hub> {
        GLOBAL_HUB.get_or_init(Hub::new)
    }

    /// Downstream registration call: build a session around the
    /// consumer's sink and subscription parameters.
    ///
    /// The returned handle exposes the `start`/`stop` lifecycle hooks;
    /// the session receives events only between the two.
    pub fn subscribe(
        self: &Arc<Self>,
        config: SessionConfig,
        cache: Arc<ProfileCache>,
        sink: Arc<dyn EventSink>,
    ) -> SessionHandle {
        let session = Session::new(config, cache, sink);
        SessionHandle::new(session, Arc::clone(self))
    }

    pub(crate) fn register(&self, session: Arc<Session>) {
        let mut sessions = self.sessions.write();
        sessions.push(session);
        debug!(connections = sessions.len(), "session registered");
    }

    /// Remove a session from the registry. Idempotent: removing an id
    /// that is already gone is a no-op, not an error.
    pub(crate) fn unregister(&self, id: u64) -> bool {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|s| s.id() != id);
        let removed = sessions.len() < before;
        if removed {
            debug!(id, connections = sessions.len(), "session unregistered");
        }
        removed
    }

    /// Deliver one upstream event to every registered session.
    ///
    /// Iterates over a snapshot of the registry, so a register or
    /// unregister racing the pass never tears it, and a session that
    /// rejects or defers the event has no effect on the rest.
    pub fn dispatch(&self, event: RawEvent) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        let snapshot: Vec<Arc<Session>> = self.sessions.read().clone();
        if snapshot.is_empty() {
            return;
        }

        let event = Arc::new(event);
        for session in &snapshot {
            session.intake(&event);
        }
        trace!(sessions = snapshot.len(), "dispatched event");
    }

    /// Number of currently registered sessions. Process-wide connection
    /// count; observability only.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Current counters.
    pub fn stats(&self) -> HubStats {
        HubStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            sessions: self.session_count(),
        }
    }
}

/// Snapshot of hub counters.
#[derive(Debug, Clone, Copy)]
pub struct HubStats {
    /// Events dispatched since startup.
    pub dispatched: u64,
    /// Currently registered sessions.
    pub sessions: usize,
}

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;
