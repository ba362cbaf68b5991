//! firetap fan-out
//!
//! This crate is the heart of the relay: it takes each decoded firehose
//! event and hands it to every connected consumer's session, which
//! filters, optionally enriches, queues, and paces delivery on its own
//! schedule.
//!
//! # Architecture
//!
//! ```text
//! UpstreamLink ──decode──→ Hub::dispatch(event)
//!                              │  (locked snapshot, single pass)
//!                    ┌─────────┼─────────┐
//!                    ▼         ▼         ▼
//!                Session   Session   Session
//!                 filter    filter    filter
//!                 enrich?     │       enrich?
//!                    │        │          │
//!                  queue    queue      queue   (unbounded FIFO)
//!                    │        │          │
//!                  timer    timer      timer   (one event per tick)
//!                    ▼        ▼          ▼
//!                EventSink EventSink EventSink  (transport layer)
//! ```
//!
//! Sessions never block each other: dispatch is synchronous and cheap,
//! enrichment runs on per-event tasks, and each delivery timer is its
//! own task. The per-session queue is the only backpressure mechanism;
//! it grows without bound when a consumer's cadence cannot keep up.

mod error;
mod hub;
mod session;
mod sink;

#[cfg(test)]
mod test_support;

pub use error::{FanoutError, Result};
pub use hub::{Hub, HubStats};
pub use session::{DEFAULT_DELIVERY_INTERVAL, Session, SessionConfig, SessionHandle};
pub use sink::EventSink;
