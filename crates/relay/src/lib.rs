//! firetap - a Bluesky firehose relay
//!
//! One upstream Jetstream subscription, fanned out to any number of
//! consumers, each with its own substring filter, optional author
//! enrichment, and paced delivery.
//!
//! # Architecture
//!
//! ```text
//! Jetstream ──ws──→ UpstreamLink ──→ Hub ──→ Session ──→ EventSink
//!                   (reconnects)           (per consumer)
//!                                               │
//!                                          ProfileCache ──→ AppView
//!                                          (single-flight, TTL)
//! ```
//!
//! The [`Relay`] assembles these pieces from a [`Config`] and is the
//! embedding surface: call [`Relay::subscribe`] with an [`EventSink`]
//! implementation per consumer, and [`Relay::run`] to drive the
//! upstream link.
//!
//! [`Config`]: firetap_config::Config

mod core;
mod error;

pub use core::Relay;
pub use error::{RelayError, Result};

pub use firetap_config::Config;
pub use firetap_fanout::{EventSink, SessionHandle};
pub use firetap_protocol::DeliverableEvent;
