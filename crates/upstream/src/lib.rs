//! firetap upstream link
//!
//! Owns the single persistent WebSocket subscription to the Jetstream
//! firehose. Decoded events are handed to a dispatch callback (the hub)
//! synchronously, in arrival order. Connection loss triggers an infinite
//! fixed-delay reconnect; malformed frames are counted and dropped
//! without touching the connection.

mod error;
mod link;

pub use error::{Result, UpstreamError};
pub use link::{
    DEFAULT_COLLECTION, DEFAULT_ENDPOINT, DEFAULT_RECONNECT_DELAY, LinkState, LinkStats,
    UpstreamConfig, UpstreamLink,
};
