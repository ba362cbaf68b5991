//! Transport sink seam

use async_trait::async_trait;
use firetap_protocol::DeliverableEvent;

use crate::error::Result;

/// Delivery endpoint for one consumer connection.
///
/// Implemented by the transport layer (a WebSocket writer in production,
/// a collecting mock in tests). The session's delivery timer calls this
/// once per drained event; errors are logged by the session and never
/// reach the hub or the upstream link.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Serialize and deliver one event to the consumer.
    async fn deliver(&self, event: &DeliverableEvent) -> Result<()>;
}
