//! Message delivery boundary.

use async_trait::async_trait;

use super::protocol::ServerEvent;

/// Pushes one typed payload to one connection.
///
/// Delivery is fire-and-forget from the engine's point of view: transport
/// failures are the hosting layer's concern (a dropped connection will come
/// back through `mark_disconnected`), so implementations log and absorb their
/// own errors.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, connection_id: &str, event: ServerEvent);
}
