use async_trait::async_trait;
use serde_json::Value;

use easel_common::errors::TransportError;
use easel_common::Command;

/// The seam between the bridge and whatever actually carries envelopes across
/// the process/runtime boundary.
///
/// Implementations must normalize every underlying failure into
/// [`TransportError`] — transport-specific error types never reach callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a command and await the peer's reply.
    async fn request(&self, command: Command) -> Result<Value, TransportError>;

    /// Deliver a command without awaiting a reply. Delivery failures are the
    /// transport's to log; the caller has already moved on.
    fn post(&self, command: Command);
}
