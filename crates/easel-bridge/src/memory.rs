//! In-process transport: commands are handled by a host-side
//! [`CommandHandler`] on the same runtime, events flow back over an mpsc
//! channel. Used by tests and the loopback demo; a remote deployment swaps in
//! a different [`Transport`] without touching the bridge.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

use easel_common::errors::TransportError;
use easel_common::{Command, Event};

use crate::transport::Transport;

/// Host-side command entry point the transport delivers into.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, command: Command) -> Result<Value, TransportError>;
}

pub struct MemoryTransport {
    handler: Arc<dyn CommandHandler>,
}

impl MemoryTransport {
    pub fn new(handler: Arc<dyn CommandHandler>) -> Self {
        Self { handler }
    }

    /// The controller-bound event channel paired with this transport.
    pub fn event_channel() -> (mpsc::UnboundedSender<Event>, mpsc::UnboundedReceiver<Event>) {
        mpsc::unbounded_channel()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn request(&self, command: Command) -> Result<Value, TransportError> {
        self.handler.handle(command).await
    }

    fn post(&self, command: Command) {
        let handler = Arc::clone(&self.handler);
        tokio::spawn(async move {
            if let Err(err) = handler.handle(command).await {
                warn!(error = %err, "fire-and-forget command failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandHandler for CountingHandler {
        async fn handle(&self, command: Command) -> Result<Value, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if command.command == "boom" {
                return Err(TransportError::new("INVALID_PARAMS", "boom"));
            }
            Ok(json!(true))
        }
    }

    #[tokio::test]
    async fn request_reaches_handler() {
        let handler = Arc::new(CountingHandler {
            calls: AtomicUsize::new(0),
        });
        let transport = MemoryTransport::new(handler.clone());
        let value = transport.request(Command::new("host", "ping")).await.unwrap();
        assert_eq!(value, json!(true));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn request_surfaces_handler_error() {
        let transport = MemoryTransport::new(Arc::new(CountingHandler {
            calls: AtomicUsize::new(0),
        }));
        let err = transport
            .request(Command::new("host", "boom"))
            .await
            .unwrap_err();
        assert_eq!(err.code, "INVALID_PARAMS");
    }

    #[tokio::test]
    async fn post_is_fire_and_forget() {
        let handler = Arc::new(CountingHandler {
            calls: AtomicUsize::new(0),
        });
        let transport = MemoryTransport::new(handler.clone());
        transport.post(Command::new("host", "ping"));
        tokio::task::yield_now().await;
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }
}
