//! The command/event bridge: typed request/response with a bounded timeout,
//! fire-and-forget dispatch, and per-service event fan-out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use easel_common::errors::{BridgeError, EaselError};
use easel_common::{Command, Event};

use crate::transport::Transport;

/// Default deadline for a round-trip command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle returned by `subscribe`; pass back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type EventCallback = Arc<dyn Fn(&Event) -> Result<(), EaselError> + Send + Sync>;

#[derive(Default)]
struct SubscriberTable {
    by_service: HashMap<String, Vec<(SubscriptionId, EventCallback)>>,
    global: Vec<(SubscriptionId, EventCallback)>,
}

/// Controller-side bridge over a [`Transport`].
///
/// `send` suspends the calling task until the reply or the deadline; no OS
/// thread blocks. Events pumped in via [`Bridge::attach_events`] fan out to
/// the subscribers for their service, then to global subscribers; a failing
/// callback is logged and never stops delivery to the rest.
pub struct Bridge {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    subscribers: Mutex<SubscriberTable>,
    next_subscription: AtomicU64,
}

impl Bridge {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_timeout(transport, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            subscribers: Mutex::new(SubscriberTable::default()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Send a command and await its result.
    ///
    /// Resolves with [`BridgeError::Timeout`] (carrying the original command)
    /// at or after the deadline if no reply arrives; there is no
    /// cancel-by-caller.
    pub async fn send(&self, command: Command) -> Result<Value, BridgeError> {
        debug!(%command, "send");
        match tokio::time::timeout(self.timeout, self.transport.request(command.clone())).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(BridgeError::Transport { command, source }),
            Err(_) => Err(BridgeError::Timeout { command }),
        }
    }

    /// Send a command without awaiting any reply.
    pub fn send_fire_and_forget(&self, command: Command) {
        debug!(%command, "send (fire-and-forget)");
        self.transport.post(command);
    }

    /// Register a callback for events from one service.
    pub fn subscribe<F>(&self, service: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), EaselError> + Send + Sync + 'static,
    {
        let id = self.next_id();
        let mut table = self.lock_subscribers();
        table
            .by_service
            .entry(service.into())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Register a callback for every event regardless of service.
    pub fn subscribe_all<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), EaselError> + Send + Sync + 'static,
    {
        let id = self.next_id();
        let mut table = self.lock_subscribers();
        table.global.push((id, Arc::new(callback)));
        id
    }

    /// Remove a previously registered callback. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut table = self.lock_subscribers();
        for callbacks in table.by_service.values_mut() {
            callbacks.retain(|(sub, _)| *sub != id);
        }
        table.global.retain(|(sub, _)| *sub != id);
    }

    /// Fan one event out to its service's subscribers, then the global ones.
    ///
    /// Callbacks run outside the subscriber lock. A callback error is logged
    /// and contained; it never propagates into the dispatch loop.
    pub fn dispatch(&self, event: &Event) {
        let callbacks: Vec<EventCallback> = {
            let table = self.lock_subscribers();
            let service = table
                .by_service
                .get(&event.service)
                .into_iter()
                .flatten()
                .map(|(_, cb)| Arc::clone(cb));
            let global = table.global.iter().map(|(_, cb)| Arc::clone(cb));
            service.chain(global).collect()
        };

        for callback in callbacks {
            if let Err(err) = callback(event) {
                warn!(%event, error = %err, "event subscriber failed");
            }
        }
    }

    /// Spawn a task that drains `events` into [`Bridge::dispatch`]. Wire
    /// arrival order is preserved per service (events arrive on one channel
    /// and dispatch serially).
    pub fn attach_events(
        self: &Arc<Self>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) -> tokio::task::JoinHandle<()> {
        let bridge = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                bridge.dispatch(&event);
            }
        })
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed))
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, SubscriberTable> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }
}
