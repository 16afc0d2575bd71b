//! Envelope decoding and service dispatch: the host side of the bridge.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use easel_bridge::CommandHandler;
use easel_common::capabilities::Capabilities;
use easel_common::errors::{ServiceError, TransportError};
use easel_common::{Command, EventSink};
use easel_registry::WindowManager;
use easel_snap::SnapCoordinator;

use crate::services::{
    FrameService, HostService, MessageService, SnapService, VisibilityService, WindowService,
};

/// Routes every incoming command envelope to its service.
pub struct ServiceRouter {
    host: HostService,
    window: WindowService,
    visibility: VisibilityService,
    frame: FrameService,
    snap: SnapService,
    message: MessageService,
}

impl ServiceRouter {
    pub fn new(
        manager: Arc<WindowManager>,
        coordinator: Arc<SnapCoordinator>,
        capabilities: Capabilities,
        events: EventSink,
    ) -> Self {
        Self {
            host: HostService::new(Arc::clone(&manager), capabilities),
            window: WindowService::new(Arc::clone(&manager), Arc::clone(&coordinator)),
            visibility: VisibilityService::new(Arc::clone(&manager)),
            frame: FrameService::new(manager, Arc::clone(&coordinator)),
            snap: SnapService::new(coordinator),
            message: MessageService::new(events),
        }
    }

    pub fn handle_command(&self, command: &Command) -> Result<Value, ServiceError> {
        debug!(%command, "dispatch");
        let name = command.command.as_str();
        let window_id = command.window_id.as_deref();
        let params = &command.params;
        match command.service.as_str() {
            "host" => self.host.handle(name, window_id, params),
            "window" => self.window.handle(name, window_id, params),
            "visibility" => self.visibility.handle(name, window_id, params),
            "frame" => self.frame.handle(name, window_id, params),
            "snap" => self.snap.handle(name, window_id, params),
            "message" => self.message.handle(name, window_id, params),
            other => Err(ServiceError::UnknownService(other.to_string())),
        }
    }
}

#[async_trait]
impl CommandHandler for ServiceRouter {
    async fn handle(&self, command: Command) -> Result<Value, TransportError> {
        self.handle_command(&command)
            .map_err(|err| TransportError::new(err.code(), err.to_string()))
    }
}
