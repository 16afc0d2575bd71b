//! The `window` service: create, destroy, existence checks.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use easel_common::errors::ServiceError;
use easel_registry::{WindowConfig, WindowManager};
use easel_snap::{AutoSnapConfig, SnapCoordinator};

pub struct WindowService {
    manager: Arc<WindowManager>,
    coordinator: Arc<SnapCoordinator>,
}

impl WindowService {
    pub fn new(manager: Arc<WindowManager>, coordinator: Arc<SnapCoordinator>) -> Self {
        Self {
            manager,
            coordinator,
        }
    }

    pub fn handle(
        &self,
        command: &str,
        window_id: Option<&str>,
        params: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        match command {
            "create" => {
                let id = window_id.ok_or(ServiceError::MissingWindowId)?;
                let config: WindowConfig = match params.get("config") {
                    Some(value) => serde_json::from_value(value.clone())
                        .map_err(|err| ServiceError::InvalidParams(err.to_string()))?,
                    None => WindowConfig::default(),
                };
                self.manager.create(id, config)?;

                // The configuration layer may attach auto-snap rules at
                // creation time.
                if let Some(value) = params.get("autoSnap") {
                    let auto: AutoSnapConfig = serde_json::from_value(value.clone())
                        .map_err(|err| ServiceError::InvalidParams(err.to_string()))?;
                    self.coordinator.set_auto_snap_config(id, auto);
                }
                Ok(Value::Null)
            }
            "destroy" => {
                let id = window_id.ok_or(ServiceError::MissingWindowId)?;
                self.manager.destroy(id)?;
                Ok(Value::Null)
            }
            "exists" => {
                let exists = window_id.map(|id| self.manager.exists(id)).unwrap_or(false);
                Ok(json!(exists))
            }
            other => Err(ServiceError::UnknownCommand {
                service: "window".into(),
                command: other.into(),
            }),
        }
    }
}
