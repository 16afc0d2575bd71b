//! The `host` service: protocol/version reporting, capability discovery,
//! recovery snapshots, liveness.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use easel_common::capabilities::Capabilities;
use easel_common::errors::ServiceError;
use easel_common::params::get_str;
use easel_registry::WindowManager;

/// Protocol version this host implements.
const PROTOCOL_VERSION: i64 = 1;
const MIN_DART_VERSION: i64 = 1;
const MAX_DART_VERSION: i64 = 1;

pub struct HostService {
    manager: Arc<WindowManager>,
    capabilities: Capabilities,
}

impl HostService {
    pub fn new(manager: Arc<WindowManager>, capabilities: Capabilities) -> Self {
        Self {
            manager,
            capabilities,
        }
    }

    pub fn handle(
        &self,
        command: &str,
        _window_id: Option<&str>,
        params: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        match command {
            "getProtocolVersion" => Ok(json!({
                "version": PROTOCOL_VERSION,
                "minDartVersion": MIN_DART_VERSION,
                "maxDartVersion": MAX_DART_VERSION,
            })),
            "getCapabilities" => {
                serde_json::to_value(&self.capabilities).map_err(|err| {
                    ServiceError::InvalidParams(format!("capability encoding: {err}"))
                })
            }
            "getServiceVersion" => {
                let service = get_str(params, "service")
                    .ok_or_else(|| ServiceError::InvalidParams("missing 'service'".into()))?;
                Ok(json!({ "service": service, "version": 1 }))
            }
            "getSnapshot" => {
                let snapshot = self
                    .manager
                    .platform()
                    .snapshot()
                    .map_err(ServiceError::from)?;
                serde_json::to_value(snapshot).map_err(|err| {
                    ServiceError::InvalidParams(format!("snapshot encoding: {err}"))
                })
            }
            "ping" => Ok(json!(true)),
            other => Err(ServiceError::UnknownCommand {
                service: "host".into(),
                command: other.into(),
            }),
        }
    }
}
