//! Wire envelopes crossing the controller/native boundary. Both directions
//! use the same shape: a single named call carrying a flat map with `service`,
//! `command`/`event`, an optional `windowId`, and a payload map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::types::Rect;

/// Shared sink every native service emits events through. The host wires it
/// to the controller-bound side of the transport.
pub type EventSink = std::sync::Arc<dyn Fn(Event) + Send + Sync>;

/// A typed request from the controller to a native service. Immutable once
/// constructed; build with [`Command::new`] and the chaining setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub service: String,
    pub command: String,
    #[serde(rename = "windowId", skip_serializing_if = "Option::is_none", default)]
    pub window_id: Option<String>,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Command {
    pub fn new(service: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            command: command.into(),
            window_id: None,
            params: Map::new(),
        }
    }

    pub fn window(mut self, id: impl Into<String>) -> Self {
        self.window_id = Some(id.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.window_id {
            Some(id) => write!(f, "{}.{} [{}]", self.service, self.command, id),
            None => write!(f, "{}.{} [no-id]", self.service, self.command),
        }
    }
}

/// A notification flowing native → controller. Same envelope shape as
/// [`Command`], opposite direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub service: String,
    pub event: String,
    #[serde(rename = "windowId", skip_serializing_if = "Option::is_none", default)]
    pub window_id: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Event {
    pub fn new(service: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            event: event.into(),
            window_id: None,
            data: Map::new(),
        }
    }

    pub fn window(mut self, id: impl Into<String>) -> Self {
        self.window_id = Some(id.into());
        self
    }

    pub fn datum(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.window_id {
            Some(id) => write!(f, "{}.{} [{}]", self.service, self.event, id),
            None => write!(f, "{}.{} [no-id]", self.service, self.event),
        }
    }
}

/// Version report returned by the peer's `host.getProtocolVersion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolReport {
    pub version: i64,
    #[serde(rename = "minDartVersion")]
    pub min_dart_version: i64,
    #[serde(rename = "maxDartVersion")]
    pub max_dart_version: i64,
}

/// One live native window in the hot-restart recovery snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: String,
    pub visible: bool,
    pub focused: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SnapshotEntry {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_wire_shape() {
        let cmd = Command::new("visibility", "show")
            .window("w1")
            .param("animate", true);
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value,
            json!({
                "service": "visibility",
                "command": "show",
                "windowId": "w1",
                "params": { "animate": true }
            })
        );
    }

    #[test]
    fn command_omits_absent_window_id() {
        let cmd = Command::new("host", "ping");
        let value = serde_json::to_value(&cmd).unwrap();
        assert!(value.get("windowId").is_none());
    }

    #[test]
    fn command_deserializes_without_params() {
        let cmd: Command =
            serde_json::from_value(json!({ "service": "host", "command": "ping" })).unwrap();
        assert_eq!(cmd.service, "host");
        assert!(cmd.params.is_empty());
        assert!(cmd.window_id.is_none());
    }

    #[test]
    fn event_wire_shape() {
        let event = Event::new("snap", "snapped")
            .window("follower")
            .datum("targetId", "target");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "service": "snap",
                "event": "snapped",
                "windowId": "follower",
                "data": { "targetId": "target" }
            })
        );
    }

    #[test]
    fn command_display() {
        let cmd = Command::new("frame", "setPosition").window("w1");
        assert_eq!(cmd.to_string(), "frame.setPosition [w1]");
        let cmd = Command::new("host", "ping");
        assert_eq!(cmd.to_string(), "host.ping [no-id]");
    }

    #[test]
    fn protocol_report_wire_names() {
        let report: ProtocolReport = serde_json::from_value(json!({
            "version": 1,
            "minDartVersion": 1,
            "maxDartVersion": 2
        }))
        .unwrap();
        assert_eq!(report.version, 1);
        assert_eq!(report.max_dart_version, 2);
    }

    #[test]
    fn snapshot_entry_roundtrip() {
        let entry = SnapshotEntry {
            id: "w1".into(),
            visible: true,
            focused: false,
            x: 10.0,
            y: 20.0,
            width: 300.0,
            height: 200.0,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "w1");
        assert_eq!(value["focused"], false);
        let back: SnapshotEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.bounds(), Rect::new(10.0, 20.0, 300.0, 200.0));
    }
}
