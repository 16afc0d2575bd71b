//! The `snap` service: explicit snap/detach commands and auto-snap config.
//!
//! All commands read ids from params; the envelope window id is ignored
//! here, matching the controller-side snap client API.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use easel_common::errors::ServiceError;
use easel_common::params::{get_f64_or, get_map, get_str, get_str_or};
use easel_common::{Alignment, Edge};
use easel_snap::{
    AutoSnapConfig, BindingMode, OnTargetDestroyed, OnTargetHidden, SnapBinding, SnapCoordinator,
};

pub struct SnapService {
    coordinator: Arc<SnapCoordinator>,
}

impl SnapService {
    pub fn new(coordinator: Arc<SnapCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn handle(
        &self,
        command: &str,
        _window_id: Option<&str>,
        params: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        match command {
            "snap" => self.snap(params),
            "detach" => {
                let follower = require(params, "followerId")?;
                self.coordinator.detach(follower);
                Ok(Value::Null)
            }
            "reSnap" => {
                let follower = require(params, "followerId")?;
                self.coordinator.re_snap(follower)?;
                Ok(Value::Null)
            }
            "getSnapDistance" => {
                let distance = get_str(params, "followerId")
                    .map(|follower| self.coordinator.snap_distance(follower))
                    .unwrap_or(0.0);
                Ok(json!(distance))
            }
            "setAutoSnapConfig" => {
                let palette = require(params, "paletteId")?;
                let config = match get_map(params, "config") {
                    Some(map) => serde_json::from_value(Value::Object(map.clone()))
                        .map_err(|err| ServiceError::InvalidParams(err.to_string()))?,
                    None => AutoSnapConfig::default(),
                };
                self.coordinator.set_auto_snap_config(palette, config);
                Ok(Value::Null)
            }
            other => Err(ServiceError::UnknownCommand {
                service: "snap".into(),
                command: other.into(),
            }),
        }
    }

    fn snap(&self, params: &Map<String, Value>) -> Result<Value, ServiceError> {
        let follower = require(params, "followerId")?;
        let target = require(params, "targetId")?;

        let follower_edge = parse_edge(get_str_or(params, "followerEdge", "top"))?;
        let target_edge = parse_edge(get_str_or(params, "targetEdge", "bottom"))?;
        if target_edge != follower_edge.opposite() {
            return Err(ServiceError::InvalidParams(format!(
                "edges do not face each other: {follower_edge}/{target_edge}"
            )));
        }

        let alignment = Alignment::parse(get_str_or(params, "alignment", "center"))
            .ok_or_else(|| ServiceError::InvalidParams("unknown alignment".into()))?;

        let mut binding = SnapBinding::new(follower, target, follower_edge);
        binding.alignment = alignment;
        binding.gap = get_f64_or(params, "gap", 0.0);
        binding.mode = match get_str_or(params, "mode", "follower") {
            "bidirectional" => BindingMode::Bidirectional,
            _ => BindingMode::Follower,
        };

        if let Some(config) = get_map(params, "config") {
            binding.on_target_hidden =
                match get_str_or(config, "onTargetHidden", "hideFollower") {
                    "detach" => OnTargetHidden::Detach,
                    "keepBinding" => OnTargetHidden::KeepBinding,
                    _ => OnTargetHidden::HideFollower,
                };
            binding.on_target_destroyed =
                match get_str_or(config, "onTargetDestroyed", "hideAndDetach") {
                    "detach" => OnTargetDestroyed::Detach,
                    _ => OnTargetDestroyed::HideAndDetach,
                };
        }

        self.coordinator.snap(binding)?;
        Ok(Value::Null)
    }
}

fn require<'a>(params: &'a Map<String, Value>, key: &str) -> Result<&'a str, ServiceError> {
    get_str(params, key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::InvalidParams(format!("{key} required")))
}

fn parse_edge(s: &str) -> Result<Edge, ServiceError> {
    Edge::parse(s).ok_or_else(|| ServiceError::InvalidParams(format!("unknown edge: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_common::{Point, Rect};
    use easel_snap::{SnapEventSink, SnapSurface};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct MapSurface {
        frames: Mutex<HashMap<String, Rect>>,
    }

    impl MapSurface {
        fn add(&self, id: &str, frame: Rect) {
            self.frames.lock().unwrap().insert(id.into(), frame);
        }
    }

    impl SnapSurface for MapSurface {
        fn frame(&self, id: &str) -> Option<Rect> {
            self.frames.lock().unwrap().get(id).copied()
        }
        fn set_origin(&self, id: &str, origin: Point) {
            if let Some(f) = self.frames.lock().unwrap().get_mut(id) {
                *f = f.with_origin(origin);
            }
        }
        fn is_visible(&self, _id: &str) -> bool {
            true
        }
        fn hide(&self, _id: &str) {}
        fn is_destroyed(&self, _id: &str) -> bool {
            false
        }
    }

    fn service() -> (SnapService, Arc<MapSurface>) {
        let surface = Arc::new(MapSurface::default());
        let sink: SnapEventSink = Arc::new(|_| {});
        let coordinator = Arc::new(SnapCoordinator::with_throttle(
            Arc::clone(&surface) as Arc<dyn SnapSurface>,
            sink,
            Duration::ZERO,
        ));
        (SnapService::new(coordinator), surface)
    }

    #[test]
    fn snap_command_builds_a_binding() {
        let (service, surface) = service();
        surface.add("a", Rect::new(0.0, 0.0, 100.0, 50.0));
        surface.add("b", Rect::new(0.0, 100.0, 200.0, 100.0));

        let params = json!({
            "followerId": "a",
            "targetId": "b",
            "followerEdge": "top",
            "targetEdge": "bottom",
            "alignment": "leading",
            "gap": 8.0,
            "mode": "bidirectional",
            "config": { "onTargetHidden": "keepBinding", "onTargetDestroyed": "detach" }
        });
        service
            .handle("snap", None, params.as_object().unwrap())
            .unwrap();

        let bindings = service.coordinator.bindings();
        assert_eq!(bindings.len(), 1);
        let binding = &bindings[0];
        assert_eq!(binding.edge, Edge::Top);
        assert_eq!(binding.alignment, Alignment::Leading);
        assert_eq!(binding.gap, 8.0);
        assert_eq!(binding.mode, BindingMode::Bidirectional);
        assert_eq!(binding.on_target_hidden, OnTargetHidden::KeepBinding);
        assert_eq!(binding.on_target_destroyed, OnTargetDestroyed::Detach);
    }

    #[test]
    fn snap_rejects_incompatible_edges() {
        let (service, surface) = service();
        surface.add("a", Rect::default());
        surface.add("b", Rect::default());
        let params = json!({
            "followerId": "a",
            "targetId": "b",
            "followerEdge": "top",
            "targetEdge": "left"
        });
        let err = service
            .handle("snap", None, params.as_object().unwrap())
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }

    #[test]
    fn snap_requires_both_ids() {
        let (service, _) = service();
        let params = json!({ "followerId": "a" });
        let err = service
            .handle("snap", None, params.as_object().unwrap())
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }

    #[test]
    fn detach_and_re_snap() {
        let (service, surface) = service();
        surface.add("a", Rect::new(0.0, 0.0, 100.0, 50.0));
        surface.add("b", Rect::new(0.0, 100.0, 200.0, 100.0));
        let params = json!({ "followerId": "a", "targetId": "b" });
        service
            .handle("snap", None, params.as_object().unwrap())
            .unwrap();

        let re = json!({ "followerId": "a" });
        service
            .handle("reSnap", None, re.as_object().unwrap())
            .unwrap();

        service
            .handle("detach", None, re.as_object().unwrap())
            .unwrap();
        assert!(service.coordinator.bindings().is_empty());

        let err = service
            .handle("reSnap", None, re.as_object().unwrap())
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn snap_distance_defaults_to_zero() {
        let (service, _) = service();
        let value = service
            .handle("getSnapDistance", None, &Map::new())
            .unwrap();
        assert_eq!(value, json!(0.0));
    }

    #[test]
    fn set_auto_snap_config_parses_wire_map() {
        let (service, _) = service();
        let params = json!({
            "paletteId": "a",
            "config": {
                "canSnapFrom": ["top", "left"],
                "acceptsSnapOn": ["bottom"],
                "targetIds": ["b"],
                "proximityThreshold": 64.0,
                "showFeedback": false
            }
        });
        service
            .handle("setAutoSnapConfig", None, params.as_object().unwrap())
            .unwrap();

        let config = service.coordinator.config_for("a").unwrap();
        assert_eq!(config.can_snap_from.len(), 2);
        assert_eq!(config.proximity_threshold, 64.0);
        assert!(!config.show_feedback);
        assert!(config.target_ids.as_ref().unwrap().contains("b"));

        // An empty config disables auto-snap for the palette.
        let params = json!({ "paletteId": "a", "config": {} });
        service
            .handle("setAutoSnapConfig", None, params.as_object().unwrap())
            .unwrap();
        assert!(service.coordinator.config_for("a").is_none());
    }
}
