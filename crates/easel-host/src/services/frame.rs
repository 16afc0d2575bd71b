//! The `frame` service: positioning, sizing, bounds queries, and the drag
//! gesture stream from the content layer.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use easel_common::errors::ServiceError;
use easel_common::params::{get_bool_or, get_f64, get_f64_or, get_str_or};
use easel_common::{Anchor, Point, Rect};
use easel_registry::WindowManager;
use easel_snap::SnapCoordinator;

pub struct FrameService {
    manager: Arc<WindowManager>,
    coordinator: Arc<SnapCoordinator>,
}

impl FrameService {
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
        let id = window_id.ok_or(ServiceError::MissingWindowId)?;
        match command {
            "setPosition" => {
                let x = get_f64_or(params, "x", 0.0);
                let y = get_f64_or(params, "y", 0.0);
                let anchor = Anchor::parse(get_str_or(params, "anchor", "topLeft"))
                    .ok_or_else(|| ServiceError::InvalidParams("unknown anchor".into()))?;
                self.manager.set_position(id, Point::new(x, y), anchor)?;
                Ok(Value::Null)
            }
            "setSize" => {
                let current = self.manager.size(id)?;
                let width = get_f64_or(params, "width", current.width);
                let height = get_f64_or(params, "height", current.height);
                self.manager.set_size(id, width, height)?;
                Ok(Value::Null)
            }
            "setBounds" => {
                let bounds = self.manager.bounds(id)?;
                let next = Rect::new(
                    get_f64_or(params, "x", bounds.x),
                    get_f64_or(params, "y", bounds.y),
                    get_f64_or(params, "width", bounds.width),
                    get_f64_or(params, "height", bounds.height),
                );
                self.manager.set_bounds(id, next)?;
                Ok(Value::Null)
            }
            "getPosition" => {
                let at = self.manager.position(id)?;
                Ok(json!({ "x": at.x, "y": at.y }))
            }
            "getSize" => {
                let size = self.manager.size(id)?;
                Ok(json!({ "width": size.width, "height": size.height }))
            }
            "getBounds" => {
                let bounds = self.manager.bounds(id)?;
                Ok(json!({
                    "x": bounds.x,
                    "y": bounds.y,
                    "width": bounds.width,
                    "height": bounds.height
                }))
            }
            "setDraggable" => {
                let draggable = get_bool_or(params, "draggable", true);
                self.manager.set_draggable(id, draggable)?;
                Ok(Value::Null)
            }
            "dragStarted" => {
                if self.manager.is_draggable(id) {
                    self.coordinator.drag_began(id);
                }
                Ok(Value::Null)
            }
            "dragMoved" => {
                let frame = self.apply_drag_origin(id, params)?;
                self.coordinator.drag_moved(id, frame);
                Ok(Value::Null)
            }
            "dragEnded" => {
                let frame = self.apply_drag_origin(id, params)?;
                self.coordinator.drag_ended(id, frame);
                Ok(Value::Null)
            }
            other => Err(ServiceError::UnknownCommand {
                service: "frame".into(),
                command: other.into(),
            }),
        }
    }

    /// Apply the drag source's reported origin to the native window, then
    /// hand the resulting frame to the coordinator.
    fn apply_drag_origin(
        &self,
        id: &str,
        params: &Map<String, Value>,
    ) -> Result<Rect, ServiceError> {
        let frame = self.manager.bounds(id)?;
        let next = match (get_f64(params, "x"), get_f64(params, "y")) {
            (Some(x), Some(y)) => {
                let moved = frame.with_origin(Point::new(x, y));
                self.manager.platform().set_origin(id, moved.origin());
                moved
            }
            _ => frame,
        };
        Ok(next)
    }
}
