//! The `visibility` service: show (reveal-gated), hide, queries.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use easel_common::errors::ServiceError;
use easel_common::params::get_f64;
use easel_common::Point;
use easel_registry::WindowManager;

pub struct VisibilityService {
    manager: Arc<WindowManager>,
}

impl VisibilityService {
    pub fn new(manager: Arc<WindowManager>) -> Self {
        Self { manager }
    }

    pub fn handle(
        &self,
        command: &str,
        window_id: Option<&str>,
        params: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        let id = window_id.ok_or(ServiceError::MissingWindowId)?;
        match command {
            "show" => {
                let at = match (get_f64(params, "x"), get_f64(params, "y")) {
                    (Some(x), Some(y)) => Some(Point::new(x, y)),
                    _ => None,
                };
                self.manager.show(id, at)?;
                Ok(Value::Null)
            }
            "hide" => {
                self.manager.hide(id)?;
                Ok(Value::Null)
            }
            "isVisible" => Ok(json!(self.manager.is_visible(id))),
            other => Err(ServiceError::UnknownCommand {
                service: "visibility".into(),
                command: other.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_common::EventSink;
    use easel_registry::{FakePlatform, Platform, WindowConfig, WindowRegistry};

    fn service() -> VisibilityService {
        let platform = Arc::new(FakePlatform::new());
        let sink: EventSink = Arc::new(|_| {});
        let manager = Arc::new(WindowManager::new(
            Arc::new(WindowRegistry::new()),
            platform as Arc<dyn Platform>,
            sink,
        ));
        VisibilityService::new(manager)
    }

    #[test]
    fn show_waits_for_content_size() {
        let service = service();
        service
            .manager
            .create("w1", WindowConfig::default())
            .unwrap();

        let params = json!({ "x": 10.0, "y": 20.0 });
        service
            .handle("show", Some("w1"), params.as_object().unwrap())
            .unwrap();
        // Not visible yet; the reveal completes on the first size report.
        assert_eq!(
            service.handle("isVisible", Some("w1"), &Map::new()).unwrap(),
            json!(false)
        );

        service.manager.report_content_size("w1", 100.0, 50.0).unwrap();
        assert_eq!(
            service.handle("isVisible", Some("w1"), &Map::new()).unwrap(),
            json!(true)
        );
    }

    #[test]
    fn hide_roundtrip() {
        let service = service();
        service
            .manager
            .create("w1", WindowConfig::default())
            .unwrap();
        service.handle("show", Some("w1"), &Map::new()).unwrap();
        service.manager.report_content_size("w1", 100.0, 50.0).unwrap();

        service.handle("hide", Some("w1"), &Map::new()).unwrap();
        assert_eq!(
            service.handle("isVisible", Some("w1"), &Map::new()).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn commands_require_window_id() {
        let service = service();
        let err = service.handle("show", None, &Map::new()).unwrap_err();
        assert_eq!(err.code(), "MISSING_ID");
    }

    #[test]
    fn show_missing_window_is_not_found() {
        let service = service();
        let err = service.handle("show", Some("ghost"), &Map::new()).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
