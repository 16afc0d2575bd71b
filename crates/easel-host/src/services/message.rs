//! The `message` service: relays palette payloads to controller-side
//! subscribers as `message.received` events.

use serde_json::{Map, Value};

use easel_common::errors::ServiceError;
use easel_common::{Event, EventSink};

pub struct MessageService {
    events: EventSink,
}

impl MessageService {
    pub fn new(events: EventSink) -> Self {
        Self { events }
    }

    pub fn handle(
        &self,
        command: &str,
        window_id: Option<&str>,
        params: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        match command {
            "send" => {
                let mut event = Event::new("message", "received").data(params.clone());
                if let Some(id) = window_id {
                    event = event.window(id);
                }
                (self.events)(event);
                Ok(Value::Null)
            }
            other => Err(ServiceError::UnknownCommand {
                service: "message".into(),
                command: other.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn send_relays_payload_as_event() {
        let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&events);
        let sink: EventSink = Arc::new(move |e| record.lock().unwrap().push(e));
        let service = MessageService::new(sink);

        let params = json!({ "topic": "refresh", "payload": { "count": 3 } });
        service
            .handle("send", Some("w1"), params.as_object().unwrap())
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].service, "message");
        assert_eq!(events[0].event, "received");
        assert_eq!(events[0].window_id.as_deref(), Some("w1"));
        assert_eq!(events[0].data["topic"], "refresh");
    }

    #[test]
    fn unknown_command_is_rejected() {
        let sink: EventSink = Arc::new(|_| {});
        let service = MessageService::new(sink);
        let err = service.handle("broadcast", None, &Map::new()).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_COMMAND");
    }
}
