//! Typed snap events, one variant per kind. Converted to wire envelopes at
//! the host boundary.

use std::sync::Arc;

use serde_json::json;

use easel_common::{Edge, Event, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum SnapEvent {
    DragStarted {
        follower_id: String,
        frame: Rect,
        snap_distance: f64,
    },
    ProximityEntered {
        follower_id: String,
        target_id: String,
        follower_edge: Edge,
        target_edge: Edge,
        distance: f64,
    },
    ProximityUpdated {
        follower_id: String,
        target_id: String,
        distance: f64,
    },
    ProximityExited {
        follower_id: String,
        target_id: String,
    },
    Snapped {
        follower_id: String,
        target_id: String,
    },
    Detached {
        follower_id: String,
    },
}

pub type SnapEventSink = Arc<dyn Fn(SnapEvent) + Send + Sync>;

impl SnapEvent {
    pub fn follower_id(&self) -> &str {
        match self {
            SnapEvent::DragStarted { follower_id, .. }
            | SnapEvent::ProximityEntered { follower_id, .. }
            | SnapEvent::ProximityUpdated { follower_id, .. }
            | SnapEvent::ProximityExited { follower_id, .. }
            | SnapEvent::Snapped { follower_id, .. }
            | SnapEvent::Detached { follower_id } => follower_id,
        }
    }

    /// The wire envelope for this event, on the `snap` service with the
    /// follower as the envelope window.
    pub fn into_wire(self) -> Event {
        match self {
            SnapEvent::DragStarted {
                follower_id,
                frame,
                snap_distance,
            } => Event::new("snap", "dragStarted")
                .window(follower_id)
                .datum(
                    "frame",
                    json!({
                        "x": frame.x,
                        "y": frame.y,
                        "width": frame.width,
                        "height": frame.height
                    }),
                )
                .datum("snapDistance", json!(snap_distance)),
            SnapEvent::ProximityEntered {
                follower_id,
                target_id,
                follower_edge,
                target_edge,
                distance,
            } => Event::new("snap", "proximityEntered")
                .window(follower_id)
                .datum("targetId", target_id)
                .datum("draggedEdge", follower_edge.as_str())
                .datum("targetEdge", target_edge.as_str())
                .datum("distance", json!(distance)),
            SnapEvent::ProximityUpdated {
                follower_id,
                target_id,
                distance,
            } => Event::new("snap", "proximityUpdated")
                .window(follower_id)
                .datum("targetId", target_id)
                .datum("distance", json!(distance)),
            SnapEvent::ProximityExited {
                follower_id,
                target_id,
            } => Event::new("snap", "proximityExited")
                .window(follower_id)
                .datum("targetId", target_id),
            SnapEvent::Snapped {
                follower_id,
                target_id,
            } => Event::new("snap", "snapped")
                .window(follower_id)
                .datum("targetId", target_id),
            SnapEvent::Detached { follower_id } => {
                Event::new("snap", "detached").window(follower_id)
            }
        }
    }
}
