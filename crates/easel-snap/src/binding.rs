//! Snap bindings and per-window auto-snap configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use easel_common::{Alignment, Edge, Point, Rect};

/// Maximum edge-to-edge distance at which a candidate is eligible.
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 50.0;

/// Gap left between snapped edges when a drag commits a binding.
pub const DEFAULT_SNAP_GAP: f64 = 4.0;

/// How movement propagates across a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingMode {
    /// Only the target's movement drives the follower.
    #[default]
    Follower,
    /// Moving either window repositions the other.
    Bidirectional,
}

/// What happens to the follower when its target is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnTargetHidden {
    /// Cascade the hide to the follower; the binding stays.
    #[default]
    HideFollower,
    /// Remove the binding only.
    Detach,
    /// Leave the binding intact, follower stays visible.
    KeepBinding,
}

/// What happens to the follower when its target is destroyed. The binding is
/// always removed; the variants differ in whether the follower is hidden too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnTargetDestroyed {
    #[default]
    HideAndDetach,
    Detach,
}

/// An active magnetic attachment: `follower_id`'s `edge` is held against the
/// opposite edge of `target_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapBinding {
    pub follower_id: String,
    pub target_id: String,
    /// The follower's snapped edge; the target edge is its opposite.
    pub edge: Edge,
    pub alignment: Alignment,
    pub gap: f64,
    pub mode: BindingMode,
    pub on_target_hidden: OnTargetHidden,
    pub on_target_destroyed: OnTargetDestroyed,
}

impl SnapBinding {
    pub fn new(
        follower_id: impl Into<String>,
        target_id: impl Into<String>,
        edge: Edge,
    ) -> Self {
        Self {
            follower_id: follower_id.into(),
            target_id: target_id.into(),
            edge,
            alignment: Alignment::Center,
            gap: 0.0,
            mode: BindingMode::Follower,
            on_target_hidden: OnTargetHidden::HideFollower,
            on_target_destroyed: OnTargetDestroyed::HideAndDetach,
        }
    }

    pub fn target_edge(&self) -> Edge {
        self.edge.opposite()
    }
}

/// Per-window auto-snap rules, supplied by the configuration layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoSnapConfig {
    /// Edges this window may snap from while being dragged.
    pub can_snap_from: HashSet<Edge>,
    /// Edges on which this window accepts incoming snaps.
    pub accepts_snap_on: HashSet<Edge>,
    /// Allow-list of target ids; `None` means any window.
    pub target_ids: Option<HashSet<String>>,
    pub proximity_threshold: f64,
    pub show_feedback: bool,
}

impl Default for AutoSnapConfig {
    fn default() -> Self {
        Self {
            can_snap_from: HashSet::new(),
            accepts_snap_on: HashSet::new(),
            target_ids: None,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            show_feedback: true,
        }
    }
}

impl AutoSnapConfig {
    /// A config with neither outgoing nor incoming edges does nothing and is
    /// dropped from the coordinator.
    pub fn is_disabled(&self) -> bool {
        self.can_snap_from.is_empty() && self.accepts_snap_on.is_empty()
    }

    pub fn allows_target(&self, id: &str) -> bool {
        match &self.target_ids {
            Some(ids) => ids.contains(id),
            None => true,
        }
    }
}

/// Top-left origin that places `follower` against `target` per the binding
/// geometry: the snapped edges separated by `gap`, aligned along the
/// perpendicular axis.
pub fn snap_origin(
    follower: &Rect,
    target: &Rect,
    edge: Edge,
    alignment: Alignment,
    gap: f64,
) -> Point {
    let (fw, fh) = (follower.width, follower.height);
    let (tw, th) = (target.width, target.height);

    let mut x = follower.x;
    let mut y = follower.y;

    match edge {
        // Follower's top meets target's bottom: follower goes below.
        Edge::Top => y = target.bottom() + gap,
        // Follower's bottom meets target's top: follower goes above.
        Edge::Bottom => y = target.top() - fh - gap,
        // Follower's left meets target's right: follower goes to the right.
        Edge::Left => x = target.right() + gap,
        // Follower's right meets target's left: follower goes to the left.
        Edge::Right => x = target.left() - fw - gap,
    }

    if edge.is_horizontal() {
        // Vertical snap: align along the X axis.
        x = match alignment {
            Alignment::Leading => target.left(),
            Alignment::Trailing => target.right() - fw,
            Alignment::Center => target.left() + (tw - fw) / 2.0,
        };
    } else {
        // Horizontal snap: align along the Y axis.
        y = match alignment {
            Alignment::Leading => target.top(),
            Alignment::Trailing => target.bottom() - fh,
            Alignment::Center => target.top() + (th - fh) / 2.0,
        };
    }

    Point::new(x, y)
}
