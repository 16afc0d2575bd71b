//! The drag/snap coordinator: per-drag state, proximity tracking, binding
//! commits, and movement/visibility propagation across bindings.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use easel_common::errors::SnapError;
use easel_common::{Point, Rect};

use crate::binding::{
    snap_origin, AutoSnapConfig, BindingMode, OnTargetDestroyed, OnTargetHidden, SnapBinding,
    DEFAULT_SNAP_GAP,
};
use crate::events::{SnapEvent, SnapEventSink};
use crate::proximity::{find_nearest, Candidate, ProximityMatch};
use crate::surface::SnapSurface;

/// Proximity recomputation cadence during a drag (~120 Hz).
const DEFAULT_THROTTLE: Duration = Duration::from_millis(8);

/// Ephemeral state for one pointer drag. Created on drag start, destroyed on
/// drag end or when the dragged window is destroyed mid-drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub window_id: String,
    pub frame: Rect,
    pub snap_distance: f64,
    pub proximity: Option<ProximityMatch>,
    last_check: Option<Instant>,
}

#[derive(Default)]
struct State {
    bindings: Vec<SnapBinding>,
    configs: HashMap<String, AutoSnapConfig>,
    drag: Option<DragSession>,
    /// Windows currently being repositioned by the coordinator itself; their
    /// movement echoes are ignored.
    repositioning: HashSet<String>,
}

/// Deferred side effects, computed under the state lock and executed after
/// it is released. Surface calls can re-enter the coordinator (a moved
/// follower reports back as a move), so nothing touches the surface while
/// the lock is held for writing plans.
enum Act {
    Move { id: String, origin: Point },
    Hide { id: String },
    Emit(SnapEvent),
}

pub struct SnapCoordinator {
    surface: Arc<dyn SnapSurface>,
    sink: SnapEventSink,
    throttle: Duration,
    state: Mutex<State>,
}

impl SnapCoordinator {
    pub fn new(surface: Arc<dyn SnapSurface>, sink: SnapEventSink) -> Self {
        Self::with_throttle(surface, sink, DEFAULT_THROTTLE)
    }

    pub fn with_throttle(
        surface: Arc<dyn SnapSurface>,
        sink: SnapEventSink,
        throttle: Duration,
    ) -> Self {
        Self {
            surface,
            sink,
            throttle,
            state: Mutex::new(State::default()),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn bindings(&self) -> Vec<SnapBinding> {
        self.lock().bindings.clone()
    }

    pub fn bindings_for(&self, follower_id: &str) -> Vec<SnapBinding> {
        self.lock()
            .bindings
            .iter()
            .filter(|b| b.follower_id == follower_id)
            .cloned()
            .collect()
    }

    pub fn config_for(&self, id: &str) -> Option<AutoSnapConfig> {
        self.lock().configs.get(id).cloned()
    }

    pub fn is_dragging(&self, id: &str) -> bool {
        self.lock()
            .drag
            .as_ref()
            .is_some_and(|d| d.window_id == id)
    }

    pub fn active_drag(&self) -> Option<DragSession> {
        self.lock().drag.clone()
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Replace the window's auto-snap config. A config with no edges at all
    /// disables auto-snap for that window.
    pub fn set_auto_snap_config(&self, id: &str, config: AutoSnapConfig) {
        let mut st = self.lock();
        if config.is_disabled() {
            st.configs.remove(id);
        } else {
            st.configs.insert(id.to_string(), config);
        }
    }

    /// Commit an explicit binding, position the follower, emit `snapped`.
    /// Replaces any existing binding on the same follower edge.
    pub fn snap(&self, binding: SnapBinding) -> Result<(), SnapError> {
        if binding.follower_id == binding.target_id {
            return Err(SnapError::InvalidParams(
                "follower and target must differ".into(),
            ));
        }
        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            st.bindings
                .retain(|b| !(b.follower_id == binding.follower_id && b.edge == binding.edge));
            if let Some(origin) = self.binding_origin(&binding) {
                acts.push(Act::Move {
                    id: binding.follower_id.clone(),
                    origin,
                });
            }
            acts.push(Act::Emit(SnapEvent::Snapped {
                follower_id: binding.follower_id.clone(),
                target_id: binding.target_id.clone(),
            }));
            info!(
                follower = %binding.follower_id,
                target = %binding.target_id,
                edge = %binding.edge,
                "snap committed"
            );
            st.bindings.push(binding);
        }
        self.execute(acts);
        Ok(())
    }

    /// Remove all of the follower's bindings. Emits `detached` when any
    /// existed; detaching an unbound window is a quiet no-op.
    pub fn detach(&self, follower_id: &str) {
        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            let before = st.bindings.len();
            st.bindings.retain(|b| b.follower_id != follower_id);
            if st.bindings.len() != before {
                acts.push(Act::Emit(SnapEvent::Detached {
                    follower_id: follower_id.to_string(),
                }));
            }
        }
        self.execute(acts);
    }

    /// Re-apply the follower's binding geometry and emit `snapped` again.
    pub fn re_snap(&self, follower_id: &str) -> Result<(), SnapError> {
        let mut acts = Vec::new();
        {
            let st = self.lock();
            let bindings: Vec<&SnapBinding> = st
                .bindings
                .iter()
                .filter(|b| b.follower_id == follower_id)
                .collect();
            if bindings.is_empty() {
                return Err(SnapError::NotBound(follower_id.to_string()));
            }
            for binding in bindings {
                if let Some(origin) = self.binding_origin(binding) {
                    acts.push(Act::Move {
                        id: follower_id.to_string(),
                        origin,
                    });
                }
                acts.push(Act::Emit(SnapEvent::Snapped {
                    follower_id: follower_id.to_string(),
                    target_id: binding.target_id.clone(),
                }));
            }
        }
        self.execute(acts);
        Ok(())
    }

    /// Distance between the follower's current origin and where its binding
    /// would place it. Unbound or unknown windows report 0.
    pub fn snap_distance(&self, follower_id: &str) -> f64 {
        let st = self.lock();
        let Some(binding) = st.bindings.iter().find(|b| b.follower_id == follower_id) else {
            return 0.0;
        };
        let Some(frame) = self.surface.frame(follower_id) else {
            return 0.0;
        };
        match self.binding_origin(binding) {
            Some(origin) => {
                let dx = origin.x - frame.x;
                let dy = origin.y - frame.y;
                dx.hypot(dy)
            }
            None => 0.0,
        }
    }

    // -----------------------------------------------------------------------
    // Drag state machine
    // -----------------------------------------------------------------------

    /// A pointer drag started on `id`. Any existing binding detaches
    /// (re-attach happens on release if the drag ends in proximity).
    pub fn drag_began(&self, id: &str) {
        if self.surface.is_destroyed(id) {
            return;
        }
        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            let before = st.bindings.len();
            st.bindings.retain(|b| b.follower_id != id);
            if st.bindings.len() != before {
                acts.push(Act::Emit(SnapEvent::Detached {
                    follower_id: id.to_string(),
                }));
            }

            let frame = self.surface.frame(id).unwrap_or_default();
            st.drag = Some(DragSession {
                window_id: id.to_string(),
                frame,
                snap_distance: 0.0,
                proximity: None,
                last_check: None,
            });
            acts.push(Act::Emit(SnapEvent::DragStarted {
                follower_id: id.to_string(),
                frame,
                snap_distance: 0.0,
            }));
            debug!(id, "drag began");
        }
        self.execute(acts);
    }

    /// A drag update with the window's already-applied frame. Repositions
    /// attached windows and, throttled, recomputes the proximity target.
    pub fn drag_moved(&self, id: &str, frame: Rect) {
        if self.surface.is_destroyed(id) {
            // The dragged window died mid-drag: cancel the session.
            let mut st = self.lock();
            if st.drag.as_ref().is_some_and(|d| d.window_id == id) {
                st.drag = None;
            }
            return;
        }

        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            if st.repositioning.contains(id) {
                return;
            }

            for (window_id, origin) in self.plan_chain(&st, id) {
                acts.push(Act::Move {
                    id: window_id,
                    origin,
                });
            }

            if !st.drag.as_ref().is_some_and(|d| d.window_id == id) {
                self.queue_marks(&mut st, &acts);
            } else {
                let due = st
                    .drag
                    .as_ref()
                    .and_then(|d| d.last_check)
                    .map_or(true, |at| at.elapsed() >= self.throttle);

                if due {
                    let bound = st.bindings.iter().any(|b| b.follower_id == id);
                    let feedback = st.configs.get(id).map_or(true, |c| c.show_feedback);
                    let found = if bound {
                        None
                    } else {
                        match st.configs.get(id).filter(|c| !c.can_snap_from.is_empty()) {
                            Some(config) => {
                                let candidates = self.collect_candidates(&st, id);
                                find_nearest(&frame, config, &candidates)
                            }
                            None => None,
                        }
                    };

                    let drag = st.drag.as_mut().expect("session checked above");
                    drag.frame = frame;
                    drag.last_check = Some(Instant::now());
                    // Proximity transitions still track state with feedback
                    // off; only the feedback events are suppressed.
                    match (&drag.proximity, &found) {
                        (None, Some(new)) if feedback => {
                            acts.push(Act::Emit(entered(id, new)))
                        }
                        (Some(old), Some(new)) if feedback && !old.same_pairing(new) => {
                            acts.push(Act::Emit(exited(id, old)));
                            acts.push(Act::Emit(entered(id, new)));
                        }
                        (Some(old), Some(new)) if feedback && old.distance != new.distance => {
                            acts.push(Act::Emit(SnapEvent::ProximityUpdated {
                                follower_id: id.to_string(),
                                target_id: new.target_id.clone(),
                                distance: new.distance,
                            }));
                        }
                        (Some(old), None) if feedback => acts.push(Act::Emit(exited(id, old))),
                        _ => {}
                    }
                    drag.snap_distance = found.as_ref().map_or(0.0, |m| m.distance);
                    drag.proximity = found;
                } else if let Some(drag) = st.drag.as_mut() {
                    drag.frame = frame;
                }
                self.queue_marks(&mut st, &acts);
            }
        }
        self.run(acts);
    }

    /// The drag released. An active proximity target commits a binding;
    /// otherwise the coordinator just returns to idle.
    pub fn drag_ended(&self, id: &str, _frame: Rect) {
        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            let drag = match st.drag.take() {
                Some(d) if d.window_id == id => d,
                other => {
                    st.drag = other;
                    return;
                }
            };
            if self.surface.is_destroyed(id) {
                return;
            }

            if let Some(prox) = drag.proximity {
                let mut binding =
                    SnapBinding::new(id, prox.target_id.clone(), prox.follower_edge);
                binding.gap = DEFAULT_SNAP_GAP;
                st.bindings
                    .retain(|b| !(b.follower_id == id && b.edge == binding.edge));
                if let Some(origin) = self.binding_origin(&binding) {
                    acts.push(Act::Move {
                        id: id.to_string(),
                        origin,
                    });
                }
                acts.push(Act::Emit(SnapEvent::Snapped {
                    follower_id: id.to_string(),
                    target_id: binding.target_id.clone(),
                }));
                info!(follower = id, target = %binding.target_id, "auto-snap committed");
                st.bindings.push(binding);
            }
            self.queue_marks(&mut st, &acts);
        }
        self.run(acts);
    }

    // -----------------------------------------------------------------------
    // Lifecycle notifications from the window layer
    // -----------------------------------------------------------------------

    /// A window moved (not via a drag of itself). Followers bound to it are
    /// repositioned; a bidirectional binding also drags the peer along.
    pub fn on_window_moved(&self, id: &str) {
        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            if st.repositioning.contains(id) {
                return;
            }
            for (window_id, origin) in self.plan_chain(&st, id) {
                acts.push(Act::Move {
                    id: window_id,
                    origin,
                });
            }
            self.queue_marks(&mut st, &acts);
        }
        self.run(acts);
    }

    /// A window became visible again: put its followers back in place.
    pub fn on_window_shown(&self, id: &str) {
        self.on_window_moved(id);
    }

    /// A bound target was hidden: apply each binding's hidden policy.
    pub fn on_window_hidden(&self, id: &str) {
        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            let mut keep = Vec::new();
            for binding in std::mem::take(&mut st.bindings) {
                if binding.target_id != id {
                    keep.push(binding);
                    continue;
                }
                match binding.on_target_hidden {
                    OnTargetHidden::HideFollower => {
                        acts.push(Act::Hide {
                            id: binding.follower_id.clone(),
                        });
                        keep.push(binding);
                    }
                    OnTargetHidden::Detach => {
                        acts.push(Act::Emit(SnapEvent::Detached {
                            follower_id: binding.follower_id.clone(),
                        }));
                    }
                    OnTargetHidden::KeepBinding => keep.push(binding),
                }
            }
            st.bindings = keep;
        }
        self.execute(acts);
    }

    /// A window was destroyed. Its bindings disappear in both roles; for
    /// bindings that targeted it, `HideAndDetach` also hides the follower.
    pub fn on_window_destroyed(&self, id: &str) {
        let mut acts = Vec::new();
        {
            let mut st = self.lock();
            let mut keep = Vec::new();
            for binding in std::mem::take(&mut st.bindings) {
                if binding.follower_id == id {
                    continue;
                }
                if binding.target_id == id {
                    if binding.on_target_destroyed == OnTargetDestroyed::HideAndDetach {
                        acts.push(Act::Hide {
                            id: binding.follower_id.clone(),
                        });
                    }
                    continue;
                }
                keep.push(binding);
            }
            st.bindings = keep;
            st.configs.remove(id);

            if st.drag.as_ref().is_some_and(|d| d.window_id == id) {
                st.drag = None;
            } else if let Some(drag) = st.drag.as_mut() {
                if drag.proximity.as_ref().is_some_and(|p| p.target_id == id) {
                    drag.proximity = None;
                    drag.snap_distance = 0.0;
                }
            }
        }
        self.execute(acts);
    }

    // -----------------------------------------------------------------------
    // Planning / execution
    // -----------------------------------------------------------------------

    /// Plan the transitive repositioning wave triggered by `moved`: direct
    /// followers, their followers, and bidirectional peers. Later hops use
    /// the frames planned for earlier hops, not the stale surface frames.
    fn plan_chain(&self, st: &State, moved: &str) -> Vec<(String, Point)> {
        let mut plan = Vec::new();
        let mut planned_frames: HashMap<String, Rect> = HashMap::new();
        let mut visited: HashSet<String> = HashSet::from([moved.to_string()]);
        let mut queue = VecDeque::from([moved.to_string()]);

        let frame_of = |planned: &HashMap<String, Rect>, id: &str| {
            planned
                .get(id)
                .copied()
                .or_else(|| self.surface.frame(id))
        };

        while let Some(id) = queue.pop_front() {
            for binding in &st.bindings {
                if binding.target_id == id && !visited.contains(&binding.follower_id) {
                    let (Some(follower), Some(target)) = (
                        frame_of(&planned_frames, &binding.follower_id),
                        frame_of(&planned_frames, &binding.target_id),
                    ) else {
                        continue;
                    };
                    let origin =
                        snap_origin(&follower, &target, binding.edge, binding.alignment, binding.gap);
                    visited.insert(binding.follower_id.clone());
                    planned_frames.insert(binding.follower_id.clone(), follower.with_origin(origin));
                    plan.push((binding.follower_id.clone(), origin));
                    queue.push_back(binding.follower_id.clone());
                }

                if binding.mode == BindingMode::Bidirectional
                    && binding.follower_id == id
                    && !visited.contains(&binding.target_id)
                {
                    let (Some(follower), Some(target)) = (
                        frame_of(&planned_frames, &binding.follower_id),
                        frame_of(&planned_frames, &binding.target_id),
                    ) else {
                        continue;
                    };
                    // Mirrored geometry: position the target against the
                    // follower on the opposite edge.
                    let origin = snap_origin(
                        &target,
                        &follower,
                        binding.edge.opposite(),
                        binding.alignment,
                        binding.gap,
                    );
                    visited.insert(binding.target_id.clone());
                    planned_frames.insert(binding.target_id.clone(), target.with_origin(origin));
                    plan.push((binding.target_id.clone(), origin));
                    queue.push_back(binding.target_id.clone());
                }
            }
        }
        plan
    }

    fn binding_origin(&self, binding: &SnapBinding) -> Option<Point> {
        let follower = self.surface.frame(&binding.follower_id)?;
        let target = self.surface.frame(&binding.target_id)?;
        Some(snap_origin(
            &follower,
            &target,
            binding.edge,
            binding.alignment,
            binding.gap,
        ))
    }

    fn collect_candidates(&self, st: &State, dragged_id: &str) -> Vec<Candidate> {
        st.configs
            .iter()
            .filter(|(id, config)| id.as_str() != dragged_id && !config.accepts_snap_on.is_empty())
            .filter(|(id, _)| {
                // A window already following the dragged one is not a
                // candidate; that would invert the binding.
                !st.bindings
                    .iter()
                    .any(|b| b.follower_id == id.as_str() && b.target_id == dragged_id)
            })
            .filter(|(id, _)| self.surface.is_visible(id.as_str()))
            .filter_map(|(id, config)| {
                self.surface
                    .frame(id.as_str())
                    .map(|frame| (id.clone(), frame, config.clone()))
            })
            .collect()
    }

    /// Flag the windows a plan is about to move so their movement echoes are
    /// ignored. Must be called while holding the lock the plan was made
    /// under.
    fn queue_marks(&self, st: &mut MutexGuard<'_, State>, acts: &[Act]) {
        for act in acts {
            if let Act::Move { id, .. } = act {
                st.repositioning.insert(id.clone());
            }
        }
    }

    /// Execute acts planned by `queue_marks`-aware paths, then clear marks.
    fn run(&self, acts: Vec<Act>) {
        let moved: Vec<String> = acts
            .iter()
            .filter_map(|act| match act {
                Act::Move { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect();

        for act in acts {
            match act {
                Act::Move { id, origin } => self.surface.set_origin(&id, origin),
                Act::Hide { id } => self.surface.hide(&id),
                Act::Emit(event) => (self.sink)(event),
            }
        }

        if !moved.is_empty() {
            let mut st = self.lock();
            for id in moved {
                st.repositioning.remove(&id);
            }
        }
    }

    /// Execute acts from paths that did not pre-mark (mark here instead).
    fn execute(&self, acts: Vec<Act>) {
        {
            let mut st = self.lock();
            self.queue_marks(&mut st, &acts);
        }
        self.run(acts);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn entered(id: &str, m: &ProximityMatch) -> SnapEvent {
    SnapEvent::ProximityEntered {
        follower_id: id.to_string(),
        target_id: m.target_id.clone(),
        follower_edge: m.follower_edge,
        target_edge: m.target_edge,
        distance: m.distance,
    }
}

fn exited(id: &str, m: &ProximityMatch) -> SnapEvent {
    SnapEvent::ProximityExited {
        follower_id: id.to_string(),
        target_id: m.target_id.clone(),
    }
}
