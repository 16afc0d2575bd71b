//! Construction and cross-wiring of the host-side services.

use std::sync::Arc;

use tracing::warn;

use easel_common::capabilities::Capabilities;
use easel_common::{EventSink, Point, Rect};
use easel_effects::EffectBufferRegistry;
use easel_registry::{LifecycleObserver, Platform, WindowManager, WindowRegistry};
use easel_snap::{SnapCoordinator, SnapEventSink, SnapSurface};

use crate::fastpath::FastPath;
use crate::router::ServiceRouter;

/// Everything the host side owns, explicitly constructed — no ambient
/// singletons. Collaborators receive the pieces they need from here.
pub struct HostRuntime {
    manager: Arc<WindowManager>,
    coordinator: Arc<SnapCoordinator>,
    effects: Arc<EffectBufferRegistry>,
    capabilities: Capabilities,
    router: Arc<ServiceRouter>,
}

impl HostRuntime {
    /// Build the runtime over a platform and the controller-bound event
    /// sink. Wires: manager → coordinator (lifecycle observer), coordinator
    /// → manager (snap surface), window destruction → effect buffer sweep.
    pub fn build(platform: Arc<dyn Platform>, events: EventSink) -> Arc<Self> {
        let registry = Arc::new(WindowRegistry::new());
        let manager = Arc::new(WindowManager::new(
            registry,
            Arc::clone(&platform),
            Arc::clone(&events),
        ));
        let effects = Arc::new(EffectBufferRegistry::new());

        let surface = Arc::new(ManagerSurface {
            manager: Arc::clone(&manager),
        });
        let snap_events = Arc::clone(&events);
        let snap_sink: SnapEventSink = Arc::new(move |event| snap_events(event.into_wire()));
        let coordinator = Arc::new(SnapCoordinator::new(surface, snap_sink));

        manager.set_observer(Arc::new(CoordinatorObserver {
            coordinator: Arc::clone(&coordinator),
            effects: Arc::clone(&effects),
        }));

        let capabilities = resolve_capabilities(platform.as_ref());
        let router = Arc::new(ServiceRouter::new(
            Arc::clone(&manager),
            Arc::clone(&coordinator),
            capabilities.clone(),
            Arc::clone(&events),
        ));

        Arc::new(Self {
            manager,
            coordinator,
            effects,
            capabilities,
            router,
        })
    }

    pub fn router(&self) -> Arc<ServiceRouter> {
        Arc::clone(&self.router)
    }

    pub fn manager(&self) -> &Arc<WindowManager> {
        &self.manager
    }

    pub fn coordinator(&self) -> &Arc<SnapCoordinator> {
        &self.coordinator
    }

    pub fn effects(&self) -> &Arc<EffectBufferRegistry> {
        &self.effects
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The synchronous surface handed to the content layer.
    pub fn fast_path(self: &Arc<Self>) -> FastPath {
        FastPath::new(Arc::clone(&self.manager), Arc::clone(&self.effects))
    }
}

/// Capability descriptor, resolved once at startup and threaded through.
fn resolve_capabilities(platform: &dyn Platform) -> Capabilities {
    Capabilities {
        blur: false,
        transform: false,
        global_hotkeys: false,
        glass_effect: false,
        multi_monitor: platform.screen_count() > 1,
        content_sizing: true,
        text_selection: false,
        platform: std::env::consts::OS.to_string(),
        os_version: "unknown".to_string(),
    }
}

/// The coordinator's view of the window layer, backed by the manager.
struct ManagerSurface {
    manager: Arc<WindowManager>,
}

impl SnapSurface for ManagerSurface {
    fn frame(&self, id: &str) -> Option<Rect> {
        self.manager.platform().frame(id)
    }

    fn set_origin(&self, id: &str, origin: Point) {
        // Coordinator-driven moves go straight to the platform; the
        // coordinator already planned the rest of the wave itself.
        self.manager.platform().set_origin(id, origin);
    }

    fn is_visible(&self, id: &str) -> bool {
        self.manager.is_visible(id)
    }

    fn hide(&self, id: &str) {
        if let Err(err) = self.manager.hide(id) {
            warn!(id, error = %err, "cascaded hide failed");
        }
    }

    fn is_destroyed(&self, id: &str) -> bool {
        self.manager.is_destroyed_or_gone(id)
    }
}

/// Fans lifecycle changes out to the snap coordinator and sweeps effect
/// buffers when windows die.
struct CoordinatorObserver {
    coordinator: Arc<SnapCoordinator>,
    effects: Arc<EffectBufferRegistry>,
}

impl LifecycleObserver for CoordinatorObserver {
    fn window_shown(&self, id: &str) {
        self.coordinator.on_window_shown(id);
    }

    fn window_hidden(&self, id: &str) {
        self.coordinator.on_window_hidden(id);
    }

    fn window_destroyed(&self, id: &str) {
        self.coordinator.on_window_destroyed(id);
        self.effects.destroy_window_buffers(id);
    }

    fn window_moved(&self, id: &str) {
        self.coordinator.on_window_moved(id);
    }
}
