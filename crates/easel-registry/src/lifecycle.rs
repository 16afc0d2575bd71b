//! Window lifecycle: create, show-after-sized reveal, hide, destroy.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing::{debug, info};

use easel_common::errors::RegistryError;
use easel_common::{Event, EventSink, Point, Rect};

use crate::platform::Platform;
use crate::registry::WindowRegistry;
use crate::window::{PaletteWindow, WindowConfig};

/// Staging origin for windows awaiting their first content size. Far enough
/// off every screen that the unsized window is never visible.
pub(crate) const OFFSCREEN: Point = Point {
    x: -32000.0,
    y: -32000.0,
};

/// Receives lifecycle notifications after the registry has committed the
/// state change. The snap coordinator hangs off this seam.
pub trait LifecycleObserver: Send + Sync {
    fn window_shown(&self, _id: &str) {}
    fn window_hidden(&self, _id: &str) {}
    fn window_destroyed(&self, _id: &str) {}
    fn window_moved(&self, _id: &str) {}
}

/// Coordinates the registry, the platform, and lifecycle events.
///
/// Registry locks are held only for flag reads/writes; every platform call
/// and every event emission happens outside the lock.
pub struct WindowManager {
    registry: Arc<WindowRegistry>,
    platform: Arc<dyn Platform>,
    events: EventSink,
    observer: Mutex<Option<Arc<dyn LifecycleObserver>>>,
}

impl WindowManager {
    pub fn new(
        registry: Arc<WindowRegistry>,
        platform: Arc<dyn Platform>,
        events: EventSink,
    ) -> Self {
        Self {
            registry,
            platform,
            events,
            observer: Mutex::new(None),
        }
    }

    pub fn set_observer(&self, observer: Arc<dyn LifecycleObserver>) {
        *self.observer.lock().unwrap_or_else(|e| e.into_inner()) = Some(observer);
    }

    pub fn registry(&self) -> &Arc<WindowRegistry> {
        &self.registry
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// Create the window handle and its native window, off-screen.
    pub fn create(&self, id: &str, config: WindowConfig) -> Result<(), RegistryError> {
        let size = config.size;
        self.registry.store(PaletteWindow::new(id, config))?;
        let frame = Rect::new(OFFSCREEN.x, OFFSCREEN.y, size.width, size.height);
        if let Err(err) = self.platform.create_window(id, frame) {
            self.registry.remove(id);
            return Err(err);
        }
        info!(id, "window created");
        Ok(())
    }

    pub fn exists(&self, id: &str) -> bool {
        self.registry.exists(id)
    }

    /// Begin the show-after-sized reveal. The window stays off-screen and
    /// invisible to observers until the content layer reports its first size
    /// through [`WindowManager::report_content_size`].
    ///
    /// Showing an already-visible window is a no-op and emits nothing.
    pub fn show(&self, id: &str, at: Option<Point>) -> Result<(), RegistryError> {
        let start_reveal = self.registry.with_window_mut(id, |w| {
            if w.is_destroyed() {
                return Err(RegistryError::Destroyed(w.id.clone()));
            }
            if w.visible {
                return Ok(false);
            }
            w.pending_reveal = true;
            w.pending_origin = at;
            Ok(true)
        })??;

        if start_reveal {
            self.platform.set_origin(id, OFFSCREEN);
            self.platform.show_window(id);
            debug!(id, "pending reveal");
        }
        Ok(())
    }

    /// Synchronous fast-path call from the content layer reporting a content
    /// size.
    ///
    /// The first report after a `show` completes the reveal, strictly in
    /// this order: resize to the reported size, clear `pending_reveal`,
    /// apply the focus policy, then emit `shown`. Observers therefore never
    /// see `shown` with stale geometry. Later reports just resize.
    pub fn report_content_size(
        &self,
        id: &str,
        width: f64,
        height: f64,
    ) -> Result<(), RegistryError> {
        let (clamped_w, clamped_h, revealing, should_focus, origin) =
            self.registry.with_window_mut(id, |w| {
                if w.is_destroyed() {
                    return Err(RegistryError::Destroyed(w.id.clone()));
                }
                let (cw, ch) = w.size.clamp(width, height);
                w.size.width = cw;
                w.size.height = ch;
                Ok((cw, ch, w.pending_reveal, w.should_focus, w.pending_origin))
            })??;

        if revealing {
            let origin = origin.unwrap_or_else(|| self.default_origin(clamped_w, clamped_h));
            self.platform
                .set_frame(id, Rect::new(origin.x, origin.y, clamped_w, clamped_h));

            self.registry.with_window_mut(id, |w| {
                w.pending_reveal = false;
                w.pending_origin = None;
                w.visible = true;
            })?;

            if should_focus {
                self.platform.focus_window(id);
            }

            (self.events)(
                Event::new("visibility", "shown")
                    .window(id)
                    .datum("width", json!(clamped_w))
                    .datum("height", json!(clamped_h)),
            );
            self.notify(|o| o.window_shown(id));
            info!(id, width = clamped_w, height = clamped_h, "window revealed");
        } else {
            let frame = self
                .platform
                .frame(id)
                .unwrap_or_default()
                .with_size(easel_common::Size::new(clamped_w, clamped_h));
            self.platform.set_frame(id, frame);
            self.notify(|o| o.window_moved(id));
        }
        Ok(())
    }

    /// Hide the window. Hiding an already-hidden window is a no-op and emits
    /// nothing. A hide during a pending reveal cancels the reveal.
    pub fn hide(&self, id: &str) -> Result<(), RegistryError> {
        #[derive(PartialEq)]
        enum HideAction {
            Noop,
            CancelReveal,
            Hide,
        }

        let action = self.registry.with_window_mut(id, |w| {
            if w.is_destroyed() {
                return Err(RegistryError::Destroyed(w.id.clone()));
            }
            if w.pending_reveal {
                w.pending_reveal = false;
                w.pending_origin = None;
                return Ok(HideAction::CancelReveal);
            }
            if !w.visible {
                return Ok(HideAction::Noop);
            }
            w.visible = false;
            Ok(HideAction::Hide)
        })??;

        match action {
            HideAction::Noop => {}
            HideAction::CancelReveal => {
                self.platform.hide_window(id);
                debug!(id, "reveal cancelled");
            }
            HideAction::Hide => {
                self.platform.hide_window(id);
                (self.events)(Event::new("visibility", "hidden").window(id));
                self.notify(|o| o.window_hidden(id));
            }
        }
        Ok(())
    }

    /// Destroy the window: flag it, tear down the native window, notify, and
    /// drop the handle.
    pub fn destroy(&self, id: &str) -> Result<(), RegistryError> {
        self.registry.with_window_mut(id, |w| w.mark_destroyed())?;
        self.platform.destroy_window(id);
        (self.events)(Event::new("window", "destroyed").window(id));
        self.notify(|o| o.window_destroyed(id));
        self.registry.remove(id);
        info!(id, "window destroyed");
        Ok(())
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.registry
            .with_window(id, |w| w.visible)
            .unwrap_or(false)
    }

    /// Destroyed, or already gone entirely. In-flight work keyed by id treats
    /// both the same.
    pub fn is_destroyed_or_gone(&self, id: &str) -> bool {
        self.registry.is_destroyed(id) || !self.registry.exists(id)
    }

    pub(crate) fn notify(&self, f: impl FnOnce(&dyn LifecycleObserver)) {
        let observer = self
            .observer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(observer) = observer {
            f(observer.as_ref());
        }
    }

    fn default_origin(&self, width: f64, height: f64) -> Point {
        match self.platform.screen_visible_bounds(0) {
            Some(screen) => Point::new(
                screen.x + (screen.width - width) / 2.0,
                screen.y + (screen.height - height) / 2.0,
            ),
            None => Point::new(0.0, 0.0),
        }
    }
}
