//! Frame operations: anchored positioning, sizing, bounds queries.

use tracing::debug;

use easel_common::errors::RegistryError;
use easel_common::{Anchor, Point, Rect, Size};

use crate::lifecycle::WindowManager;

impl WindowManager {
    /// Move the window so that `anchor` lands on `at`.
    pub fn set_position(&self, id: &str, at: Point, anchor: Anchor) -> Result<(), RegistryError> {
        self.ensure_live(id)?;
        let frame = self.native_frame(id)?;
        let origin = anchor.resolve(at, frame.size());
        debug!(id, x = origin.x, y = origin.y, ?anchor, "set_position");
        self.platform().set_origin(id, origin);
        self.notify(|o| o.window_moved(id));
        Ok(())
    }

    /// Resize in place, clamped to the window's size config.
    pub fn set_size(&self, id: &str, width: f64, height: f64) -> Result<(), RegistryError> {
        let (w, h) = self.registry().with_window_mut(id, |window| {
            if window.is_destroyed() {
                return Err(RegistryError::Destroyed(window.id.clone()));
            }
            let clamped = window.size.clamp(width, height);
            window.size.width = clamped.0;
            window.size.height = clamped.1;
            Ok(clamped)
        })??;
        let frame = self.native_frame(id)?;
        self.platform().set_frame(id, frame.with_size(Size::new(w, h)));
        self.notify(|o| o.window_moved(id));
        Ok(())
    }

    pub fn set_bounds(&self, id: &str, bounds: Rect) -> Result<(), RegistryError> {
        let (w, h) = self.registry().with_window_mut(id, |window| {
            if window.is_destroyed() {
                return Err(RegistryError::Destroyed(window.id.clone()));
            }
            let clamped = window.size.clamp(bounds.width, bounds.height);
            window.size.width = clamped.0;
            window.size.height = clamped.1;
            Ok(clamped)
        })??;
        self.platform()
            .set_frame(id, Rect::new(bounds.x, bounds.y, w, h));
        self.notify(|o| o.window_moved(id));
        Ok(())
    }

    pub fn bounds(&self, id: &str) -> Result<Rect, RegistryError> {
        self.ensure_live(id)?;
        self.native_frame(id)
    }

    pub fn position(&self, id: &str) -> Result<Point, RegistryError> {
        Ok(self.bounds(id)?.origin())
    }

    pub fn size(&self, id: &str) -> Result<Size, RegistryError> {
        Ok(self.bounds(id)?.size())
    }

    pub fn set_draggable(&self, id: &str, draggable: bool) -> Result<(), RegistryError> {
        self.registry()
            .with_window_mut(id, |w| w.draggable = draggable)
    }

    pub fn is_draggable(&self, id: &str) -> bool {
        self.registry()
            .with_window(id, |w| w.draggable)
            .unwrap_or(false)
    }

    fn ensure_live(&self, id: &str) -> Result<(), RegistryError> {
        self.registry().with_window(id, |w| {
            if w.is_destroyed() {
                Err(RegistryError::Destroyed(w.id.clone()))
            } else {
                Ok(())
            }
        })?
    }

    fn native_frame(&self, id: &str) -> Result<Rect, RegistryError> {
        self.platform()
            .frame(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }
}
