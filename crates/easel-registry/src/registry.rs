//! The window registry: single source of truth for palette window handles.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use easel_common::errors::RegistryError;

use crate::window::PaletteWindow;

/// Exclusive owner of all [`PaletteWindow`] handles, keyed by id.
///
/// One mutex guards the whole table. Accessor closures run inside the lock
/// scope and must stay cheap: no platform I/O, no event callbacks. Callers
/// that need to do either collect what they need first and act after the
/// lock is released.
#[derive(Default)]
pub struct WindowRegistry {
    windows: Mutex<HashMap<String, PaletteWindow>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, window: PaletteWindow) -> Result<(), RegistryError> {
        let mut windows = self.lock();
        if windows.contains_key(&window.id) {
            return Err(RegistryError::AlreadyExists(window.id.clone()));
        }
        windows.insert(window.id.clone(), window);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Option<PaletteWindow> {
        self.lock().remove(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Read a window under the lock.
    pub fn with_window<R>(
        &self,
        id: &str,
        f: impl FnOnce(&PaletteWindow) -> R,
    ) -> Result<R, RegistryError> {
        let windows = self.lock();
        windows
            .get(id)
            .map(f)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Mutate a window under the lock.
    pub fn with_window_mut<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut PaletteWindow) -> R,
    ) -> Result<R, RegistryError> {
        let mut windows = self.lock();
        windows
            .get_mut(id)
            .map(f)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Whether the window exists and has its destroyed flag set.
    pub fn is_destroyed(&self, id: &str) -> bool {
        self.lock().get(id).map(|w| w.is_destroyed()).unwrap_or(false)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PaletteWindow>> {
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }
}
