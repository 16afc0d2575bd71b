//! In-memory [`Platform`] double used by tests across the workspace. Records
//! every mutating call so tests can assert ordering (e.g. resize before the
//! `shown` event).

use std::collections::HashMap;
use std::sync::Mutex;

use easel_common::errors::RegistryError;
use easel_common::{Point, Rect, SnapshotEntry};

use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeWindow {
    pub frame: Rect,
    pub visible: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, Copy)]
struct FakeScreen {
    bounds: Rect,
    visible_bounds: Rect,
    scale: f64,
}

#[derive(Default)]
struct FakeState {
    windows: HashMap<String, FakeWindow>,
    screens: Vec<FakeScreen>,
    cursor: Point,
    active_app: Option<(Rect, String)>,
    ops: Vec<String>,
    fail_snapshot: bool,
}

#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<FakeState>,
}

impl FakePlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.add_screen(
            Rect::new(0.0, 0.0, 1920.0, 1080.0),
            Rect::new(0.0, 0.0, 1920.0, 1040.0),
            1.0,
        );
        platform
    }

    pub fn add_screen(&self, bounds: Rect, visible_bounds: Rect, scale: f64) {
        self.state.lock().unwrap().screens.push(FakeScreen {
            bounds,
            visible_bounds,
            scale,
        });
    }

    /// Plant a live native window directly, bypassing `create_window`. Used
    /// to simulate windows that survived a controller restart.
    pub fn seed_window(&self, id: &str, frame: Rect, visible: bool, focused: bool) {
        self.state.lock().unwrap().windows.insert(
            id.to_string(),
            FakeWindow {
                frame,
                visible,
                focused,
            },
        );
    }

    pub fn window(&self, id: &str) -> Option<FakeWindow> {
        self.state.lock().unwrap().windows.get(id).copied()
    }

    pub fn set_cursor(&self, at: Point) {
        self.state.lock().unwrap().cursor = at;
    }

    pub fn set_active_app(&self, bounds: Rect, identifier: &str) {
        self.state.lock().unwrap().active_app = Some((bounds, identifier.to_string()));
    }

    pub fn fail_snapshot(&self) {
        self.state.lock().unwrap().fail_snapshot = true;
    }

    /// Every mutating call in order, formatted as `"op id"`.
    pub fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }

    fn record(&self, op: String) {
        self.state.lock().unwrap().ops.push(op);
    }
}

impl Platform for FakePlatform {
    fn create_window(&self, id: &str, frame: Rect) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("create {id}"));
        state.windows.insert(
            id.to_string(),
            FakeWindow {
                frame,
                visible: false,
                focused: false,
            },
        );
        Ok(())
    }

    fn destroy_window(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("destroy {id}"));
        state.windows.remove(id);
    }

    fn show_window(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("show {id}"));
        if let Some(window) = state.windows.get_mut(id) {
            window.visible = true;
        }
    }

    fn hide_window(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("hide {id}"));
        if let Some(window) = state.windows.get_mut(id) {
            window.visible = false;
            window.focused = false;
        }
    }

    fn set_frame(&self, id: &str, frame: Rect) {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!(
            "set_frame {id} {}x{}@{},{}",
            frame.width, frame.height, frame.x, frame.y
        ));
        if let Some(window) = state.windows.get_mut(id) {
            window.frame = frame;
        }
    }

    fn set_origin(&self, id: &str, origin: Point) {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("set_origin {id} {},{}", origin.x, origin.y));
        if let Some(window) = state.windows.get_mut(id) {
            window.frame = window.frame.with_origin(origin);
        }
    }

    fn frame(&self, id: &str) -> Option<Rect> {
        self.state.lock().unwrap().windows.get(id).map(|w| w.frame)
    }

    fn is_visible(&self, id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .windows
            .get(id)
            .map(|w| w.visible)
            .unwrap_or(false)
    }

    fn focus_window(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("focus {id}"));
        for (window_id, window) in state.windows.iter_mut() {
            window.focused = window_id == id;
        }
    }

    fn snapshot(&self) -> Result<Vec<SnapshotEntry>, RegistryError> {
        let state = self.state.lock().unwrap();
        if state.fail_snapshot {
            return Err(RegistryError::Platform("snapshot unavailable".into()));
        }
        let mut entries: Vec<SnapshotEntry> = state
            .windows
            .iter()
            .map(|(id, w)| SnapshotEntry {
                id: id.clone(),
                visible: w.visible,
                focused: w.focused,
                x: w.frame.x,
                y: w.frame.y,
                width: w.frame.width,
                height: w.frame.height,
            })
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    fn cursor_position(&self) -> Point {
        self.state.lock().unwrap().cursor
    }

    fn cursor_screen(&self) -> Option<usize> {
        let state = self.state.lock().unwrap();
        let cursor = state.cursor;
        state.screens.iter().position(|screen| {
            cursor.x >= screen.bounds.left()
                && cursor.x < screen.bounds.right()
                && cursor.y >= screen.bounds.top()
                && cursor.y < screen.bounds.bottom()
        })
    }

    fn screen_count(&self) -> usize {
        self.state.lock().unwrap().screens.len()
    }

    fn screen_bounds(&self, index: usize) -> Option<Rect> {
        self.state
            .lock()
            .unwrap()
            .screens
            .get(index)
            .map(|s| s.bounds)
    }

    fn screen_visible_bounds(&self, index: usize) -> Option<Rect> {
        self.state
            .lock()
            .unwrap()
            .screens
            .get(index)
            .map(|s| s.visible_bounds)
    }

    fn screen_scale_factor(&self, index: usize) -> f64 {
        self.state
            .lock()
            .unwrap()
            .screens
            .get(index)
            .map(|s| s.scale)
            .unwrap_or(1.0)
    }

    fn active_app_bounds(&self) -> Option<Rect> {
        self.state.lock().unwrap().active_app.as_ref().map(|(b, _)| *b)
    }

    fn active_app_identifier(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .active_app
            .as_ref()
            .map(|(_, id)| id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_show_hide_roundtrip() {
        let platform = FakePlatform::new();
        platform
            .create_window("w1", Rect::new(0.0, 0.0, 300.0, 200.0))
            .unwrap();
        assert!(!platform.is_visible("w1"));
        platform.show_window("w1");
        assert!(platform.is_visible("w1"));
        platform.hide_window("w1");
        assert!(!platform.is_visible("w1"));
        assert_eq!(platform.ops(), vec!["create w1", "show w1", "hide w1"]);
    }

    #[test]
    fn focus_is_exclusive() {
        let platform = FakePlatform::new();
        platform.create_window("a", Rect::default()).unwrap();
        platform.create_window("b", Rect::default()).unwrap();
        platform.focus_window("a");
        platform.focus_window("b");
        assert!(!platform.window("a").unwrap().focused);
        assert!(platform.window("b").unwrap().focused);
    }

    #[test]
    fn snapshot_lists_seeded_windows_sorted() {
        let platform = FakePlatform::new();
        platform.seed_window("b", Rect::new(1.0, 2.0, 3.0, 4.0), true, false);
        platform.seed_window("a", Rect::default(), false, false);
        let snapshot = platform.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, "a");
        assert_eq!(snapshot[1].id, "b");
        assert!(snapshot[1].visible);
    }

    #[test]
    fn cursor_screen_lookup() {
        let platform = FakePlatform::new();
        platform.add_screen(
            Rect::new(1920.0, 0.0, 1920.0, 1080.0),
            Rect::new(1920.0, 0.0, 1920.0, 1040.0),
            2.0,
        );
        platform.set_cursor(Point::new(2000.0, 500.0));
        assert_eq!(platform.cursor_screen(), Some(1));
        assert_eq!(platform.screen_scale_factor(1), 2.0);
        platform.set_cursor(Point::new(-50.0, 0.0));
        assert_eq!(platform.cursor_screen(), None);
    }
}
