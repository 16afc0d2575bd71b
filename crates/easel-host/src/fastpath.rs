//! The synchronous fast path consumed by the content layer: sizing, screen
//! and cursor queries, and effect buffer lifecycle. These calls bypass the
//! bridge — they run at frame cadence or gate the reveal sequence, where a
//! round-trip would be too slow.

use std::sync::Arc;

use easel_common::errors::{EffectError, RegistryError};
use easel_common::{Point, Rect};
use easel_effects::{AnimationBuffer, ClipPathBuffer, EffectBufferRegistry};
use easel_registry::WindowManager;

pub struct FastPath {
    manager: Arc<WindowManager>,
    effects: Arc<EffectBufferRegistry>,
}

impl FastPath {
    pub fn new(manager: Arc<WindowManager>, effects: Arc<EffectBufferRegistry>) -> Self {
        Self { manager, effects }
    }

    // Window sizing (drives the reveal sequence on first report).

    pub fn resize(&self, window_id: &str, width: f64, height: f64) -> Result<(), RegistryError> {
        self.manager.report_content_size(window_id, width, height)
    }

    pub fn frame(&self, window_id: &str) -> Option<Rect> {
        self.manager.platform().frame(window_id)
    }

    pub fn is_visible(&self, window_id: &str) -> bool {
        self.manager.is_visible(window_id)
    }

    // Cursor.

    pub fn cursor_position(&self) -> Point {
        self.manager.platform().cursor_position()
    }

    pub fn cursor_screen(&self) -> Option<usize> {
        self.manager.platform().cursor_screen()
    }

    // Screens.

    pub fn screen_count(&self) -> usize {
        self.manager.platform().screen_count()
    }

    pub fn screen_bounds(&self, index: usize) -> Option<Rect> {
        self.manager.platform().screen_bounds(index)
    }

    pub fn screen_visible_bounds(&self, index: usize) -> Option<Rect> {
        self.manager.platform().screen_visible_bounds(index)
    }

    pub fn screen_scale_factor(&self, index: usize) -> f64 {
        self.manager.platform().screen_scale_factor(index)
    }

    // Active application.

    pub fn active_app_bounds(&self) -> Option<Rect> {
        self.manager.platform().active_app_bounds()
    }

    pub fn active_app_identifier(&self) -> Option<String> {
        self.manager.platform().active_app_identifier()
    }

    // Effect buffers and the shared clock.

    pub fn create_clip_buffer(
        &self,
        window_id: &str,
        layer_id: i32,
    ) -> Result<Arc<ClipPathBuffer>, EffectError> {
        self.effects.create_clip_buffer(window_id, layer_id)
    }

    pub fn destroy_clip_buffer(&self, window_id: &str, layer_id: i32) -> Result<(), EffectError> {
        self.effects.destroy_clip_buffer(window_id, layer_id)
    }

    pub fn create_animation_buffer(
        &self,
        window_id: &str,
        layer_id: i32,
    ) -> Result<Arc<AnimationBuffer>, EffectError> {
        self.effects.create_animation_buffer(window_id, layer_id)
    }

    pub fn destroy_animation_buffer(
        &self,
        window_id: &str,
        layer_id: i32,
    ) -> Result<(), EffectError> {
        self.effects.destroy_animation_buffer(window_id, layer_id)
    }

    /// Current time on the clock the compositor schedules frames against.
    pub fn now(&self) -> f64 {
        self.effects.clock().now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_common::EventSink;
    use easel_registry::{FakePlatform, Platform, WindowConfig, WindowRegistry};

    fn fast_path() -> (FastPath, Arc<FakePlatform>) {
        let platform = Arc::new(FakePlatform::new());
        let sink: EventSink = Arc::new(|_| {});
        let manager = Arc::new(WindowManager::new(
            Arc::new(WindowRegistry::new()),
            Arc::clone(&platform) as Arc<dyn Platform>,
            sink,
        ));
        (
            FastPath::new(manager, Arc::new(EffectBufferRegistry::new())),
            platform,
        )
    }

    #[test]
    fn resize_completes_a_reveal() {
        let (fast, _) = fast_path();
        fast.manager.create("w1", WindowConfig::default()).unwrap();
        fast.manager.show("w1", Some(Point::new(10.0, 10.0))).unwrap();
        assert!(!fast.is_visible("w1"));

        fast.resize("w1", 320.0, 240.0).unwrap();
        assert!(fast.is_visible("w1"));
        assert_eq!(fast.frame("w1").unwrap(), Rect::new(10.0, 10.0, 320.0, 240.0));
    }

    #[test]
    fn screen_queries_pass_through() {
        let (fast, platform) = fast_path();
        platform.add_screen(
            Rect::new(1920.0, 0.0, 1280.0, 720.0),
            Rect::new(1920.0, 0.0, 1280.0, 700.0),
            1.5,
        );
        assert_eq!(fast.screen_count(), 2);
        assert_eq!(
            fast.screen_bounds(1).unwrap(),
            Rect::new(1920.0, 0.0, 1280.0, 720.0)
        );
        assert_eq!(fast.screen_scale_factor(1), 1.5);
        assert!(fast.screen_bounds(9).is_none());
    }

    #[test]
    fn cursor_and_active_app_queries() {
        let (fast, platform) = fast_path();
        platform.set_cursor(Point::new(640.0, 480.0));
        platform.set_active_app(Rect::new(0.0, 0.0, 800.0, 600.0), "com.example.editor");

        assert_eq!(fast.cursor_position(), Point::new(640.0, 480.0));
        assert_eq!(fast.cursor_screen(), Some(0));
        assert_eq!(
            fast.active_app_identifier().as_deref(),
            Some("com.example.editor")
        );
        assert_eq!(fast.active_app_bounds().unwrap().width, 800.0);
    }

    #[test]
    fn buffer_lifecycle_and_clock() {
        let (fast, _) = fast_path();
        let buffer = fast.create_animation_buffer("w1", 0).unwrap();
        assert_eq!(buffer.sequence(), 0);
        fast.destroy_animation_buffer("w1", 0).unwrap();
        assert!(fast.destroy_animation_buffer("w1", 0).is_err());

        let a = fast.now();
        let b = fast.now();
        assert!(b >= a);
    }
}
