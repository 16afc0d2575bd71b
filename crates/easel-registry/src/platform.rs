//! The seam to the native window layer.

use easel_common::errors::RegistryError;
use easel_common::{Point, Rect, SnapshotEntry};

/// Native window and screen operations, resolved once at startup.
///
/// Implementations are platform-conditional and multi-threaded on the native
/// side: window-mutating calls are marshalled onto the owning UI thread by
/// the implementation; query calls may run from background threads.
pub trait Platform: Send + Sync {
    /// Create the native window off-screen (no visual impact until shown).
    fn create_window(&self, id: &str, frame: Rect) -> Result<(), RegistryError>;

    /// Tear the native window down. Idempotent.
    fn destroy_window(&self, id: &str);

    fn show_window(&self, id: &str);

    fn hide_window(&self, id: &str);

    fn set_frame(&self, id: &str, frame: Rect);

    fn set_origin(&self, id: &str, origin: Point);

    fn frame(&self, id: &str) -> Option<Rect>;

    fn is_visible(&self, id: &str) -> bool;

    /// Escalate the window to accept keyboard input and activate the owning
    /// process.
    fn focus_window(&self, id: &str);

    /// Snapshot of every live native window, for hot-restart recovery.
    fn snapshot(&self) -> Result<Vec<SnapshotEntry>, RegistryError>;

    // Screen / cursor queries (the synchronous fast-path surface).

    fn cursor_position(&self) -> Point;

    /// Index of the screen under the cursor, if any.
    fn cursor_screen(&self) -> Option<usize>;

    fn screen_count(&self) -> usize;

    fn screen_bounds(&self, index: usize) -> Option<Rect>;

    /// Screen bounds minus taskbars/docks/menu bars.
    fn screen_visible_bounds(&self, index: usize) -> Option<Rect>;

    fn screen_scale_factor(&self, index: usize) -> f64;

    fn active_app_bounds(&self) -> Option<Rect>;

    fn active_app_identifier(&self) -> Option<String>;
}
