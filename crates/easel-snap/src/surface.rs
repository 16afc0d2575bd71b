use easel_common::{Point, Rect};

/// What the snap coordinator needs from the window layer.
///
/// The coordinator reads window state through this trait and commits
/// position changes back through it; it never owns window handles itself.
/// `hide` must be idempotent with respect to notifications (hiding an
/// already-hidden window must not re-notify the coordinator) or hide
/// cascades over mutual bindings would never terminate.
pub trait SnapSurface: Send + Sync {
    fn frame(&self, id: &str) -> Option<Rect>;

    fn set_origin(&self, id: &str, origin: Point);

    fn is_visible(&self, id: &str) -> bool;

    fn hide(&self, id: &str);

    /// Whether the window is destroyed or gone. Drag sessions touching such
    /// a window are cancelled.
    fn is_destroyed(&self, id: &str) -> bool;
}
