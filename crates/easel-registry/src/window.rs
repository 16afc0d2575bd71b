use serde::{Deserialize, Serialize};

/// Size configuration supplied at creation time. Zero min/max means
/// unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeConfig {
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
    pub resizable: bool,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 200.0,
            min_width: 0.0,
            min_height: 0.0,
            max_width: 0.0,
            max_height: 0.0,
            resizable: true,
        }
    }
}

impl SizeConfig {
    /// Clamp a requested size to the configured min/max bounds.
    pub fn clamp(&self, width: f64, height: f64) -> (f64, f64) {
        let mut w = width.max(self.min_width);
        let mut h = height.max(self.min_height);
        if self.max_width > 0.0 {
            w = w.min(self.max_width);
        }
        if self.max_height > 0.0 {
            h = h.min(self.max_height);
        }
        (w, h)
    }
}

/// Per-window behavior flags, supplied by the configuration layer at
/// creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    pub should_focus: bool,
    pub keep_alive: bool,
    pub draggable: bool,
    #[serde(flatten)]
    pub size: SizeConfig,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            should_focus: true,
            keep_alive: false,
            draggable: true,
            size: SizeConfig::default(),
        }
    }
}

/// A palette window handle: the registry-owned record for one native window
/// and its rendering surface.
///
/// All mutation happens inside the registry's lock scope. The `destroyed`
/// flag is monotonic — once set it never clears, and any closure still
/// holding this window's id must check it before acting.
#[derive(Debug, Clone)]
pub struct PaletteWindow {
    pub id: String,
    pub visible: bool,
    pub pending_reveal: bool,
    /// Where the reveal will place the window; `None` falls back to the
    /// primary screen center.
    pub pending_origin: Option<easel_common::Point>,
    pub should_focus: bool,
    pub keep_alive: bool,
    pub draggable: bool,
    pub size: SizeConfig,
    destroyed: bool,
}

impl PaletteWindow {
    pub fn new(id: impl Into<String>, config: WindowConfig) -> Self {
        Self {
            id: id.into(),
            visible: false,
            pending_reveal: false,
            pending_origin: None,
            should_focus: config.should_focus,
            keep_alive: config.keep_alive,
            draggable: config.draggable,
            size: config.size,
            destroyed: false,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark destroyed. Irreversible.
    pub fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}
