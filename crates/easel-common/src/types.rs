use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Coordinate of the given edge along its perpendicular axis.
    pub fn edge(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top(),
            Edge::Bottom => self.bottom(),
            Edge::Left => self.left(),
            Edge::Right => self.right(),
        }
    }

    pub fn with_origin(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    pub fn with_size(&self, size: Size) -> Self {
        Self::new(self.x, self.y, size.width, size.height)
    }

    /// Overlap length with `other` along the horizontal axis (<= 0 means none).
    pub fn horizontal_overlap(&self, other: &Rect) -> f64 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Overlap length with `other` along the vertical axis (<= 0 means none).
    pub fn vertical_overlap(&self, other: &Rect) -> f64 {
        self.bottom().min(other.bottom()) - self.top().max(other.top())
    }
}

/// A window edge. Used for snap geometry; screen coordinates are top-down
/// (y = 0 at the top), so `Top` is the smaller y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges, in a fixed order. Iterate this instead of a set when the
    /// visit order must be deterministic.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// The facing edge: top↔bottom, left↔right.
    pub fn opposite(&self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
        }
    }

    /// Whether this edge runs horizontally (top/bottom).
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Edge> {
        match s {
            "top" => Some(Edge::Top),
            "bottom" => Some(Edge::Bottom),
            "left" => Some(Edge::Left),
            "right" => Some(Edge::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment of a snapped follower along the axis perpendicular to the snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Leading,
    #[default]
    Center,
    Trailing,
}

impl Alignment {
    pub fn parse(s: &str) -> Option<Alignment> {
        match s {
            "leading" => Some(Alignment::Leading),
            "center" => Some(Alignment::Center),
            "trailing" => Some(Alignment::Trailing),
            _ => None,
        }
    }
}

/// Anchor point used when positioning a window: the given coordinates refer
/// to this point of the window rather than its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub fn parse(s: &str) -> Option<Anchor> {
        match s {
            "topLeft" => Some(Anchor::TopLeft),
            "topCenter" => Some(Anchor::TopCenter),
            "topRight" => Some(Anchor::TopRight),
            "centerLeft" => Some(Anchor::CenterLeft),
            "center" => Some(Anchor::Center),
            "centerRight" => Some(Anchor::CenterRight),
            "bottomLeft" => Some(Anchor::BottomLeft),
            "bottomCenter" => Some(Anchor::BottomCenter),
            "bottomRight" => Some(Anchor::BottomRight),
            _ => None,
        }
    }

    /// Resolve an anchored position to a top-left origin for a window of
    /// `size`.
    pub fn resolve(&self, at: Point, size: Size) -> Point {
        let (w, h) = (size.width, size.height);
        let (dx, dy) = match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter => (w / 2.0, 0.0),
            Anchor::TopRight => (w, 0.0),
            Anchor::CenterLeft => (0.0, h / 2.0),
            Anchor::Center => (w / 2.0, h / 2.0),
            Anchor::CenterRight => (w, h / 2.0),
            Anchor::BottomLeft => (0.0, h),
            Anchor::BottomCenter => (w / 2.0, h),
            Anchor::BottomRight => (w, h),
        };
        Point::new(at.x - dx, at.y - dy)
    }
}
