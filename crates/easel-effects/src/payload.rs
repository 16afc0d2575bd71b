//! Fixed-size payloads for the high-frequency buffer path. Everything here
//! is `Copy` so a buffer write is a plain memory copy with no allocation on
//! either side of the producer/consumer pair.

/// Capacity of a clip path, in commands.
pub const MAX_PATH_COMMANDS: usize = 256;

/// Capacity of a clip path, in (x, y) points.
pub const MAX_PATH_POINTS: usize = 512;

/// One path verb. Mirrors the content layer's path operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    CubicTo {
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    },
    Close,
}

impl PathCommand {
    fn verb(&self) -> u8 {
        match self {
            PathCommand::MoveTo { .. } => 0,
            PathCommand::LineTo { .. } => 1,
            PathCommand::QuadTo { .. } => 2,
            PathCommand::CubicTo { .. } => 3,
            PathCommand::Close => 4,
        }
    }

    fn point_count(verb: u8) -> usize {
        match verb {
            0 | 1 => 1,
            2 => 2,
            3 => 3,
            _ => 0,
        }
    }
}

/// Clip geometry for one window layer: a command stream plus its flattened
/// point list, and the window height for producers whose Y axis is flipped
/// relative to the compositor's.
#[derive(Clone, Copy)]
pub struct ClipPathData {
    pub command_count: u32,
    pub commands: [u8; MAX_PATH_COMMANDS],
    pub point_count: u32,
    pub points: [f32; MAX_PATH_POINTS * 2],
    pub window_height: f32,
}

impl Default for ClipPathData {
    fn default() -> Self {
        Self {
            command_count: 0,
            commands: [0; MAX_PATH_COMMANDS],
            point_count: 0,
            points: [0.0; MAX_PATH_POINTS * 2],
            window_height: 0.0,
        }
    }
}

impl ClipPathData {
    /// Encode a command stream. Commands past the fixed capacity are
    /// truncated.
    pub fn encode(commands: &[PathCommand], window_height: f32) -> Self {
        let mut data = Self {
            window_height,
            ..Default::default()
        };
        for command in commands {
            if data.command_count as usize >= MAX_PATH_COMMANDS {
                break;
            }
            let points: &[f32] = match command {
                PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => &[*x, *y],
                PathCommand::QuadTo { cx, cy, x, y } => &[*cx, *cy, *x, *y],
                PathCommand::CubicTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                } => &[*c1x, *c1y, *c2x, *c2y, *x, *y],
                PathCommand::Close => &[],
            };
            if (data.point_count as usize * 2 + points.len()) > MAX_PATH_POINTS * 2 {
                break;
            }
            data.commands[data.command_count as usize] = command.verb();
            data.command_count += 1;
            for chunk in points.chunks(2) {
                let at = data.point_count as usize * 2;
                data.points[at] = chunk[0];
                data.points[at + 1] = chunk[1];
                data.point_count += 1;
            }
        }
        data
    }

    /// Decode back into a command stream. Unknown verbs end the decode.
    pub fn decode(&self) -> Vec<PathCommand> {
        let mut commands = Vec::with_capacity(self.command_count as usize);
        let mut point = 0usize;
        for i in 0..self.command_count as usize {
            let verb = self.commands[i];
            let needed = PathCommand::point_count(verb);
            if verb > 4 || point + needed > self.point_count as usize {
                break;
            }
            let p = |n: usize| {
                let at = (point + n) * 2;
                (self.points[at], self.points[at + 1])
            };
            let command = match verb {
                0 => {
                    let (x, y) = p(0);
                    PathCommand::MoveTo { x, y }
                }
                1 => {
                    let (x, y) = p(0);
                    PathCommand::LineTo { x, y }
                }
                2 => {
                    let (cx, cy) = p(0);
                    let (x, y) = p(1);
                    PathCommand::QuadTo { cx, cy, x, y }
                }
                3 => {
                    let (c1x, c1y) = p(0);
                    let (c2x, c2y) = p(1);
                    let (x, y) = p(2);
                    PathCommand::CubicTo {
                        c1x,
                        c1y,
                        c2x,
                        c2y,
                        x,
                        y,
                    }
                }
                _ => PathCommand::Close,
            };
            point += needed;
            commands.push(command);
        }
        commands
    }
}

/// Interpolation curve for native-driven animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationCurve {
    Linear,
    EaseOut,
    #[default]
    EaseOutCubic,
    EaseInOut,
}

impl AnimationCurve {
    /// Evaluate the curve at `t` in [0, 1].
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            AnimationCurve::Linear => t,
            AnimationCurve::EaseOut => 1.0 - (1.0 - t).powi(2),
            AnimationCurve::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            AnimationCurve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Compact bounds used inside animation payloads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn lerp(a: Bounds, b: Bounds, t: f64) -> Bounds {
        let t = t as f32;
        Bounds {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            width: a.width + (b.width - a.width) * t,
            height: a.height + (b.height - a.height) * t,
        }
    }
}

/// Animation parameters written once at animation start; the consumer
/// interpolates at display refresh rate. `start_time` is stamped from the
/// shared monotonic clock so producer and consumer agree on phase.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationData {
    pub animating: bool,
    pub curve: AnimationCurve,
    pub start_bounds: Bounds,
    pub target_bounds: Bounds,
    pub corner_radius: f32,
    pub start_time: f64,
    pub duration: f64,
    pub window_height: f32,
}

impl AnimationData {
    /// Consumer-side evaluation at clock time `now`.
    pub fn bounds_at(&self, now: f64) -> Bounds {
        if !self.animating || self.duration <= 0.0 {
            return self.target_bounds;
        }
        let t = (now - self.start_time) / self.duration;
        Bounds::lerp(self.start_bounds, self.target_bounds, self.curve.evaluate(t))
    }

    pub fn is_finished(&self, now: f64) -> bool {
        !self.animating || now >= self.start_time + self.duration
    }
}
