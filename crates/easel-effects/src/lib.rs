pub mod buffer;
pub mod clock;
pub mod payload;
pub mod registry;

pub use buffer::{AnimationBuffer, ClipPathBuffer, EffectBuffer};
pub use clock::MonotonicClock;
pub use payload::{
    AnimationCurve, AnimationData, Bounds, ClipPathData, PathCommand, MAX_PATH_COMMANDS,
    MAX_PATH_POINTS,
};
pub use registry::EffectBufferRegistry;
