pub mod capabilities;
pub mod errors;
pub mod id;
pub mod params;
pub mod types;
pub mod wire;

pub use capabilities::{Capabilities, CapabilityGate, UnsupportedPolicy};
pub use errors::{
    BridgeError, EaselError, EffectError, ProtocolError, RegistryError, ServiceError, SnapError,
};
pub use id::new_window_id;
pub use types::{Alignment, Anchor, Edge, Point, Rect, Size};
pub use wire::{Command, Event, EventSink, ProtocolReport, SnapshotEntry};

pub type Result<T> = std::result::Result<T, EaselError>;
