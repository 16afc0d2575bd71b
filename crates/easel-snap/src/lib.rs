pub mod binding;
pub mod coordinator;
pub mod events;
pub mod proximity;
pub mod surface;

pub use binding::{
    AutoSnapConfig, BindingMode, OnTargetDestroyed, OnTargetHidden, SnapBinding,
    DEFAULT_PROXIMITY_THRESHOLD, DEFAULT_SNAP_GAP,
};
pub use coordinator::{DragSession, SnapCoordinator};
pub use events::{SnapEvent, SnapEventSink};
pub use proximity::ProximityMatch;
pub use surface::SnapSurface;
