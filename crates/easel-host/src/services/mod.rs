//! One module per bridge service. Each service exposes
//! `handle(command, window_id, params)` and returns the wire value or a
//! typed [`easel_common::ServiceError`].

pub mod frame;
pub mod host;
pub mod message;
pub mod snap;
pub mod visibility;
pub mod window;

pub use frame::FrameService;
pub use host::HostService;
pub use message::MessageService;
pub use snap::SnapService;
pub use visibility::VisibilityService;
pub use window::WindowService;
