pub mod fake;
pub mod frames;
pub mod lifecycle;
pub mod platform;
pub mod recovery;
pub mod registry;
pub mod window;

pub use fake::FakePlatform;
pub use lifecycle::{LifecycleObserver, WindowManager};
pub use platform::Platform;
pub use recovery::RecoveryStats;
pub use registry::WindowRegistry;
pub use window::{PaletteWindow, SizeConfig, WindowConfig};
