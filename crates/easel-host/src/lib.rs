//! The native-side host: wires the window registry, the snap coordinator,
//! and the effect buffers behind the service router that handles every
//! bridge command.

pub mod fastpath;
pub mod router;
pub mod runtime;
pub mod services;

pub use fastpath::FastPath;
pub use router::ServiceRouter;
pub use runtime::HostRuntime;
