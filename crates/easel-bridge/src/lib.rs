pub mod bridge;
pub mod memory;
pub mod negotiator;
pub mod transport;

pub use bridge::{Bridge, SubscriptionId, DEFAULT_TIMEOUT};
pub use memory::{CommandHandler, MemoryTransport};
pub use negotiator::{
    Negotiator, NegotiationState, MAX_SUPPORTED_VERSION, MIN_SUPPORTED_VERSION, PROTOCOL_VERSION,
};
pub use transport::Transport;
