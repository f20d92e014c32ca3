//! Client side of the watch face protocol: the channel seam, the state
//! reconciler and the button-edge emitter.

pub mod channel;
pub mod emitter;
pub mod error;
pub mod memory;
pub mod reconciler;
pub mod session;
pub mod ws;

pub use channel::{Channel, Handler, Subscriptions};
pub use emitter::{ButtonEdgeEmitter, ButtonLayout, PointerId, Region};
pub use error::ChannelError;
pub use memory::MemoryChannel;
pub use reconciler::Reconciler;
pub use session::WatchSession;
pub use ws::{ConnectionStatus, WsChannel};

#[cfg(test)]
#[path = "tests/channel_tests.rs"]
mod channel_tests;

#[cfg(test)]
#[path = "tests/ws_tests.rs"]
mod ws_tests;
