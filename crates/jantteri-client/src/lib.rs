// jantteri-client: Async WebSocket transport for the Jantteri game controller

pub mod error;
pub mod frame;
pub mod socket;

pub use error::Error;
pub use frame::Frame;
pub use socket::{ConnectionId, Socket, SocketStatus};
