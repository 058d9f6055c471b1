#![forbid(unsafe_code)]

//! Framed message exchange between the scanner daemon and its clients.

pub mod codec;
pub mod connect;
mod error;
pub mod manager;
mod message;

pub use codec::{IpcCodec, MAX_FRAME_LEN};
pub use connect::{BoxedStream, Endpoint, connect};
pub use error::Error;
pub use manager::{Flow, Handler, IpcManager};
pub use message::{Arg, ArgType, Message, MsgId};
