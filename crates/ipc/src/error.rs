use crate::message::{ArgType, MsgId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on IPC channel: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown argument type tag {0:#04x}")]
    UnknownTag(u8),

    #[error("String argument is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("String argument contains a NUL byte")]
    EmbeddedNul,

    #[error("Frame exceeds {max} bytes without terminator")]
    FrameTooLarge { max: usize },

    #[error("Channel closed in the middle of a frame")]
    TruncatedFrame,

    #[error("Message {id} has no argument at index {index}")]
    MissingArg { id: MsgId, index: usize },

    #[error("Message {id} argument {index}: expected {expected}, found {found}")]
    ArgType {
        id: MsgId,
        index: usize,
        expected: ArgType,
        found: ArgType,
    },

    #[error("Malformed message {id}: {reason}")]
    Malformed { id: MsgId, reason: String },
}
