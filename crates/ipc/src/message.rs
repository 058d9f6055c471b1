use crate::error::Error;
use std::fmt;

/// Message identifier, the first byte of every frame.
///
/// Kept open rather than an enum: ids a peer does not know about must still
/// decode so they can be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MsgId(pub u8);

impl MsgId {
    /// Client request for daemon status. Carries no arguments.
    pub const INFO: Self = Self(6);
    /// One module's status, followed by its signature bases.
    pub const INFO_MODULE: Self = Self(7);
    /// Last info message, carrying the global update status.
    pub const INFO_END: Self = Self(8);

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::INFO => Some("INFO"),
            Self::INFO_MODULE => Some("INFO_MODULE"),
            Self::INFO_END => Some("INFO_END"),
            _ => None,
        }
    }
}

impl fmt::Display for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "#{}", self.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Int32,
    String,
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32 => f.write_str("int32"),
            Self::String => f.write_str("string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int32(i32),
    Str(String),
}

impl Arg {
    pub fn arg_type(&self) -> ArgType {
        match self {
            Self::Int32(_) => ArgType::Int32,
            Self::Str(_) => ArgType::String,
        }
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MsgId,
    args: Vec<Arg>,
}

impl Message {
    pub fn new(id: MsgId) -> Self {
        Self {
            id,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<Arg>) -> Self {
        self.push(arg);
        self
    }

    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.args.push(arg.into());
    }

    pub fn id(&self) -> MsgId {
        self.id
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn argc(&self) -> usize {
        self.args.len()
    }

    pub fn int32_at(&self, index: usize) -> Result<i32, Error> {
        match self.arg_at(index)? {
            Arg::Int32(value) => Ok(*value),
            other => Err(self.type_mismatch(index, ArgType::Int32, other)),
        }
    }

    pub fn str_at(&self, index: usize) -> Result<&str, Error> {
        match self.arg_at(index)? {
            Arg::Str(value) => Ok(value),
            other => Err(self.type_mismatch(index, ArgType::String, other)),
        }
    }

    fn arg_at(&self, index: usize) -> Result<&Arg, Error> {
        self.args.get(index).ok_or(Error::MissingArg { id: self.id, index })
    }

    fn type_mismatch(&self, index: usize, expected: ArgType, found: &Arg) -> Error {
        Error::ArgType {
            id: self.id,
            index,
            expected,
            found: found.arg_type(),
        }
    }
}
