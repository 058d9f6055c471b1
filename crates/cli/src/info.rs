#![forbid(unsafe_code)]

//! Status information reported by the daemon, and its decoding from the
//! `INFO_MODULE` / `INFO_END` message sequence.

use ipc::{Error, Flow, Handler, Message, MsgId};
use std::fmt;
use tracing::{debug, trace};

/// Freshness of a module's signature bases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateStatus {
    #[default]
    NonAvailable,
    Ok,
    Late,
    Critical,
}

impl UpdateStatus {
    /// Unknown wire values are treated as "non available".
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => Self::Ok,
            2 => Self::Late,
            3 => Self::Critical,
            _ => Self::NonAvailable,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonAvailable => "non available",
            Self::Ok => "ok",
            Self::Late => "late",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signature base loaded by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseInfo {
    pub name: String,
    pub date: String,
    pub version: String,
    pub signature_count: u32,
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub status: UpdateStatus,
    pub update_date: String,
    pub bases: Vec<BaseInfo>,
}

// name, update status, update date
const MODULE_ARGS: usize = 3;
// name, date, version, signature count, full path
const BASE_ARGS: usize = 5;

impl ModuleInfo {
    /// Decode an `INFO_MODULE` message.
    pub fn from_message(message: &Message) -> Result<Self, Error> {
        let argc = message.argc();
        if argc < MODULE_ARGS || (argc - MODULE_ARGS) % BASE_ARGS != 0 {
            return Err(Error::Malformed {
                id: message.id(),
                reason: format!(
                    "{argc} arguments, expected {MODULE_ARGS} plus {BASE_ARGS} per base"
                ),
            });
        }

        let bases = (MODULE_ARGS..argc)
            .step_by(BASE_ARGS)
            .map(|at| base_at(message, at))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: message.str_at(0)?.to_owned(),
            status: UpdateStatus::from_wire(message.int32_at(1)?),
            update_date: message.str_at(2)?.to_owned(),
            bases,
        })
    }
}

fn base_at(message: &Message, at: usize) -> Result<BaseInfo, Error> {
    let signature_count = message.int32_at(at + 3)?;
    let signature_count = u32::try_from(signature_count).map_err(|_| Error::Malformed {
        id: message.id(),
        reason: format!("negative signature count {signature_count}"),
    })?;

    Ok(BaseInfo {
        name: message.str_at(at)?.to_owned(),
        date: message.str_at(at + 1)?.to_owned(),
        version: message.str_at(at + 2)?.to_owned(),
        signature_count,
        full_path: message.str_at(at + 4)?.to_owned(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    pub global_status: UpdateStatus,
    pub modules: Vec<ModuleInfo>,
}

/// Accumulates [`Info`] from the daemon's responses.
#[derive(Debug, Default)]
pub struct InfoCollector {
    info: Info,
    complete: bool,
}

impl InfoCollector {
    /// Whether `INFO_END` has been received.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn finish(self) -> Info {
        self.info
    }
}

impl Handler for InfoCollector {
    fn handle(&mut self, message: &Message) -> Result<Flow, Error> {
        match message.id() {
            MsgId::INFO_MODULE => {
                let module = ModuleInfo::from_message(message)?;
                trace!(name = %module.name, bases = module.bases.len(), "module info");
                self.info.modules.push(module);
                Ok(Flow::Continue)
            }
            MsgId::INFO_END => {
                self.info.global_status = UpdateStatus::from_wire(message.int32_at(0)?);
                self.complete = true;
                Ok(Flow::Stop)
            }
            other => {
                debug!(id = %other, "ignoring unexpected message");
                Ok(Flow::Continue)
            }
        }
    }
}
