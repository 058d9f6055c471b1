#![forbid(unsafe_code)]

use std::fmt;

/// Verdict of the scan engine for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Clean,
    UnknownFileType,
    InvalidArgument,
    InternalError,
    Undecided,
    WhiteListed,
    Suspicious,
    Malware,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Clean,
        Status::UnknownFileType,
        Status::InvalidArgument,
        Status::InternalError,
        Status::Undecided,
        Status::WhiteListed,
        Status::Suspicious,
        Status::Malware,
    ];

    /// Whether a report with this status is worth an alert.
    pub fn raises_alert(self) -> bool {
        !matches!(
            self,
            Status::Clean
                | Status::UnknownFileType
                | Status::InvalidArgument
                | Status::InternalError
                | Status::Undecided
                | Status::WhiteListed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Clean => "clean",
            Status::UnknownFileType => "unknown file type",
            Status::InvalidArgument => "invalid argument",
            Status::InternalError => "internal error",
            Status::Undecided => "undecided",
            Status::WhiteListed => "white listed",
            Status::Suspicious => "suspicious",
            Status::Malware => "malware",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scanning a single file, as produced by the scan engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub path: String,
    pub status: Status,
    /// Name of the module that reached the verdict.
    pub module: String,
    /// Module-specific findings, e.g. the matched signature name.
    pub module_report: String,
}

impl Report {
    pub fn new(path: impl Into<String>, status: Status) -> Self {
        Self {
            path: path.into(),
            status,
            module: String::new(),
            module_report: String::new(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>, report: impl Into<String>) -> Self {
        self.module = module.into();
        self.module_report = report.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_detections_raise_alerts() {
        let alerting: Vec<_> = Status::ALL
            .into_iter()
            .filter(|status| status.raises_alert())
            .collect();
        assert_eq!(alerting, vec![Status::Suspicious, Status::Malware]);
    }
}
