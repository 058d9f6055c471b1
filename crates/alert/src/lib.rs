#![forbid(unsafe_code)]

//! Alerts for scan reports that are not benign.
//!
//! [`Alerter::on_report`] is the callback the scan engine invokes once per
//! scanned file. It filters out benign outcomes, renders an
//! [`AlertDocument`] and hands it to an [`AlertTransport`]. Delivery is
//! fire-and-forget: failures are logged and the alert is dropped.

pub mod alerter;
pub mod clock;
pub mod document;
mod error;
pub mod identification;
pub mod report;
pub mod transport;

pub use alerter::{AlertOutcome, Alerter};
pub use clock::{Clock, SystemClock};
pub use document::AlertDocument;
pub use error::Error;
pub use identification::{HostProbe, Identification, SystemProbe};
pub use report::{Report, Status};
pub use transport::{
    AlertTransport, HttpTransport, NoopTransport, UnixSocketTransport, transport_from_config,
};
