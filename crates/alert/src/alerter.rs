#![forbid(unsafe_code)]

use crate::clock::{Clock, SystemClock};
use crate::document::AlertDocument;
use crate::error::Error;
use crate::identification::{HostProbe, SystemProbe};
use crate::report::Report;
use crate::transport::{AlertTransport, transport_from_config};
use tracing::{error, info, trace};

/// What [`Alerter::on_report`] did with a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Benign status, nothing was built or sent.
    Suppressed,
    Sent,
    /// Building or delivering the alert failed; it is gone.
    Dropped,
}

pub struct Alerter {
    probe: Box<dyn HostProbe>,
    clock: Box<dyn Clock>,
    transport: Box<dyn AlertTransport>,
}

impl Alerter {
    pub fn new(
        probe: Box<dyn HostProbe>,
        clock: Box<dyn Clock>,
        transport: Box<dyn AlertTransport>,
    ) -> Self {
        Self {
            probe,
            clock,
            transport,
        }
    }

    /// Alerter identifying the real host, stamping with the system clock and
    /// delivering through the configured transport.
    pub fn from_config(config: &config::Alert) -> Result<Self, Error> {
        Ok(Self::new(
            Box::new(SystemProbe::new(config.os.clone())),
            Box::new(SystemClock),
            transport_from_config(config)?,
        ))
    }

    /// Report callback: alert on anything that is not a benign outcome.
    ///
    /// Never fails. Delivery errors are logged and the alert is dropped
    /// without retry.
    pub async fn on_report(&self, report: &Report) -> AlertOutcome {
        if !report.status.raises_alert() {
            trace!(path = %report.path, status = %report.status, "no alert");
            return AlertOutcome::Suppressed;
        }

        let document = AlertDocument::new(report, self.clock.now(), self.probe.identify());
        let xml = match document.to_xml() {
            Ok(xml) => xml,
            Err(err) => {
                error!(%err, path = %report.path, "failed to build alert document");
                return AlertOutcome::Dropped;
            }
        };

        match self.transport.send(&xml).await {
            Ok(()) => {
                info!(
                    path = %report.path,
                    status = %report.status,
                    module = %report.module,
                    "alert sent"
                );
                AlertOutcome::Sent
            }
            Err(err) => {
                error!(%err, path = %report.path, "failed to send alert, dropping it");
                AlertOutcome::Dropped
            }
        }
    }
}
