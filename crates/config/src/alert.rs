use crate::transport::TransportKind;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::path::PathBuf;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Alert {
    /// Which transport delivers alert documents.
    ///
    /// See [`TransportKind`] for possible values.
    pub transport: TransportKind,

    /// Endpoint of the alert listener for the HTTP transport. The document
    /// is posted as a multipart form with a single field named `xml`.
    pub url: String,

    /// User agent announced by the HTTP transport.
    pub user_agent: String,

    /// Socket the Unix transport writes documents to.
    pub socket_path: PathBuf,

    /// Connect timeout of either transport. **Measured in seconds**.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub connect_timeout: Duration,

    /// Operating system label reported in the `identification` block.
    pub os: String,
}

impl Default for Alert {
    fn default() -> Self {
        Self {
            transport: TransportKind::Http,
            url: "http://127.0.0.1:10083/".to_string(),
            user_agent: "libumwsu/1.0".to_string(),
            socket_path: PathBuf::from("/var/tmp/davfi_alert.s"),
            connect_timeout: Duration::from_secs(10),
            os: "Linux".to_string(),
        }
    }
}
