use serde::{Deserialize, Serialize};

/// How alerts leave the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportKind {
    /// Multipart HTTP POST to the local alert listener.
    #[default]
    #[serde(rename = "http")]
    Http,

    /// Write the document to a Unix domain socket and close it.
    #[serde(rename = "unix")]
    Unix,

    /// Alerts are built but never sent.
    #[serde(rename = "none")]
    None,
}
