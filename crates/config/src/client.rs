use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::path::PathBuf;
use std::time::Duration;

/// Where and how `uhuru-info` reaches the scanner daemon.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Client {
    /// Path of the daemon's Unix domain socket. Used unless `--tcp` is given
    /// on the command line.
    pub socket_path: PathBuf,

    /// Address the daemon listens on when TCP is selected. The daemon only
    /// ever binds to loopback, so this is rarely changed.
    pub tcp_host: String,

    /// TCP port of the daemon.
    pub tcp_port: u16,

    /// Upper bound on establishing the connection. **Measured in seconds**.
    ///
    /// ## Note
    ///
    /// There is no retry: once the timeout elapses the client gives up.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub connect_timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/tmp/.uhuru-daemon"),
            tcp_host: "127.0.0.1".to_string(),
            tcp_port: 14444,
            connect_timeout: Duration::from_secs(10),
        }
    }
}
