#![forbid(unsafe_code)]

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};
use tracing::debug;

/// Any connected byte stream the manager can run over.
pub trait Stream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Stream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

pub type BoxedStream = Box<dyn Stream>;

/// Address of the daemon's listening socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Tcp { host: String, port: u16 },
    Unix(PathBuf),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// Connect to `endpoint`, giving up after `timeout`.
///
/// An elapsed timeout is reported as `ETIMEDOUT` so callers can always show
/// an OS error number.
pub async fn connect(endpoint: &Endpoint, timeout: Duration) -> io::Result<BoxedStream> {
    debug!(%endpoint, ?timeout, "connecting");

    let connecting = async {
        match endpoint {
            Endpoint::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port)).await?;
                stream.set_nodelay(true)?;
                Ok::<_, io::Error>(Box::new(stream) as BoxedStream)
            }
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path).await?;
                Ok::<_, io::Error>(Box::new(stream) as BoxedStream)
            }
        }
    };

    match tokio::time::timeout(timeout, connecting).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::from_raw_os_error(libc::ETIMEDOUT)),
    }
}
