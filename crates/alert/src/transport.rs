#![forbid(unsafe_code)]

use crate::error::Error;
use async_trait::async_trait;
use config::TransportKind;
use reqwest::multipart::Form;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tracing::debug;

/// Name of the multipart field carrying the document.
pub const FORM_FIELD: &str = "xml";

#[async_trait]
pub trait AlertTransport: Send + Sync {
    /// Deliver one serialized alert document. Exactly one attempt is made.
    async fn send(&self, document: &str) -> Result<(), Error>;
}

#[derive(Debug, Default)]
pub struct NoopTransport;

#[async_trait]
impl AlertTransport for NoopTransport {
    async fn send(&self, _document: &str) -> Result<(), Error> {
        Ok(())
    }
}

/// Posts the document as a multipart form to the local alert listener.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(
        url: impl Into<String>,
        user_agent: &str,
        connect_timeout: Duration,
    ) -> Result<Self, Error> {
        // The listener is always local; environment proxies must not apply.
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AlertTransport for HttpTransport {
    async fn send(&self, document: &str) -> Result<(), Error> {
        let form = Form::new().text(FORM_FIELD, document.to_owned());
        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();

        // The listener's answer carries nothing of interest.
        let discarded = response.bytes().await?;
        debug!(%status, discarded = discarded.len(), url = %self.url, "alert posted");

        if !status.is_success() {
            return Err(Error::Rejected(status));
        }
        Ok(())
    }
}

/// Writes the document to a Unix domain socket, then closes the connection.
#[derive(Debug, Clone)]
pub struct UnixSocketTransport {
    path: PathBuf,
    connect_timeout: Duration,
}

impl UnixSocketTransport {
    pub fn new(path: impl Into<PathBuf>, connect_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            connect_timeout,
        }
    }
}

#[async_trait]
impl AlertTransport for UnixSocketTransport {
    async fn send(&self, document: &str) -> Result<(), Error> {
        let mut stream =
            tokio::time::timeout(self.connect_timeout, UnixStream::connect(&self.path))
                .await
                .map_err(|_| Error::ConnectTimeout(self.path.display().to_string()))??;
        stream.write_all(document.as_bytes()).await?;
        stream.shutdown().await?;
        debug!(path = %self.path.display(), bytes = document.len(), "alert written");
        Ok(())
    }
}

/// Build the transport selected in the `[alert]` configuration section.
pub fn transport_from_config(
    config: &config::Alert,
) -> Result<Box<dyn AlertTransport>, Error> {
    Ok(match config.transport {
        TransportKind::Http => Box::new(HttpTransport::new(
            config.url.clone(),
            &config.user_agent,
            config.connect_timeout,
        )?),
        TransportKind::Unix => Box::new(UnixSocketTransport::new(
            config.socket_path.clone(),
            config.connect_timeout,
        )),
        TransportKind::None => Box::new(NoopTransport),
    })
}
