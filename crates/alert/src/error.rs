#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to write alert document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Alert document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transfer failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Alert listener answered {0}")]
    Rejected(reqwest::StatusCode),

    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),
}
