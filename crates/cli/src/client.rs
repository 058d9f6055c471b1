#![forbid(unsafe_code)]

use crate::info::{Info, InfoCollector};
use ipc::{IpcManager, Message, MsgId};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

/// Ask the daemon for its module information and collect the answer.
///
/// Whatever arrived before the daemon closed the channel is returned, even
/// if the final `INFO_END` is missing.
pub async fn query_info<S>(stream: S) -> Result<Info, ipc::Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut manager = IpcManager::new(stream);
    manager.send(Message::new(MsgId::INFO)).await?;

    let mut collector = InfoCollector::default();
    let handled = manager.dispatch(&mut collector).await?;
    debug!(handled, "info exchange done");

    if !collector.is_complete() {
        warn!("daemon closed the channel before the end of info");
    }
    Ok(collector.finish())
}
