#![forbid(unsafe_code)]

use crate::codec::IpcCodec;
use crate::error::Error;
use crate::message::Message;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, trace};

/// Whether [`IpcManager::dispatch`] keeps reading after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Consumer of incoming messages.
pub trait Handler {
    /// Handle one message. Messages the handler has no use for should be
    /// ignored and answered with [`Flow::Continue`].
    fn handle(&mut self, message: &Message) -> Result<Flow, Error>;
}

/// Sends and receives framed messages over a connected stream.
pub struct IpcManager<S> {
    framed: Framed<S, IpcCodec>,
}

impl<S> IpcManager<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            framed: Framed::new(stream, IpcCodec::new()),
        }
    }

    /// Encode and flush one message.
    pub async fn send(&mut self, message: Message) -> Result<(), Error> {
        trace!(id = %message.id(), argc = message.argc(), "sending message");
        self.framed.send(message).await
    }

    /// Wait for the next message. `None` once the peer has closed the channel.
    pub async fn receive(&mut self) -> Result<Option<Message>, Error> {
        let message = self.framed.next().await.transpose()?;
        if let Some(message) = &message {
            trace!(id = %message.id(), argc = message.argc(), "received message");
        }
        Ok(message)
    }

    /// Feed incoming messages to `handler` until the channel closes or the
    /// handler asks to stop. Returns the number of messages handled.
    pub async fn dispatch<H>(&mut self, handler: &mut H) -> Result<usize, Error>
    where
        H: Handler + ?Sized,
    {
        let mut handled = 0;
        while let Some(message) = self.receive().await? {
            handled += 1;
            if handler.handle(&message)? == Flow::Stop {
                debug!(id = %message.id(), handled, "handler stopped dispatch");
                return Ok(handled);
            }
        }
        debug!(handled, "peer closed channel");
        Ok(handled)
    }
}
