//! In-process channel backed by a tokio mpsc queue.
//!
//! Used for replaying recorded sessions and for driving the view in tests
//! without a socket.

use tokio::sync::mpsc;

use crate::{Channel, ChannelId, TransportError};

/// The receiving half: behaves like a server connection.
pub struct MemoryChannel {
    id: ChannelId,
    inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    closed: bool,
}

/// The sending half: plays the role of the server.
///
/// Dropping every sender closes the channel cleanly.
#[derive(Clone)]
pub struct MemorySender {
    id: ChannelId,
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl MemoryChannel {
    /// Creates a connected sender/channel pair.
    pub fn pair() -> (MemorySender, MemoryChannel) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ChannelId::next();
        (
            MemorySender { id, tx },
            MemoryChannel {
                id,
                inbound: rx,
                closed: false,
            },
        )
    }
}

impl MemorySender {
    /// Queues a frame for delivery.
    pub fn send(&self, frame: impl Into<Vec<u8>>) -> Result<(), TransportError> {
        self.tx.send(frame.into()).map_err(|_| {
            TransportError::ConnectionClosed(format!("{} closed", self.id))
        })
    }

    /// Returns `true` if the receiving channel has been closed or dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Channel for MemoryChannel {
    type Error = TransportError;

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        if self.closed {
            return Ok(None);
        }
        match self.inbound.recv().await {
            Some(frame) => Ok(Some(frame)),
            None => {
                self.closed = true;
                Ok(None)
            }
        }
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        if !self.closed {
            self.closed = true;
            self.inbound.close();
            tracing::debug!(id = %self.id, "memory channel closed");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn id(&self) -> ChannelId {
        self.id
    }
}
