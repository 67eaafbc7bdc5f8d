//! WebSocket client channel implementation using `tokio-tungstenite`.

use std::io;

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::{Channel, ChannelId, TransportError};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A WebSocket connection to the simulation server.
pub struct WebSocketChannel {
    id: ChannelId,
    ws: WsStream,
    closed: bool,
}

impl WebSocketChannel {
    /// Connects to `endpoint` (e.g. `ws://127.0.0.1:8000/ws/square/`) and
    /// performs the upgrade handshake.
    pub async fn open(endpoint: &str) -> Result<Self, TransportError> {
        let (ws, response) = tokio_tungstenite::connect_async(endpoint)
            .await
            .map_err(|e| TransportError::ConnectFailed {
                endpoint: endpoint.to_string(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, e),
            })?;

        let id = ChannelId::next();
        tracing::info!(
            %id,
            endpoint,
            status = %response.status(),
            "WebSocket channel open"
        );

        Ok(Self {
            id,
            ws,
            closed: false,
        })
    }
}

impl Channel for WebSocketChannel {
    type Error = TransportError;

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        if self.closed {
            return Ok(None);
        }
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(id = %self.id, ?frame, "peer closed channel");
                    self.closed = true;
                    return Ok(None);
                }
                None => {
                    self.closed = true;
                    return Ok(None);
                }
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    self.closed = true;
                    return Err(TransportError::ReceiveFailed(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        if self.closed {
            return Ok(());
        }
        // Mark closed first so a failed close frame still stops delivery.
        self.closed = true;
        match self.ws.close(None).await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed)
            | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(TransportError::SendFailed(io::Error::new(
                io::ErrorKind::BrokenPipe,
                e,
            ))),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn id(&self) -> ChannelId {
        self.id
    }
}
