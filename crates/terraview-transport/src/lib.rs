//! Transport abstraction layer for terraview.
//!
//! Provides the [`Channel`] trait: a single duplex byte-stream connection to
//! the simulation server that delivers raw inbound frames and signals
//! close/error. Delivery is pull-based; the owner drives [`Channel::recv`]
//! from its event loop, so closing the channel is enough to stop delivery.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket client channel via `tokio-tungstenite`

mod error;
mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use memory::{MemoryChannel, MemorySender};
#[cfg(feature = "websocket")]
pub use websocket::WebSocketChannel;

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique channel IDs.
static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a channel, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Creates a new `ChannelId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next process-wide unique ID.
    pub(crate) fn next() -> Self {
        Self(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chan-{}", self.0)
    }
}

/// A single connection to the server that yields inbound frames.
///
/// Frames are binary-safe: text frames are delivered as their UTF-8 bytes,
/// binary frames verbatim.
pub trait Channel: Send + 'static {
    /// The error type for channel operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Receives the next inbound frame.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed, by either
    /// side. Once [`close`](Self::close) has been called this always returns
    /// `Ok(None)` without touching the underlying connection.
    fn recv(
        &mut self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Closes the connection. Idempotent.
    fn close(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns `true` once the channel is closed locally or by the peer.
    fn is_closed(&self) -> bool;

    /// Returns the unique identifier for this channel.
    fn id(&self) -> ChannelId;
}
