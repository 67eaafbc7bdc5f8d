//! Codec trait and implementations for deserializing inbound frames.
//!
//! The protocol layer does not care how envelopes are serialized; it needs
//! something that implements [`Codec`]. The server speaks JSON today, so
//! [`JsonCodec`] is the only implementation.

use serde::de::DeserializeOwned;

use crate::ProtocolError;

/// A codec that turns raw frame bytes into typed values.
///
/// `DeserializeOwned` keeps decoded values independent of the frame
/// buffer, so the buffer can be dropped as soon as decoding finishes.
pub trait Codec: Send + Sync + 'static {
    /// Deserializes bytes into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use terraview_protocol::{Codec, JsonCodec, RegionInfo};
///
/// let region: RegionInfo = JsonCodec
///     .decode(br#"{"id":1,"resources":5,"center_of_mass":[2.0,3.0]}"#)
///     .unwrap();
/// assert_eq!(region.id, 1);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
