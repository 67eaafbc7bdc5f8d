//! Error types for the protocol layer.

use crate::PayloadEncoding;

/// Errors that can occur while decoding inbound frames.
///
/// None of these are fatal to the view: the offending frame is dropped and
/// the error is reported to the diagnostics sink.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The frame is not a well-formed envelope at all (not JSON, not an
    /// object, `type` is not a string).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The envelope carries no `type` discriminant.
    #[error("envelope has no `type` discriminant")]
    MissingKind,

    /// The discriminant is recognised but the payload has the wrong shape
    /// (missing fields, wrong field types).
    #[error("malformed `{kind}` message: {reason}")]
    Malformed { kind: String, reason: String },

    /// The inline raster payload is not valid text for its encoding
    /// (odd-length hex, non-hex digits, bad base64).
    #[error("invalid {encoding} raster payload: {reason}")]
    InvalidPayload {
        encoding: PayloadEncoding,
        reason: String,
    },

    /// The message decodes but breaks a session invariant, e.g. an
    /// `initial_state` whose dimensions differ from the session's.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
