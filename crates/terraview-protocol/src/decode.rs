//! Frame → message decoding with forward-compatible tag handling.

use serde::Deserialize;

use crate::{Codec, KNOWN_KINDS, ProtocolError, ServerMessage};

/// The result of decoding one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A recognised message.
    Message(ServerMessage),
    /// A well-formed envelope with a discriminant this client doesn't know.
    Ignored { kind: String },
}

/// Reads only the discriminant; every other field is skipped.
#[derive(Deserialize)]
struct TagProbe {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Decodes one raw frame.
///
/// Decoding is two-stage: a cheap probe reads the `type` tag, then only
/// recognised tags are decoded into a [`ServerMessage`]. Unknown tags are
/// returned as [`Inbound::Ignored`] rather than an error.
///
/// # Errors
/// - `ProtocolError::Decode` if the frame is not an envelope at all.
/// - `ProtocolError::MissingKind` if the envelope has no `type`.
/// - `ProtocolError::Malformed` if a known kind has the wrong shape.
pub fn decode_frame<C: Codec>(codec: &C, frame: &[u8]) -> Result<Inbound, ProtocolError> {
    let probe: TagProbe = codec.decode(frame)?;
    let kind = probe.kind.ok_or(ProtocolError::MissingKind)?;

    if !KNOWN_KINDS.contains(&kind.as_str()) {
        return Ok(Inbound::Ignored { kind });
    }

    codec
        .decode::<ServerMessage>(frame)
        .map(Inbound::Message)
        .map_err(|e| ProtocolError::Malformed {
            kind,
            reason: e.to_string(),
        })
}
