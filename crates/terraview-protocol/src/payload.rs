//! Inline raster payloads: compressed bytes carried as text in the envelope.

use std::fmt;

use base64::Engine;
use serde::Deserialize;

use crate::ProtocolError;

/// How the compressed raster bytes are written into the `grid` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// Lower- or upper-case hex, two digits per byte. What the server sends.
    #[default]
    Hex,
    /// Standard alphabet base64 with padding.
    Base64,
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// The raster-bearing body of `map` and `grid_update` messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RasterPayload {
    pub grid: String,
    #[serde(default)]
    pub encoding: PayloadEncoding,
}

impl RasterPayload {
    /// Length of the encoded text, reported in diagnostics as the raw size.
    pub fn encoded_len(&self) -> usize {
        self.grid.len()
    }

    /// Decodes the text into the compressed raster bytes.
    ///
    /// # Errors
    /// `ProtocolError::InvalidPayload` for odd-length hex, non-hex digits,
    /// or invalid base64.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let invalid = |reason: String| ProtocolError::InvalidPayload {
            encoding: self.encoding,
            reason,
        };
        match self.encoding {
            PayloadEncoding::Hex => hex::decode(&self.grid).map_err(|e| invalid(e.to_string())),
            PayloadEncoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(&self.grid)
                .map_err(|e| invalid(e.to_string())),
        }
    }
}
