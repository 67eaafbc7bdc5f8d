//! Error types for the raster codec.

/// Errors raised while turning a compressed payload into a [`GridRaster`].
///
/// Every variant means the frame is dropped; the previously displayed
/// raster stays on screen.
///
/// [`GridRaster`]: crate::GridRaster
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The compressed stream is truncated, has a bad header, or fails its
    /// checksum.
    #[error("raster stream is corrupt or truncated: {0}")]
    Corrupt(String),

    /// Inflation produced more than the fixed raster size and was aborted.
    #[error("raster inflates past the expected {expected} bytes")]
    Oversized { expected: usize },

    /// The buffer does not hold exactly `width × height × channels` bytes.
    #[error("raster size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A sparse cell lies outside the raster.
    #[error("cell ({x}, {y}) is outside the {width}x{height} raster")]
    CellOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl CodecError {
    /// The decompressed size, when it is known.
    pub fn actual_size(&self) -> Option<usize> {
        match self {
            Self::SizeMismatch { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}
