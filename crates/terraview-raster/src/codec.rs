//! DEFLATE decoding of compressed raster payloads.

use miniz_oxide::inflate::{self, TINFLStatus};

use crate::{CodecError, GridRaster, RasterDims};

/// Default compression level used by [`RasterCodec::encode`].
const ENCODE_LEVEL: u8 = 6;

/// Framing of the compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    /// DEFLATE with a zlib header and Adler-32 trailer, as produced by
    /// `zlib.compress` on the server.
    #[default]
    Zlib,
    /// Headerless DEFLATE.
    RawDeflate,
}

/// Decodes compressed payloads into rasters of one fixed size.
#[derive(Debug, Clone, Copy)]
pub struct RasterCodec {
    dims: RasterDims,
    format: RasterFormat,
}

impl RasterCodec {
    /// Creates a zlib codec for `dims`.
    pub fn new(dims: RasterDims) -> Self {
        Self {
            dims,
            format: RasterFormat::default(),
        }
    }

    /// Overrides the stream framing.
    pub fn with_format(mut self, format: RasterFormat) -> Self {
        self.format = format;
        self
    }

    pub fn dims(&self) -> RasterDims {
        self.dims
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    /// The exact decompressed size every payload must produce.
    pub fn expected_len(&self) -> usize {
        self.dims.byte_len()
    }

    /// Inflates `compressed` into a raster.
    ///
    /// Output is capped one byte past the expected size, so work and memory
    /// are bounded by the raster size no matter what the payload claims.
    ///
    /// # Errors
    /// - `CodecError::Corrupt` for a truncated or invalid stream.
    /// - `CodecError::Oversized` if the stream would inflate past the
    ///   expected size.
    /// - `CodecError::SizeMismatch` if it inflates to fewer bytes.
    pub fn decode(&self, compressed: &[u8]) -> Result<GridRaster, CodecError> {
        let expected = self.expected_len();
        let limit = expected + 1;

        let result = match self.format {
            RasterFormat::Zlib => inflate::decompress_to_vec_zlib_with_limit(compressed, limit),
            RasterFormat::RawDeflate => inflate::decompress_to_vec_with_limit(compressed, limit),
        };

        let pixels = result.map_err(|e| match e.status {
            TINFLStatus::HasMoreOutput => CodecError::Oversized { expected },
            status => CodecError::Corrupt(format!("{status:?}")),
        })?;
        if pixels.len() > expected {
            return Err(CodecError::Oversized { expected });
        }

        tracing::trace!(
            compressed = compressed.len(),
            inflated = pixels.len(),
            "raster inflated"
        );

        GridRaster::new(self.dims, pixels)
    }

    /// Compresses a raster in this codec's format.
    pub fn encode(&self, raster: &GridRaster) -> Vec<u8> {
        match self.format {
            RasterFormat::Zlib => {
                miniz_oxide::deflate::compress_to_vec_zlib(raster.pixels(), ENCODE_LEVEL)
            }
            RasterFormat::RawDeflate => {
                miniz_oxide::deflate::compress_to_vec(raster.pixels(), ENCODE_LEVEL)
            }
        }
    }
}
