//! Raster codec for terraview.
//!
//! The server sends the ownership grid as a DEFLATE-compressed,
//! interleaved-channel pixel buffer of a size fixed for the whole session.
//! [`RasterCodec`] inflates it into a [`GridRaster`] and refuses anything
//! that does not come out at exactly `width × height × channels` bytes:
//! a partial read must be a dropped frame, never a partial draw.

mod codec;
mod error;
mod raster;

pub use codec::{RasterCodec, RasterFormat};
pub use error::CodecError;
pub use raster::{GridRaster, RasterDims};
