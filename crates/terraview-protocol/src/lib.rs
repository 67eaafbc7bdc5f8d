//! Wire protocol for terraview.
//!
//! This crate defines what the simulation server sends:
//!
//! - **Types** ([`ServerMessage`], [`RegionInfo`], [`EntityState`], …) —
//!   the message structures that travel on the wire.
//! - **Payloads** ([`RasterPayload`]) — compressed rasters inlined as hex
//!   or base64 text.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how frames become typed
//!   values.
//! - **Decoding** ([`decode_frame`], [`Inbound`]) — envelope dispatch that
//!   ignores unknown discriminants.
//!
//! ```text
//! Transport (bytes) → Protocol (ServerMessage) → Raster codec / Scene
//! ```

mod codec;
mod decode;
mod error;
mod payload;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use decode::{Inbound, decode_frame};
pub use error::ProtocolError;
pub use payload::{PayloadEncoding, RasterPayload};
pub use types::{
    Cell, CellColor, EntityColor, EntityState, InitialState, KNOWN_KINDS, RegionInfo,
    ServerMessage,
};
