//! # terraview
//!
//! Live-view client for a streaming territory simulation.
//!
//! The server pushes a compressed ownership raster, region stats and
//! moving entities over a WebSocket. terraview decodes each frame,
//! reconciles it into a [`Renderer`](terraview_scene::Renderer) with as
//! little object churn as possible, and maps the world onto the screen
//! with a pan/zoom viewport.
//!
//! ```text
//! Channel ─► decode_frame ─► RasterCodec ─► Scene ─► Renderer
//!                                              ▲
//!                   InputEvent ─► ViewportController
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use terraview::prelude::*;
//!
//! # async fn demo() -> Result<(), ViewError> {
//! let view = LiveViewBuilder::new()
//!     .world(600, 400)
//!     .initialize(HeadlessRenderer::new())
//!     .await?;
//! // ... forward input with view.input(...) ...
//! let _renderer = view.teardown().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod diagnostics;
mod error;
mod logging;
mod view;

pub use client::{LiveViewBuilder, StopReason, ViewHandle, spawn_view, spawn_with};
pub use config::{DEFAULT_ENDPOINT, ViewConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, Stage, TracingSink};
pub use error::ViewError;
pub use logging::init_tracing;
pub use view::{FrameOutcome, LiveView, ViewStats};

pub use terraview_protocol as protocol;
pub use terraview_raster as raster;
pub use terraview_scene as scene;
pub use terraview_transport as transport;
pub use terraview_viewport as viewport;

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use crate::{
        Diagnostic, DiagnosticSink, FrameOutcome, LiveView, LiveViewBuilder, RecordingSink,
        Stage, StopReason, TracingSink, ViewConfig, ViewError, ViewHandle, init_tracing,
        spawn_view, spawn_with,
    };
    pub use terraview_protocol::{EntityState, RegionInfo, ServerMessage};
    pub use terraview_raster::{GridRaster, RasterCodec, RasterDims, RasterFormat};
    pub use terraview_scene::{HeadlessRenderer, LabelConfig, Renderer, Scene};
    pub use terraview_transport::{Channel, MemoryChannel, MemorySender, WebSocketChannel};
    pub use terraview_viewport::{InputEvent, ViewportConfig, ViewportTransform};
}
