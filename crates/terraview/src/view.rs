//! [`LiveView`]: the synchronous core of the client.
//!
//! Every inbound frame, input event and teardown is one `&mut self` call,
//! so nothing is ever processed concurrently. The async shell in
//! [`client`](crate::client) only decides which call to make next.

use terraview_protocol::{
    Codec, Inbound, InitialState, JsonCodec, ProtocolError, ServerMessage, decode_frame,
};
use terraview_raster::{GridRaster, RasterCodec};
use terraview_scene::{Renderer, Scene};
use terraview_viewport::{InputEvent, ViewportController};
use tracing::{debug, trace};

use crate::diagnostics::protocol_kind;
use crate::{Diagnostic, DiagnosticSink, TracingSink, ViewConfig, ViewError};

/// What happened to one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Decoded and applied to the scene.
    Applied(&'static str),
    /// Decoded but deliberately not applied (an `initial_state` after a
    /// raster is already displayed).
    Superseded(&'static str),
    /// Unknown message kind.
    Ignored(String),
    /// Failed somewhere in the pipeline and reported as a diagnostic.
    Dropped,
}

impl FrameOutcome {
    /// Returns `true` if the scene changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStats {
    pub frames: u64,
    pub applied: u64,
    pub superseded: u64,
    pub ignored: u64,
    pub dropped: u64,
}

/// Decoder, raster codec, scene and viewport for one session.
pub struct LiveView<R: Renderer, C: Codec = JsonCodec> {
    codec: C,
    raster: RasterCodec,
    scene: Scene<R>,
    viewport: ViewportController,
    sink: Box<dyn DiagnosticSink>,
    stats: ViewStats,
}

impl<R: Renderer> LiveView<R> {
    /// Creates a view that decodes JSON envelopes and reports to
    /// [`TracingSink`].
    pub fn new(renderer: R, config: &ViewConfig) -> Self {
        Self::with_codec(renderer, JsonCodec, config)
    }
}

impl<R: Renderer, C: Codec> LiveView<R, C> {
    pub fn with_codec(renderer: R, codec: C, config: &ViewConfig) -> Self {
        let dims = config.world;
        Self {
            codec,
            raster: RasterCodec::new(dims).with_format(config.raster_format),
            scene: Scene::new(renderer, dims, config.scene_config()),
            viewport: ViewportController::new(
                config.viewport,
                f64::from(dims.width),
                f64::from(dims.height),
            ),
            sink: Box::new(TracingSink),
            stats: ViewStats::default(),
        }
    }

    /// Replaces the diagnostics sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub(crate) fn with_boxed_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn scene(&self) -> &Scene<R> {
        &self.scene
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn stats(&self) -> ViewStats {
        self.stats
    }

    /// Decodes one raw frame and applies it to the scene.
    ///
    /// Never fails: anything that goes wrong is reported to the sink and
    /// the scene keeps what it was displaying.
    pub fn handle_frame(&mut self, frame: &[u8]) -> FrameOutcome {
        self.stats.frames += 1;

        let message = match decode_frame(&self.codec, frame) {
            Ok(Inbound::Message(message)) => message,
            Ok(Inbound::Ignored { kind }) => {
                debug!(%kind, "ignoring unknown message kind");
                self.stats.ignored += 1;
                return FrameOutcome::Ignored(kind);
            }
            Err(e) => {
                let kind = protocol_kind(&e).map(str::to_owned);
                self.drop_frame(&ViewError::Protocol(e), kind.as_deref(), frame.len());
                return FrameOutcome::Dropped;
            }
        };

        let kind = message.kind();
        match self.apply(message) {
            Ok(true) => {
                trace!(kind, raw_size = frame.len(), "frame applied");
                self.stats.applied += 1;
                FrameOutcome::Applied(kind)
            }
            Ok(false) => {
                self.stats.superseded += 1;
                FrameOutcome::Superseded(kind)
            }
            Err(e) => {
                self.drop_frame(&e, Some(kind), frame.len());
                FrameOutcome::Dropped
            }
        }
    }

    /// Feeds one input event to the viewport. Returns `true` if the
    /// transform changed and the frame should be presented again.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        self.viewport.handle(event)
    }

    /// Presents the current scene under the current transform.
    pub fn present(&mut self) -> bool {
        let transform = self.viewport.transform();
        match self.scene.present(&transform) {
            Ok(()) => true,
            Err(e) => {
                self.drop_frame(&ViewError::Render(e), None, 0);
                false
            }
        }
    }

    /// Reports a failure that did not come from a frame.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    /// Releases every renderer resource. Idempotent.
    pub fn teardown(&mut self) {
        self.scene.teardown();
    }

    /// Tears down and returns the renderer.
    pub fn into_renderer(self) -> Option<R> {
        self.scene.into_renderer()
    }

    /// Applies a decoded message. `Ok(false)` means it was superseded.
    fn apply(&mut self, message: ServerMessage) -> Result<bool, ViewError> {
        match message {
            ServerMessage::Map(payload) | ServerMessage::GridUpdate(payload) => {
                let compressed = payload.to_bytes()?;
                let raster = self.raster.decode(&compressed)?;
                self.scene.set_raster(raster)?;
            }
            ServerMessage::InitialState(state) => {
                if self.scene.state().raster().is_some() {
                    debug!("initial_state after a raster is displayed, skipping");
                    return Ok(false);
                }
                let raster = self.rasterize(&state)?;
                self.scene.set_raster(raster)?;
            }
            ServerMessage::SquareInfo { square_info } => {
                self.scene.set_regions(square_info)?;
            }
            ServerMessage::Update { entities } => {
                self.scene.set_entities(entities)?;
            }
        }
        Ok(true)
    }

    fn rasterize(&self, state: &InitialState) -> Result<GridRaster, ViewError> {
        let dims = self.raster.dims();
        if (state.width, state.height) != (dims.width, dims.height) {
            return Err(ProtocolError::InvalidMessage(format!(
                "initial_state is {}x{}, session world is {}x{}",
                state.width, state.height, dims.width, dims.height
            ))
            .into());
        }
        let cells = state
            .cells
            .iter()
            .map(|c| (c.x(), c.y(), c.color().to_rgba()));
        Ok(GridRaster::from_cells(dims, cells)?)
    }

    fn drop_frame(&mut self, error: &ViewError, kind: Option<&str>, raw_size: usize) {
        self.stats.dropped += 1;
        self.sink.report(Diagnostic::from_error(error, kind, raw_size));
    }
}
