//! The async shell: one task that owns a [`LiveView`] and its channel.
//!
//! The task `select!`s over host commands and inbound frames, biased
//! towards commands so a teardown request pre-empts any frames already
//! queued on the channel.

use terraview_protocol::Codec;
use terraview_raster::RasterFormat;
use terraview_scene::{LabelConfig, Renderer};
use terraview_transport::{Channel, ChannelId, WebSocketChannel};
use terraview_viewport::{InputEvent, ViewportConfig};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{Diagnostic, DiagnosticSink, LiveView, TracingSink, ViewConfig, ViewError};

/// Commands the host sends to a running view.
#[derive(Debug)]
enum ViewCommand {
    Input(InputEvent),
    Teardown,
}

/// Why the view task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The host asked for teardown (or dropped its handle).
    Teardown,
    /// The server closed the connection.
    ChannelClosed,
    /// The connection failed.
    ChannelFailed,
}

/// Handle to a running live view.
///
/// Dropping the handle also stops the view; use
/// [`teardown`](Self::teardown) to get the renderer back.
pub struct ViewHandle<R> {
    channel_id: ChannelId,
    commands: mpsc::Sender<ViewCommand>,
    task: JoinHandle<(StopReason, Option<R>)>,
}

impl<R: Send + 'static> ViewHandle<R> {
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Forwards a pointer, wheel or resize event to the viewport.
    pub async fn input(&self, event: InputEvent) -> Result<(), ViewError> {
        self.commands
            .send(ViewCommand::Input(event))
            .await
            .map_err(|_| ViewError::Stopped)
    }

    /// Returns `true` once the view task has exited, e.g. because the
    /// server closed the connection.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the view, closes the channel and releases every renderer
    /// resource, then returns the renderer.
    ///
    /// Works whether or not the view already stopped on its own.
    pub async fn teardown(self) -> Result<R, ViewError> {
        self.teardown_with_reason().await.map(|(_, renderer)| renderer)
    }

    /// Like [`teardown`](Self::teardown), also reporting why the view
    /// stopped.
    pub async fn teardown_with_reason(self) -> Result<(StopReason, R), ViewError> {
        // Fails only if the task is already gone, which is fine.
        let _ = self.commands.send(ViewCommand::Teardown).await;
        let (reason, renderer) = self.task.await.map_err(|_| ViewError::Stopped)?;
        renderer.map(|r| (reason, r)).ok_or(ViewError::Stopped)
    }
}

/// Runs a view with the default JSON codec and [`TracingSink`] on an
/// already open channel.
pub fn spawn_view<Ch, R>(channel: Ch, renderer: R, config: ViewConfig) -> ViewHandle<R>
where
    Ch: Channel,
    R: Renderer + Send + 'static,
{
    let config = config.validated();
    let view = LiveView::new(renderer, &config);
    spawn_with(channel, view, config.command_buffer)
}

/// Runs a pre-built view on an already open channel.
pub fn spawn_with<Ch, R, C>(
    channel: Ch,
    view: LiveView<R, C>,
    command_buffer: usize,
) -> ViewHandle<R>
where
    Ch: Channel,
    R: Renderer + Send + 'static,
    C: Codec,
{
    let (tx, rx) = mpsc::channel(command_buffer.max(1));
    let channel_id = channel.id();
    let task = tokio::spawn(run(channel, view, rx));
    ViewHandle {
        channel_id,
        commands: tx,
        task,
    }
}

async fn run<Ch, R, C>(
    mut channel: Ch,
    mut view: LiveView<R, C>,
    mut commands: mpsc::Receiver<ViewCommand>,
) -> (StopReason, Option<R>)
where
    Ch: Channel,
    R: Renderer,
    C: Codec,
{
    let channel_id = channel.id();
    info!(%channel_id, "live view started");

    let reason = loop {
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(ViewCommand::Input(event)) => {
                    if view.handle_input(event) {
                        view.present();
                    }
                }
                Some(ViewCommand::Teardown) | None => break StopReason::Teardown,
            },

            frame = channel.recv() => match frame {
                Ok(Some(bytes)) => {
                    if view.handle_frame(&bytes).is_applied() {
                        view.present();
                    }
                }
                Ok(None) => {
                    info!(%channel_id, "channel closed by server");
                    break StopReason::ChannelClosed;
                }
                Err(e) => {
                    view.report(Diagnostic::transport(&e));
                    break StopReason::ChannelFailed;
                }
            },
        }
    };

    // Close first so nothing can be delivered while the scene goes away.
    if let Err(e) = channel.close().await {
        debug!(%channel_id, error = %e, "channel close failed");
    }
    let stats = view.stats();
    let renderer = view.into_renderer();
    info!(
        %channel_id,
        ?reason,
        frames = stats.frames,
        dropped = stats.dropped,
        "live view torn down"
    );
    (reason, renderer)
}

/// Builder for a live view connected over WebSocket.
///
/// # Example
///
/// ```rust,no_run
/// use terraview::prelude::*;
///
/// # async fn demo() -> Result<(), ViewError> {
/// let view = LiveViewBuilder::new()
///     .endpoint("ws://127.0.0.1:8000/ws/square/")
///     .world(600, 400)
///     .initialize(HeadlessRenderer::new())
///     .await?;
///
/// view.input(InputEvent::Resize { width: 1200.0, height: 800.0 }).await?;
/// let renderer = view.teardown().await?;
/// assert!(renderer.is_clean());
/// # Ok(())
/// # }
/// ```
pub struct LiveViewBuilder {
    config: ViewConfig,
    sink: Box<dyn DiagnosticSink>,
}

impl LiveViewBuilder {
    pub fn new() -> Self {
        Self {
            config: ViewConfig::default(),
            sink: Box::new(TracingSink),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoint = endpoint.to_string();
        self
    }

    /// Sets the fixed world size, in pixels.
    pub fn world(mut self, width: u32, height: u32) -> Self {
        self.config.world.width = width;
        self.config.world.height = height;
        self
    }

    pub fn raster_format(mut self, format: RasterFormat) -> Self {
        self.config.raster_format = format;
        self
    }

    pub fn labels(mut self, labels: LabelConfig) -> Self {
        self.config.labels = labels;
        self
    }

    pub fn leaderboard_size(mut self, size: usize) -> Self {
        self.config.leaderboard_size = size;
        self
    }

    pub fn viewport(mut self, viewport: ViewportConfig) -> Self {
        self.config.viewport = viewport;
        self
    }

    pub fn command_buffer(mut self, capacity: usize) -> Self {
        self.config.command_buffer = capacity;
        self
    }

    /// Sets where dropped frames are reported. Defaults to [`TracingSink`].
    pub fn sink(mut self, sink: impl DiagnosticSink) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Builds the synchronous core without connecting, for hosts that
    /// drive frames themselves.
    pub fn build<R: Renderer>(self, renderer: R) -> LiveView<R> {
        let config = self.config.validated();
        LiveView::new(renderer, &config).with_boxed_sink(self.sink)
    }

    /// Connects to the endpoint and starts the view.
    ///
    /// # Errors
    /// `ViewError::Transport` if the connection cannot be opened.
    pub async fn initialize<R>(self, renderer: R) -> Result<ViewHandle<R>, ViewError>
    where
        R: Renderer + Send + 'static,
    {
        let config = self.config.validated();
        let channel = WebSocketChannel::open(&config.endpoint).await?;
        let view = LiveView::new(renderer, &config).with_boxed_sink(self.sink);
        Ok(spawn_with(channel, view, config.command_buffer))
    }
}

impl Default for LiveViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}
