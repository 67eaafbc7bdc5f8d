//! Headless live viewer.
//!
//! Connects to a running simulation, applies every frame to a
//! [`HeadlessRenderer`] and logs what it did. Stops on Ctrl-C or when the
//! server closes the stream.
//!
//! ```text
//! cargo run -p live-view -- ws://127.0.0.1:8000/ws/square/
//! RUST_LOG=terraview=trace cargo run -p live-view
//! ```

use std::time::Duration;

use terraview::prelude::*;
use terraview::DEFAULT_ENDPOINT;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), ViewError> {
    init_tracing("info,terraview=debug");

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let view = LiveViewBuilder::new()
        .endpoint(&endpoint)
        .initialize(HeadlessRenderer::new())
        .await?;

    let surface = InputEvent::Resize {
        width: 1200.0,
        height: 800.0,
    };
    if let Err(e) = view.input(surface).await {
        warn!(error = %e, "view stopped before first resize");
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut poll = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted, tearing down");
                break;
            }
            _ = poll.tick() => {
                if view.is_finished() {
                    break;
                }
            }
        }
    }

    let (reason, renderer) = view.teardown_with_reason().await?;
    let stats = renderer.stats();
    info!(
        ?reason,
        textures = stats.textures_created,
        overlays = stats.overlays_created,
        presents = stats.presents,
        clean = renderer.is_clean(),
        "session ended"
    );
    Ok(())
}
