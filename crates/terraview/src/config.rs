//! Configuration for a live view.

use terraview_raster::{RasterDims, RasterFormat};
use terraview_scene::{LabelConfig, SceneConfig, leaderboard::DEFAULT_LEADERBOARD_SIZE};
use terraview_viewport::ViewportConfig;
use tracing::warn;

/// Where the simulation server serves the live stream by default.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8000/ws/square/";

/// Everything a live view needs to know up front.
///
/// The world dimensions are fixed for the session: every raster must
/// decompress to exactly `world.byte_len()` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// WebSocket URL of the live stream.
    pub endpoint: String,
    pub world: RasterDims,
    pub raster_format: RasterFormat,
    pub labels: LabelConfig,
    /// Rows shown on the leaderboard.
    pub leaderboard_size: usize,
    pub viewport: ViewportConfig,
    /// Capacity of the host → view command queue.
    pub command_buffer: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            world: RasterDims::default(),
            raster_format: RasterFormat::default(),
            labels: LabelConfig::default(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            viewport: ViewportConfig::default(),
            command_buffer: 64,
        }
    }
}

impl ViewConfig {
    /// Fix any out-of-range values so the config is safe to use.
    ///
    /// - An empty world falls back to the default 600×400 RGBA.
    /// - `command_buffer` is at least 1.
    /// - The viewport config is validated too.
    pub fn validated(mut self) -> Self {
        if self.world.width == 0 || self.world.height == 0 || self.world.channels == 0 {
            warn!(world = %self.world, "world dimensions must be non-zero, using default");
            self.world = RasterDims::default();
        }
        if self.command_buffer == 0 {
            warn!("command_buffer must be > 0, using 1");
            self.command_buffer = 1;
        }
        self.viewport = self.viewport.validated();
        self
    }

    pub(crate) fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            labels: self.labels,
            leaderboard_size: self.leaderboard_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = ViewConfig::default();
        assert_eq!(c.endpoint, "ws://127.0.0.1:8000/ws/square/");
        assert_eq!(c.world, RasterDims::rgba(600, 400));
        assert_eq!(c.raster_format, RasterFormat::Zlib);
        assert_eq!(c.leaderboard_size, 10);
        assert_eq!(c.clone().validated(), c);
    }

    #[test]
    fn test_validated_replaces_empty_world() {
        let c = ViewConfig {
            world: RasterDims::rgba(0, 400),
            ..ViewConfig::default()
        }
        .validated();
        assert_eq!(c.world, RasterDims::default());
    }

    #[test]
    fn test_validated_raises_zero_command_buffer() {
        let c = ViewConfig {
            command_buffer: 0,
            ..ViewConfig::default()
        }
        .validated();
        assert_eq!(c.command_buffer, 1);
    }

    #[test]
    fn test_validated_fixes_viewport() {
        let c = ViewConfig {
            viewport: ViewportConfig {
                zoom_step: 0.5,
                ..ViewportConfig::default()
            },
            ..ViewConfig::default()
        }
        .validated();
        assert_eq!(c.viewport.zoom_step, 1.1);
    }
}
