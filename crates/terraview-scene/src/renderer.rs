//! The renderer seam.
//!
//! The reconciler only ever talks to a backend through [`Renderer`], so a
//! GPU backend, a canvas backend and the [`HeadlessRenderer`] used in tests
//! are interchangeable.
//!
//! [`HeadlessRenderer`]: crate::HeadlessRenderer

use std::fmt;

use terraview_raster::GridRaster;
use terraview_viewport::ViewportTransform;

use crate::{LabelSpec, LeaderboardLine, MarkerSpec, RenderError};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

handle!(
    /// A GPU texture holding one raster's pixels.
    TextureId,
    "tex"
);
handle!(
    /// The long-lived display object the raster texture is bound to.
    SurfaceId,
    "surf"
);
handle!(
    /// A label, leaderboard line or entity marker.
    OverlayId,
    "ovl"
);

/// Overlay layers, drawn in this order above the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Region labels, in world space.
    Labels,
    /// The leaderboard, in screen space; ignores the viewport transform.
    Leaderboard,
    /// Entity markers, in world space.
    Entities,
}

impl Layer {
    /// Returns `true` if the layer is drawn under the viewport transform.
    pub fn is_world_space(self) -> bool {
        !matches!(self, Self::Leaderboard)
    }
}

/// What an overlay draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Label(LabelSpec),
    Leaderboard(LeaderboardLine),
    Marker(MarkerSpec),
}

/// A rendering backend.
///
/// Every `create_*` call must eventually be paired with exactly one
/// matching `release_*` call. Releasing is infallible; backends log
/// unknown handles instead of failing.
pub trait Renderer {
    /// Uploads a raster into a new texture.
    fn create_texture(&mut self, raster: &GridRaster) -> Result<TextureId, RenderError>;

    fn release_texture(&mut self, texture: TextureId);

    /// Creates the raster display surface, initially showing `texture`.
    fn create_surface(&mut self, texture: TextureId) -> Result<SurfaceId, RenderError>;

    /// Rebinds an existing surface to a different texture.
    fn bind_texture(&mut self, surface: SurfaceId, texture: TextureId) -> Result<(), RenderError>;

    fn release_surface(&mut self, surface: SurfaceId);

    fn create_overlay(&mut self, layer: Layer, overlay: &Overlay) -> Result<OverlayId, RenderError>;

    fn release_overlay(&mut self, overlay: OverlayId);

    /// Composes the raster and world-space layers under `transform`, the
    /// leaderboard on top, and shows the frame.
    fn present(&mut self, transform: &ViewportTransform) -> Result<(), RenderError>;
}
