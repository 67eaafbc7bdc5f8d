//! # terraview-scene
//!
//! The displayed scene: current raster, regions, entities and the derived
//! leaderboard ([`SceneState`]), and the [`Reconciler`] that mirrors them
//! into a [`Renderer`] with as little object churn as possible.
//!
//! ## Layers
//!
//! | layer | space | content |
//! |---|---|---|
//! | raster | world | one surface, texture rebound per frame |
//! | [`Layer::Labels`] | world | name + resource label per visible region |
//! | [`Layer::Leaderboard`] | screen | top regions by wealth |
//! | [`Layer::Entities`] | world | one marker per moving entity |

mod error;
mod headless;
pub mod labels;
pub mod leaderboard;
mod markers;
mod reconciler;
mod renderer;
mod scene;
mod state;

pub use error::{RenderError, ResourceKind};
pub use headless::{HeadlessRenderer, RenderStats};
pub use labels::{Anchor, LabelConfig, LabelSpec};
pub use leaderboard::{LeaderboardEntry, LeaderboardLine};
pub use markers::{DEFAULT_TINT, MarkerSpec};
pub use reconciler::{Layers, RasterBinding, Reconciler};
pub use renderer::{Layer, Overlay, OverlayId, Renderer, SurfaceId, TextureId};
pub use scene::{Scene, SceneConfig};
pub use state::SceneState;
