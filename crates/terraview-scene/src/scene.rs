//! [`Scene`]: state plus reconciler plus the renderer that owns the pixels.

use terraview_protocol::{EntityState, RegionInfo};
use terraview_raster::{GridRaster, RasterDims};
use terraview_viewport::ViewportTransform;
use tracing::{debug, info};

use crate::leaderboard::DEFAULT_LEADERBOARD_SIZE;
use crate::{LabelConfig, Layers, Reconciler, RenderError, Renderer, SceneState};

/// Presentation settings for a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub labels: LabelConfig,
    pub leaderboard_size: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            labels: LabelConfig::default(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

/// The displayed scene.
///
/// Each setter replaces one collection in [`SceneState`] and runs the
/// matching reconcile step. After [`teardown`](Self::teardown) every
/// renderer resource has been released exactly once and all further
/// calls fail with [`RenderError::TornDown`].
///
/// Dropping a scene tears it down.
#[derive(Debug)]
pub struct Scene<R: Renderer> {
    state: SceneState,
    reconciler: Reconciler,
    renderer: Option<R>,
    torn_down: bool,
}

/// The renderer, unless the scene is torn down.
fn live<R>(renderer: &mut Option<R>, torn_down: bool) -> Result<&mut R, RenderError> {
    match renderer {
        Some(renderer) if !torn_down => Ok(renderer),
        _ => Err(RenderError::TornDown),
    }
}

impl<R: Renderer> Scene<R> {
    pub fn new(renderer: R, dims: RasterDims, config: SceneConfig) -> Self {
        Self {
            state: SceneState::new(config.leaderboard_size),
            reconciler: Reconciler::new(dims, config.labels),
            renderer: Some(renderer),
            torn_down: false,
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn layers(&self) -> &Layers {
        self.reconciler.layers()
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Displays a new raster. On failure the previous raster stays both
    /// displayed and current.
    pub fn set_raster(&mut self, raster: GridRaster) -> Result<(), RenderError> {
        let renderer = live(&mut self.renderer, self.torn_down)?;
        self.reconciler.raster(renderer, &raster)?;
        self.state.set_raster(raster);
        Ok(())
    }

    /// Redraws labels and the leaderboard for `regions`, then makes them
    /// current. On failure the previous regions stay both displayed and
    /// current.
    pub fn set_regions(&mut self, regions: Vec<RegionInfo>) -> Result<(), RenderError> {
        let renderer = live(&mut self.renderer, self.torn_down)?;
        let ranking = self.state.rank(&regions);
        self.reconciler.regions(renderer, &regions, &ranking)?;
        self.state.replace_regions(regions, ranking);
        Ok(())
    }

    /// Redraws entity markers, then makes `entities` current. On failure
    /// the previous markers stay.
    pub fn set_entities(&mut self, entities: Vec<EntityState>) -> Result<(), RenderError> {
        let renderer = live(&mut self.renderer, self.torn_down)?;
        self.reconciler.entities(renderer, &entities)?;
        self.state.set_entities(entities);
        Ok(())
    }

    pub fn present(&mut self, transform: &ViewportTransform) -> Result<(), RenderError> {
        let renderer = live(&mut self.renderer, self.torn_down)?;
        renderer.present(transform)
    }

    /// Releases every renderer resource. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(renderer) = self.renderer.as_mut() {
            self.reconciler.release_all(renderer);
        }
        self.state.clear();
        info!("scene torn down");
    }

    /// Tears the scene down and hands back the renderer.
    ///
    /// Returns `None` if the renderer was already taken.
    pub fn into_renderer(mut self) -> Option<R> {
        self.teardown();
        let renderer = self.renderer.take();
        debug!(returned = renderer.is_some(), "renderer released from scene");
        renderer
    }
}

impl<R: Renderer> Drop for Scene<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
