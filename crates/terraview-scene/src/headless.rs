//! A renderer that draws nothing and keeps books.
//!
//! [`HeadlessRenderer`] tracks every live resource and counts creations
//! and releases, so tests can assert that a scene never leaks or double
//! frees. It can also be told to fail allocations.

use std::collections::{BTreeMap, HashMap};

use terraview_raster::GridRaster;
use terraview_viewport::ViewportTransform;
use tracing::error;

use crate::{
    Layer, Overlay, OverlayId, RenderError, Renderer, ResourceKind, SurfaceId, TextureId,
};

/// Creation and release counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub textures_created: usize,
    pub textures_released: usize,
    pub surfaces_created: usize,
    pub surfaces_released: usize,
    pub overlays_created: usize,
    pub overlays_released: usize,
    pub rebinds: usize,
    pub presents: usize,
    /// Releases of handles that were not live.
    pub bad_releases: usize,
}

impl RenderStats {
    /// Resources created but not yet released.
    pub fn live(&self) -> usize {
        let created = self.textures_created + self.surfaces_created + self.overlays_created;
        let released = self.textures_released + self.surfaces_released + self.overlays_released;
        created.saturating_sub(released)
    }
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_id: u64,
    textures: HashMap<TextureId, GridRaster>,
    surfaces: HashMap<SurfaceId, TextureId>,
    // Ordered by id, which is creation order.
    overlays: BTreeMap<OverlayId, (Layer, Overlay)>,
    stats: RenderStats,
    fail_textures: usize,
    fail_overlays: usize,
    overlay_budget: Option<usize>,
    last_transform: Option<ViewportTransform>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Makes the next `n` texture allocations fail.
    pub fn fail_next_textures(&mut self, n: usize) {
        self.fail_textures = n;
    }

    /// Makes the next `n` overlay allocations fail.
    pub fn fail_next_overlays(&mut self, n: usize) {
        self.fail_overlays = n;
    }

    /// Lets `n` more overlay allocations succeed, then fails every one
    /// after until the budget is lifted with `None`.
    pub fn limit_overlays(&mut self, n: Option<usize>) {
        self.overlay_budget = n;
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    pub fn live_overlays(&self) -> usize {
        self.overlays.len()
    }

    /// Returns `true` when nothing is live and nothing was released twice.
    pub fn is_clean(&self) -> bool {
        self.textures.is_empty()
            && self.surfaces.is_empty()
            && self.overlays.is_empty()
            && self.stats.bad_releases == 0
    }

    /// The raster bound to the (single) live surface, if any.
    pub fn displayed(&self) -> Option<&GridRaster> {
        let texture = self.surfaces.values().next()?;
        self.textures.get(texture)
    }

    /// Live overlays of one layer, in creation order.
    pub fn overlays(&self, layer: Layer) -> Vec<&Overlay> {
        self.overlays
            .values()
            .filter(|(l, _)| *l == layer)
            .map(|(_, o)| o)
            .collect()
    }

    /// Text of the live leaderboard rows, top to bottom.
    pub fn leaderboard_text(&self) -> Vec<String> {
        let mut rows: Vec<_> = self
            .overlays(Layer::Leaderboard)
            .into_iter()
            .filter_map(|o| match o {
                Overlay::Leaderboard(line) => Some((line.slot, line.text.clone())),
                _ => None,
            })
            .collect();
        rows.sort_by_key(|(slot, _)| *slot);
        rows.into_iter().map(|(_, text)| text).collect()
    }

    /// The transform passed to the last successful `present`.
    pub fn last_transform(&self) -> Option<ViewportTransform> {
        self.last_transform
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn bad_release(&mut self, kind: ResourceKind, id: u64) {
        self.stats.bad_releases += 1;
        error!(%kind, id, "release of unknown handle");
    }
}

impl Renderer for HeadlessRenderer {
    fn create_texture(&mut self, raster: &GridRaster) -> Result<TextureId, RenderError> {
        if self.fail_textures > 0 {
            self.fail_textures -= 1;
            return Err(RenderError::Allocation {
                kind: ResourceKind::Texture,
                reason: "injected failure".into(),
            });
        }
        let id = TextureId(self.next_id());
        self.textures.insert(id, raster.clone());
        self.stats.textures_created += 1;
        Ok(id)
    }

    fn release_texture(&mut self, texture: TextureId) {
        if self.surfaces.values().any(|bound| *bound == texture) {
            error!(%texture, "releasing a texture that is still bound");
        }
        if self.textures.remove(&texture).is_some() {
            self.stats.textures_released += 1;
        } else {
            self.bad_release(ResourceKind::Texture, texture.0);
        }
    }

    fn create_surface(&mut self, texture: TextureId) -> Result<SurfaceId, RenderError> {
        if !self.textures.contains_key(&texture) {
            return Err(RenderError::UnknownHandle {
                kind: ResourceKind::Texture,
                id: texture.0,
            });
        }
        let id = SurfaceId(self.next_id());
        self.surfaces.insert(id, texture);
        self.stats.surfaces_created += 1;
        Ok(id)
    }

    fn bind_texture(&mut self, surface: SurfaceId, texture: TextureId) -> Result<(), RenderError> {
        if !self.textures.contains_key(&texture) {
            return Err(RenderError::UnknownHandle {
                kind: ResourceKind::Texture,
                id: texture.0,
            });
        }
        let bound = self
            .surfaces
            .get_mut(&surface)
            .ok_or(RenderError::UnknownHandle {
                kind: ResourceKind::Surface,
                id: surface.0,
            })?;
        *bound = texture;
        self.stats.rebinds += 1;
        Ok(())
    }

    fn release_surface(&mut self, surface: SurfaceId) {
        if self.surfaces.remove(&surface).is_some() {
            self.stats.surfaces_released += 1;
        } else {
            self.bad_release(ResourceKind::Surface, surface.0);
        }
    }

    fn create_overlay(
        &mut self,
        layer: Layer,
        overlay: &Overlay,
    ) -> Result<OverlayId, RenderError> {
        let exhausted = self.overlay_budget == Some(0);
        if self.fail_overlays > 0 || exhausted {
            self.fail_overlays = self.fail_overlays.saturating_sub(1);
            return Err(RenderError::Allocation {
                kind: ResourceKind::Overlay,
                reason: "injected failure".into(),
            });
        }
        if let Some(budget) = self.overlay_budget.as_mut() {
            *budget -= 1;
        }
        let id = OverlayId(self.next_id());
        self.overlays.insert(id, (layer, overlay.clone()));
        self.stats.overlays_created += 1;
        Ok(id)
    }

    fn release_overlay(&mut self, overlay: OverlayId) {
        if self.overlays.remove(&overlay).is_some() {
            self.stats.overlays_released += 1;
        } else {
            self.bad_release(ResourceKind::Overlay, overlay.0);
        }
    }

    fn present(&mut self, transform: &ViewportTransform) -> Result<(), RenderError> {
        self.last_transform = Some(*transform);
        self.stats.presents += 1;
        Ok(())
    }
}
