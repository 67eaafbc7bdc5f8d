//! Applies scene changes to a [`Renderer`] with the fewest object changes.
//!
//! The raster surface is created once and rebound per frame. Overlay
//! layers are regenerated wholesale, since every message replaces its
//! whole collection. A new layer is built in full before the old one is
//! released, so a failed update leaves the previous overlays on screen.

use terraview_protocol::{EntityState, RegionInfo};
use terraview_raster::{GridRaster, RasterDims};
use tracing::{debug, trace};

use crate::labels::{self, LabelConfig};
use crate::leaderboard::{self, LeaderboardEntry};
use crate::{Layer, MarkerSpec, Overlay, OverlayId, RenderError, Renderer, SurfaceId, TextureId};

/// The surface and the texture currently bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterBinding {
    pub surface: SurfaceId,
    pub texture: TextureId,
}

/// Named handles for every layer of the scene.
#[derive(Debug, Default)]
pub struct Layers {
    pub raster: Option<RasterBinding>,
    pub labels: Vec<OverlayId>,
    pub leaderboard: Vec<OverlayId>,
    pub entities: Vec<OverlayId>,
}

impl Layers {
    fn overlays_mut(&mut self, layer: Layer) -> &mut Vec<OverlayId> {
        match layer {
            Layer::Labels => &mut self.labels,
            Layer::Leaderboard => &mut self.leaderboard,
            Layer::Entities => &mut self.entities,
        }
    }

    pub fn overlay_count(&self) -> usize {
        self.labels.len() + self.leaderboard.len() + self.entities.len()
    }
}

#[derive(Debug)]
pub struct Reconciler {
    dims: RasterDims,
    labels: LabelConfig,
    layers: Layers,
}

impl Reconciler {
    pub fn new(dims: RasterDims, labels: LabelConfig) -> Self {
        Self {
            dims,
            labels,
            layers: Layers::default(),
        }
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    /// Shows a new raster.
    ///
    /// The new texture is created and bound before the old one is
    /// released, so there is never a blank frame in between. On failure
    /// the previous texture stays bound.
    pub fn raster<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        raster: &GridRaster,
    ) -> Result<(), RenderError> {
        let texture = renderer.create_texture(raster)?;

        match self.layers.raster {
            None => {
                let surface = match renderer.create_surface(texture) {
                    Ok(surface) => surface,
                    Err(e) => {
                        renderer.release_texture(texture);
                        return Err(e);
                    }
                };
                debug!(%surface, %texture, "raster surface created");
                self.layers.raster = Some(RasterBinding { surface, texture });
            }
            Some(RasterBinding {
                surface,
                texture: previous,
            }) => {
                if let Err(e) = renderer.bind_texture(surface, texture) {
                    renderer.release_texture(texture);
                    return Err(e);
                }
                renderer.release_texture(previous);
                trace!(%surface, %texture, %previous, "raster texture rebound");
                self.layers.raster = Some(RasterBinding { surface, texture });
            }
        }
        Ok(())
    }

    /// Regenerates region labels and the leaderboard.
    ///
    /// Both layers are built before either is swapped in. If any overlay
    /// fails to allocate, everything built so far is released and both
    /// layers keep their previous overlays.
    pub fn regions<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        regions: &[RegionInfo],
        ranking: &[LeaderboardEntry],
    ) -> Result<(), RenderError> {
        let (dims, config) = (self.dims, self.labels);
        let label_overlays = regions
            .iter()
            .filter_map(|r| labels::layout(r, dims, &config))
            .flatten()
            .map(Overlay::Label);
        let label_ids = build_layer(renderer, Layer::Labels, label_overlays)?;

        let lines = leaderboard::lines(ranking).into_iter().map(Overlay::Leaderboard);
        let lines = match build_layer(renderer, Layer::Leaderboard, lines) {
            Ok(lines) => lines,
            Err(e) => {
                release(renderer, label_ids);
                return Err(e);
            }
        };

        self.swap_layer(renderer, Layer::Labels, label_ids);
        self.swap_layer(renderer, Layer::Leaderboard, lines);
        debug!(
            regions = regions.len(),
            labels = self.layers.labels.len(),
            leaderboard = self.layers.leaderboard.len(),
            "regions reconciled"
        );
        Ok(())
    }

    /// Regenerates entity markers. On failure the previous markers stay.
    pub fn entities<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        entities: &[EntityState],
    ) -> Result<(), RenderError> {
        let markers = entities.iter().map(|e| Overlay::Marker(MarkerSpec::from_entity(e)));
        let markers = build_layer(renderer, Layer::Entities, markers)?;
        self.swap_layer(renderer, Layer::Entities, markers);
        Ok(())
    }

    /// Releases every resource this reconciler holds. Safe to call twice.
    pub fn release_all<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        for layer in [Layer::Labels, Layer::Leaderboard, Layer::Entities] {
            self.clear_layer(renderer, layer);
        }
        if let Some(RasterBinding { surface, texture }) = self.layers.raster.take() {
            renderer.release_surface(surface);
            renderer.release_texture(texture);
        }
    }

    fn clear_layer<R: Renderer + ?Sized>(&mut self, renderer: &mut R, layer: Layer) {
        let ids = std::mem::take(self.layers.overlays_mut(layer));
        release(renderer, ids);
    }

    /// Installs `ids` as the layer's overlays and releases the old ones.
    fn swap_layer<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        layer: Layer,
        ids: Vec<OverlayId>,
    ) {
        let previous = std::mem::replace(self.layers.overlays_mut(layer), ids);
        release(renderer, previous);
    }
}

/// Allocates every overlay of a layer. On the first failure the ones
/// already created are released and the error is returned.
fn build_layer<R, I>(
    renderer: &mut R,
    layer: Layer,
    overlays: I,
) -> Result<Vec<OverlayId>, RenderError>
where
    R: Renderer + ?Sized,
    I: IntoIterator<Item = Overlay>,
{
    let mut built = Vec::new();
    for overlay in overlays {
        match renderer.create_overlay(layer, &overlay) {
            Ok(id) => built.push(id),
            Err(e) => {
                trace!(?layer, built = built.len(), "layer allocation failed, rolling back");
                release(renderer, built);
                return Err(e);
            }
        }
    }
    Ok(built)
}

fn release<R: Renderer + ?Sized>(renderer: &mut R, ids: Vec<OverlayId>) {
    for id in ids {
        renderer.release_overlay(id);
    }
}
