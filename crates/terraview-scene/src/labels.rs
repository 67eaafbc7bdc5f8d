//! Region label sizing and placement.

use terraview_protocol::RegionInfo;
use terraview_raster::RasterDims;

/// Sizing rules for region labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelConfig {
    /// Multiplier applied to `sqrt(area / world_area)`.
    pub font_scale: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Labels at or below this size are not drawn at all.
    pub visibility_threshold: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_scale: 100.0,
            min_font_size: 2.0,
            max_font_size: 24.0,
            visibility_threshold: 3.0,
        }
    }
}

impl LabelConfig {
    /// Font size for a region covering `area` pixels of the world.
    pub fn font_size(&self, area: u64, dims: RasterDims) -> f64 {
        let world = dims.area().max(1) as f64;
        let raw = (area as f64 / world).sqrt() * self.font_scale;
        raw.clamp(self.min_font_size, self.max_font_size.max(self.min_font_size))
    }

    pub fn is_visible(&self, font_size: f64) -> bool {
        font_size > self.visibility_threshold
    }
}

/// Which side of the centroid a label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Above,
    Below,
}

/// A text label in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub region_id: u64,
    pub text: String,
    /// World x (column).
    pub x: f64,
    /// World y (row).
    pub y: f64,
    pub anchor: Anchor,
    pub font_size: f64,
}

/// Lays out the name and resource labels for one region, or `None` if the
/// region is too small to read.
pub fn layout(
    region: &RegionInfo,
    dims: RasterDims,
    config: &LabelConfig,
) -> Option<[LabelSpec; 2]> {
    let font_size = config.font_size(region.area, dims);
    if !config.is_visible(font_size) {
        return None;
    }

    let label = |text: String, anchor| LabelSpec {
        region_id: region.id,
        text,
        x: region.col(),
        y: region.row(),
        anchor,
        font_size,
    };
    Some([
        label(region.display_name().into_owned(), Anchor::Above),
        label(region.resources.to_string(), Anchor::Below),
    ])
}
