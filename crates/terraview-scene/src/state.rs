//! What is currently displayed, as plain data.

use terraview_protocol::{EntityState, RegionInfo};
use terraview_raster::GridRaster;

use crate::leaderboard::{self, DEFAULT_LEADERBOARD_SIZE, LeaderboardEntry};

/// The in-memory mirror of the scene. All setters replace wholesale.
#[derive(Debug, Clone)]
pub struct SceneState {
    raster: Option<GridRaster>,
    regions: Vec<RegionInfo>,
    entities: Vec<EntityState>,
    leaderboard: Vec<LeaderboardEntry>,
    leaderboard_size: usize,
}

impl SceneState {
    pub fn new(leaderboard_size: usize) -> Self {
        Self {
            raster: None,
            regions: Vec::new(),
            entities: Vec::new(),
            leaderboard: Vec::new(),
            leaderboard_size,
        }
    }

    /// Replaces the raster, returning the one it supersedes.
    pub fn set_raster(&mut self, raster: GridRaster) -> Option<GridRaster> {
        self.raster.replace(raster)
    }

    /// Replaces the regions and re-ranks the leaderboard from them.
    pub fn set_regions(&mut self, regions: Vec<RegionInfo>) {
        let ranking = self.rank(&regions);
        self.replace_regions(regions, ranking);
    }

    /// The leaderboard `regions` would produce, without applying them.
    pub fn rank(&self, regions: &[RegionInfo]) -> Vec<LeaderboardEntry> {
        leaderboard::rank(regions, self.leaderboard_size)
    }

    /// Installs regions together with a ranking computed by [`rank`](Self::rank).
    pub(crate) fn replace_regions(
        &mut self,
        regions: Vec<RegionInfo>,
        ranking: Vec<LeaderboardEntry>,
    ) {
        self.leaderboard = ranking;
        self.regions = regions;
    }

    pub fn set_entities(&mut self, entities: Vec<EntityState>) {
        self.entities = entities;
    }

    pub fn raster(&self) -> Option<&GridRaster> {
        self.raster.as_ref()
    }

    pub fn regions(&self) -> &[RegionInfo] {
        &self.regions
    }

    pub fn entities(&self) -> &[EntityState] {
        &self.entities
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.raster = None;
        self.regions.clear();
        self.entities.clear();
        self.leaderboard.clear();
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(DEFAULT_LEADERBOARD_SIZE)
    }
}
