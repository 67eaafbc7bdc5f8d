//! Wealth ranking of regions.

use std::fmt;

use terraview_protocol::RegionInfo;

/// Default number of entries shown.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// One ranked region.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub region_id: u64,
    pub name: String,
    pub area: u64,
    pub wealth: f64,
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} ({}, ${:.0})",
            self.rank, self.name, self.area, self.wealth
        )
    }
}

/// A rendered leaderboard row. `slot` is the 0-based row from the top.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardLine {
    pub slot: usize,
    pub text: String,
}

/// Ranks regions by `area × average_land_value`, descending, keeping the
/// input order for ties, truncated to `limit`.
pub fn rank(regions: &[RegionInfo], limit: usize) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<(f64, &RegionInfo)> = regions.iter().map(|r| (r.wealth(), r)).collect();
    // `sort_by` is stable.
    ordered.sort_by(|a, b| b.0.total_cmp(&a.0));

    ordered
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (wealth, region))| LeaderboardEntry {
            rank: i + 1,
            region_id: region.id,
            name: region.display_name().into_owned(),
            area: region.area,
            wealth,
        })
        .collect()
}

/// Turns ranked entries into display rows.
pub fn lines(entries: &[LeaderboardEntry]) -> Vec<LeaderboardLine> {
    entries
        .iter()
        .enumerate()
        .map(|(slot, entry)| LeaderboardLine {
            slot,
            text: entry.to_string(),
        })
        .collect()
}
