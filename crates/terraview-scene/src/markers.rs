//! Entity marker placement and tint.

use terraview_protocol::EntityState;

/// Tint used when an entity's colour is missing or malformed.
pub const DEFAULT_TINT: [u8; 3] = [255, 255, 255];

/// A marker in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// World x (column).
    pub x: f64,
    /// World y (row).
    pub y: f64,
    /// Heading in radians, `atan2(row velocity, column velocity)`.
    pub rotation: f64,
    pub tint: [u8; 3],
    pub investment: f64,
}

impl MarkerSpec {
    pub fn from_entity(entity: &EntityState) -> Self {
        let [row, col] = entity.position;
        let [vel_row, vel_col] = entity.velocity;
        Self {
            x: col,
            y: row,
            rotation: vel_row.atan2(vel_col),
            tint: entity
                .color
                .as_ref()
                .and_then(|c| c.to_rgb())
                .unwrap_or(DEFAULT_TINT),
            investment: entity.investment,
        }
    }
}
