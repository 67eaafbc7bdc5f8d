//! Message types the simulation server streams to the live view.
//!
//! Every frame is a JSON object with a `type` discriminant:
//!
//! ```text
//! { "type": "map",           "grid": "<hex>" }
//! { "type": "initial_state", "width": 600, "height": 400, "cells": [[x, y, color], …] }
//! { "type": "grid_update",   "grid": "<hex>" }
//! { "type": "square_info",   "square_info": [ {RegionInfo}, … ] }
//! { "type": "update",        "entities": [ {EntityState}, … ] }
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};

use crate::RasterPayload;

/// Discriminants this client understands. Anything else is ignored.
pub const KNOWN_KINDS: [&str; 5] = ["map", "initial_state", "grid_update", "square_info", "update"];

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// A decoded inbound message.
///
/// Every variant is a full replacement of the state it carries; the
/// protocol has no partial/merge messages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Authoritative replacement of the whole raster.
    Map(RasterPayload),

    /// Sparse bootstrap form, sent before a compressed snapshot exists.
    InitialState(InitialState),

    /// Full-frame raster replacement sent on every simulation tick.
    GridUpdate(RasterPayload),

    /// Replacement of the whole region collection.
    SquareInfo { square_info: Vec<RegionInfo> },

    /// Replacement of the whole entity list.
    Update {
        #[serde(alias = "attack_movements")]
        entities: Vec<EntityState>,
    },
}

impl ServerMessage {
    /// The wire discriminant of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Map(_) => "map",
            Self::InitialState(_) => "initial_state",
            Self::GridUpdate(_) => "grid_update",
            Self::SquareInfo { .. } => "square_info",
            Self::Update { .. } => "update",
        }
    }
}

// ---------------------------------------------------------------------------
// Sparse bootstrap
// ---------------------------------------------------------------------------

/// The `initial_state` payload: grid dimensions plus every non-empty cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitialState {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
}

/// One `[x, y, color]` cell triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Cell(pub u32, pub u32, pub CellColor);

impl Cell {
    pub fn x(&self) -> u32 {
        self.0
    }

    pub fn y(&self) -> u32 {
        self.1
    }

    pub fn color(&self) -> CellColor {
        self.2
    }
}

/// Colour of a sparse cell.
///
/// Accepted forms: packed `0xRRGGBBAA` integer, `[r, g, b, a]`, or
/// `[r, g, b]` (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CellColor {
    Packed(u32),
    Rgba([u8; 4]),
    Rgb([u8; 3]),
}

impl CellColor {
    /// Returns the colour as RGBA bytes.
    pub fn to_rgba(self) -> [u8; 4] {
        match self {
            Self::Packed(v) => v.to_be_bytes(),
            Self::Rgba(c) => c,
            Self::Rgb([r, g, b]) => [r, g, b, u8::MAX],
        }
    }
}

// ---------------------------------------------------------------------------
// RegionInfo
// ---------------------------------------------------------------------------

/// Aggregate stats for one territorial region.
///
/// `name`, `area` and `average_land_value` default when absent: older
/// servers only send `id`, `resources` and `center_of_mass`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionInfo {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub resources: i64,
    #[serde(default)]
    pub area: u64,
    #[serde(default)]
    pub average_land_value: f64,
    /// Centroid as (row, column) in world pixels.
    pub center_of_mass: [f64; 2],
}

impl RegionInfo {
    /// The ranking metric: `area × average_land_value`.
    pub fn wealth(&self) -> f64 {
        self.area as f64 * self.average_land_value
    }

    /// The name to display, falling back to `#<id>` for unnamed regions.
    pub fn display_name(&self) -> Cow<'_, str> {
        if self.name.is_empty() {
            Cow::Owned(format!("#{}", self.id))
        } else {
            Cow::Borrowed(&self.name)
        }
    }

    pub fn row(&self) -> f64 {
        self.center_of_mass[0]
    }

    pub fn col(&self) -> f64 {
        self.center_of_mass[1]
    }
}

// ---------------------------------------------------------------------------
// EntityState
// ---------------------------------------------------------------------------

/// One moving unit. No identity is tracked across updates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityState {
    /// (row, column) in world pixels.
    pub position: [f64; 2],
    /// (row delta, column delta) per tick.
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub investment: f64,
    #[serde(default)]
    pub color: Option<EntityColor>,
}

/// An entity's colour as sent by the server.
///
/// Decoding never fails on the colour: anything that isn't a list of
/// numbers becomes [`EntityColor::Malformed`] so one bad entity cannot
/// drop the whole update.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityColor {
    Channels(Vec<f64>),
    Malformed,
}

impl<'de> Deserialize<'de> for EntityColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Channels(Vec<f64>),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Channels(channels) => Self::Channels(channels),
            Raw::Other(_) => Self::Malformed,
        })
    }
}

impl EntityColor {
    /// Returns the first three channels clamped to 0–255, or `None` if the
    /// colour is malformed or has fewer than three channels.
    pub fn to_rgb(&self) -> Option<[u8; 3]> {
        match self {
            Self::Channels(c) if c.len() >= 3 => {
                let clamp = |v: f64| v.round().clamp(0.0, 255.0) as u8;
                Some([clamp(c[0]), clamp(c[1]), clamp(c[2])])
            }
            _ => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
