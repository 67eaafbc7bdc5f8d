//! # terraview-viewport
//!
//! Maps the fixed-size world raster onto a resizable screen surface.
//!
//! - [`ViewportTransform`]: uniform scale plus translation.
//! - [`ViewportController`]: turns [`InputEvent`]s into transform changes
//!   (zoom around the cursor, drag to pan, fit on resize).
//! - [`ViewportConfig`]: zoom step and limits.

mod config;
mod controller;
mod transform;

pub use config::ViewportConfig;
pub use controller::{InputEvent, ViewportController};
pub use transform::{Point, ViewportTransform};
