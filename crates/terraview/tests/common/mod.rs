//! Frame builders shared by the integration tests.
#![allow(dead_code)]

use base64::Engine;
use serde_json::json;
use terraview::raster::RasterDims;

pub const DIMS: RasterDims = RasterDims::rgba(600, 400);

/// A full raster with every byte set to `value`.
pub fn pixels(value: u8) -> Vec<u8> {
    vec![value; DIMS.byte_len()]
}

pub fn zlib(bytes: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(bytes, 6)
}

/// A `map` or `grid_update` frame carrying `bytes` as hex-encoded zlib.
pub fn raster_frame(kind: &str, bytes: &[u8]) -> Vec<u8> {
    json!({ "type": kind, "grid": hex::encode(zlib(bytes)) })
        .to_string()
        .into_bytes()
}

pub fn base64_raster_frame(kind: &str, bytes: &[u8]) -> Vec<u8> {
    let grid = base64::engine::general_purpose::STANDARD.encode(zlib(bytes));
    json!({ "type": kind, "grid": grid, "encoding": "base64" })
        .to_string()
        .into_bytes()
}

pub fn region_a_frame() -> Vec<u8> {
    json!({
        "type": "square_info",
        "square_info": [{
            "id": 1,
            "name": "A",
            "resources": 5,
            "area": 240000,
            "average_land_value": 1.0,
            "center_of_mass": [200, 300]
        }]
    })
    .to_string()
    .into_bytes()
}

pub fn empty_regions_frame() -> Vec<u8> {
    br#"{"type":"square_info","square_info":[]}"#.to_vec()
}
