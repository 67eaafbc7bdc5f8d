//! The fixed-size pixel grid and its dimensions.

use std::fmt;

use crate::CodecError;

/// Dimensions of the session raster. Constant for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterDims {
    pub width: u32,
    pub height: u32,
    /// Interleaved channels per pixel (4 for RGBA).
    pub channels: u8,
}

impl RasterDims {
    /// RGBA dimensions.
    pub const fn rgba(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: 4,
        }
    }

    /// Number of pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Exact size of an uncompressed buffer, `width × height × channels`.
    pub fn byte_len(&self) -> usize {
        self.area() as usize * usize::from(self.channels)
    }

    /// Returns `true` if `(x, y)` is inside the grid.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

impl Default for RasterDims {
    /// The simulation's default 600×400 RGBA world.
    fn default() -> Self {
        Self::rgba(600, 400)
    }
}

impl fmt::Display for RasterDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// An immutable, fully decoded raster.
///
/// Once built it is never mutated; a new frame replaces it wholesale.
#[derive(Clone, PartialEq, Eq)]
pub struct GridRaster {
    dims: RasterDims,
    pixels: Box<[u8]>,
}

impl GridRaster {
    /// Wraps an uncompressed buffer.
    ///
    /// # Errors
    /// `CodecError::SizeMismatch` unless `pixels.len() == dims.byte_len()`.
    pub fn new(dims: RasterDims, pixels: Vec<u8>) -> Result<Self, CodecError> {
        if pixels.len() != dims.byte_len() {
            return Err(CodecError::SizeMismatch {
                expected: dims.byte_len(),
                actual: pixels.len(),
            });
        }
        Ok(Self {
            dims,
            pixels: pixels.into_boxed_slice(),
        })
    }

    /// A fully transparent raster.
    pub fn blank(dims: RasterDims) -> Self {
        Self {
            dims,
            pixels: vec![0; dims.byte_len()].into_boxed_slice(),
        }
    }

    /// Rasterizes a sparse cell list. Unlisted pixels stay transparent;
    /// later cells overwrite earlier ones.
    ///
    /// Each colour is RGBA; only the first `dims.channels` bytes are used.
    ///
    /// # Errors
    /// `CodecError::CellOutOfBounds` for the first cell outside the grid.
    pub fn from_cells<I>(dims: RasterDims, cells: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (u32, u32, [u8; 4])>,
    {
        let mut pixels = vec![0u8; dims.byte_len()];
        let channels = usize::from(dims.channels);
        let used = channels.min(4);

        for (x, y, rgba) in cells {
            if !dims.contains(x, y) {
                return Err(CodecError::CellOutOfBounds {
                    x,
                    y,
                    width: dims.width,
                    height: dims.height,
                });
            }
            let offset = (y as usize * dims.width as usize + x as usize) * channels;
            pixels[offset..offset + used].copy_from_slice(&rgba[..used]);
        }

        Ok(Self {
            dims,
            pixels: pixels.into_boxed_slice(),
        })
    }

    pub fn dims(&self) -> RasterDims {
        self.dims
    }

    /// The raw interleaved buffer, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The channels of one pixel, or `None` outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if !self.dims.contains(x, y) {
            return None;
        }
        let channels = usize::from(self.dims.channels);
        let offset = (y as usize * self.dims.width as usize + x as usize) * channels;
        Some(&self.pixels[offset..offset + channels])
    }
}

impl fmt::Debug for GridRaster {
    // The buffer is hundreds of kilobytes; print the shape only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridRaster")
            .field("dims", &self.dims)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_byte_len() {
        let dims = RasterDims::default();
        assert_eq!(dims.area(), 240_000);
        assert_eq!(dims.byte_len(), 960_000);
        assert_eq!(dims.to_string(), "600x400x4");
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let dims = RasterDims::rgba(2, 2);
        let err = GridRaster::new(dims, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            CodecError::SizeMismatch {
                expected: 16,
                actual: 15
            }
        );
        assert_eq!(err.actual_size(), Some(15));
    }

    #[test]
    fn test_pixel_addressing_is_row_major() {
        let dims = RasterDims::rgba(3, 2);
        let pixels: Vec<u8> = (0..24).collect();
        let raster = GridRaster::new(dims, pixels).unwrap();
        assert_eq!(raster.pixel(0, 0), Some(&[0, 1, 2, 3][..]));
        assert_eq!(raster.pixel(2, 0), Some(&[8, 9, 10, 11][..]));
        assert_eq!(raster.pixel(0, 1), Some(&[12, 13, 14, 15][..]));
        assert_eq!(raster.pixel(3, 0), None);
    }

    #[test]
    fn test_from_cells_fills_listed_pixels_only() {
        let dims = RasterDims::rgba(4, 4);
        let raster =
            GridRaster::from_cells(dims, [(1, 2, [9, 8, 7, 6]), (3, 3, [1, 1, 1, 1])]).unwrap();
        assert_eq!(raster.pixel(1, 2), Some(&[9, 8, 7, 6][..]));
        assert_eq!(raster.pixel(3, 3), Some(&[1, 1, 1, 1][..]));
        assert_eq!(raster.pixel(0, 0), Some(&[0, 0, 0, 0][..]));
    }

    #[test]
    fn test_from_cells_rejects_out_of_bounds() {
        let dims = RasterDims::rgba(4, 4);
        let err = GridRaster::from_cells(dims, [(4, 0, [0; 4])]).unwrap_err();
        assert!(matches!(err, CodecError::CellOutOfBounds { x: 4, y: 0, .. }));
    }

    #[test]
    fn test_from_cells_with_three_channels() {
        let dims = RasterDims {
            width: 2,
            height: 1,
            channels: 3,
        };
        let raster = GridRaster::from_cells(dims, [(1, 0, [5, 6, 7, 8])]).unwrap();
        assert_eq!(raster.pixels(), &[0, 0, 0, 5, 6, 7]);
    }

    #[test]
    fn test_debug_omits_buffer() {
        let raster = GridRaster::blank(RasterDims::rgba(10, 10));
        let debug = format!("{raster:?}");
        assert!(debug.contains("bytes: 400"));
    }
}
