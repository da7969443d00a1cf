//! Decoded RGB elevation rasters.
//!
//! Elevation is packed into the three 8-bit color channels following the
//! Mapbox Terrain-RGB convention:
//!
//! ```text
//! elevation = -10000 + (R * 256 * 256 + G * 256 + B) * 0.1
//! ```

use crate::{DemError, Result};
use std::path::Path;

/// Lowest elevation representable in a Terrain-RGB pixel, in meters.
pub const TERRAIN_RGB_BASE: f64 = -10_000.0;

/// Elevation resolution of a Terrain-RGB pixel, in meters.
pub const TERRAIN_RGB_RESOLUTION: f64 = 0.1;

/// Decode a Terrain-RGB pixel into meters.
pub fn decode_elevation(rgb: [u8; 3]) -> f64 {
    let packed = u32::from(rgb[0]) * 65_536 + u32::from(rgb[1]) * 256 + u32::from(rgb[2]);
    TERRAIN_RGB_BASE + f64::from(packed) * TERRAIN_RGB_RESOLUTION
}

/// Encode meters into the nearest Terrain-RGB pixel.
///
/// Values outside the representable range are clamped.
pub fn encode_elevation(meters: f64) -> [u8; 3] {
    let packed = ((meters - TERRAIN_RGB_BASE) / TERRAIN_RGB_RESOLUTION)
        .round()
        .clamp(0.0, f64::from(0x00FF_FFFFu32)) as u32;
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}

/// An RGB raster in row-major order (north to south, west to east).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    width: u32,
    height: u32,
    /// Three bytes per pixel.
    data: Vec<u8>,
}

impl RgbRaster {
    /// Wrap an interleaved RGB buffer.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(DemError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a raster by evaluating `pixel(col, row)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut pixel: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for row in 0..height {
            for col in 0..width {
                data.extend_from_slice(&pixel(col, row));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a raster from an elevation function given in meters.
    pub fn from_elevation_fn(size: u32, mut meters: impl FnMut(u32, u32) -> f64) -> Self {
        Self::from_fn(size, size, |col, row| encode_elevation(meters(col, row)))
    }

    /// Decode a PNG file. Alpha channels and palettes are flattened to RGB.
    pub fn from_png_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| DemError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_rgb(width, height, rgb.into_raw())
    }

    /// Encode this raster as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|source| DemError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the dimensions of this raster in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Fail unless the raster is `size` pixels on each side.
    pub fn ensure_square(&self, size: usize) -> Result<()> {
        if self.width as usize != size || self.height as usize != size {
            return Err(DemError::InvalidDimensions {
                expected: size as u32,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Raw channels of the pixel at `(col, row)`.
    pub fn rgb(&self, col: usize, row: usize) -> [u8; 3] {
        let idx = (row * self.width as usize + col) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Decoded elevation in meters at `(col, row)`.
    pub fn elevation(&self, col: usize, row: usize) -> f64 {
        decode_elevation(self.rgb(col, row))
    }
}
