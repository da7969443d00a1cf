//! Tile-to-geographic projection.
//!
//! Pixels inside a tile are placed linearly between the tile's bounding
//! box edges. Raster row 0 is the northern edge, so latitude decreases as the
//! row index grows.

use crate::TileCoord;

/// Geographic bounds of a tile in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge (minimum longitude).
    pub west: f64,
    /// Southern edge (minimum latitude).
    pub south: f64,
    /// Eastern edge (maximum longitude).
    pub east: f64,
    /// Northern edge (maximum latitude).
    pub north: f64,
}

impl BoundingBox {
    /// Check if a coordinate is within the bounds (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Check if a coordinate lies strictly inside the bounds.
    pub fn contains_strictly(&self, lat: f64, lon: f64) -> bool {
        lat > self.south && lat < self.north && lon > self.west && lon < self.east
    }
}

/// Maps tiles of a fixed pixel size to geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projector {
    size: usize,
}

impl Projector {
    /// Create a projector for square tiles of `size` pixels.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Tile edge length in pixels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bounding box of a tile.
    pub fn bounding_box(&self, coord: TileCoord) -> BoundingBox {
        coord.bounds()
    }

    /// Degrees covered by one pixel, as `(lon_step, lat_step)`.
    pub fn pixel_step(&self, bbox: &BoundingBox) -> (f64, f64) {
        let size = self.size as f64;
        ((bbox.east - bbox.west) / size, (bbox.north - bbox.south) / size)
    }

    /// Geographic position `(lon, lat)` of the center of pixel `(col, row)`.
    pub fn pixel_center(&self, bbox: &BoundingBox, col: usize, row: usize) -> (f64, f64) {
        let (lon_step, lat_step) = self.pixel_step(bbox);
        (
            bbox.west + (col as f64 + 0.5) * lon_step,
            bbox.north - (row as f64 + 0.5) * lat_step,
        )
    }
}
