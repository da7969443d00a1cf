//! Slippy-map tile coordinates.
//!
//! Uses the OpenStreetMap Slippy Map tile naming convention:
//! - `z` is the zoom level
//! - `x` is the column (0 to 2^z - 1, from west to east)
//! - `y` is the row (0 to 2^z - 1, from north to south)
//!
//! Elevation tiles are stored on disk as `{root}/{z}/{x}/{y}.png`, and the
//! generated geometry lands in the mirrored `{root}/{z}/{x}/{y}.geojson`.

use crate::{DemError, Result};
use std::f64::consts::PI;
use std::fmt;
use std::path::{Path, PathBuf};

/// Minimum valid zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Maximum valid zoom level.
pub const MAX_ZOOM: u8 = 24;

/// OSM-style tile coordinates (z, x, y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level.
    pub z: u8,
    /// X coordinate (column, 0 at 180°W, increases eastward).
    pub x: u32,
    /// Y coordinate (row, 0 at ~85.05°N, increases southward).
    pub y: u32,
}

impl TileCoord {
    /// Create a new tile coordinate, checking it lies on the zoom's grid.
    pub fn new(z: u8, x: u32, y: u32) -> Result<Self> {
        if z > MAX_ZOOM {
            return Err(DemError::InvalidZoomLevel(z));
        }
        let tiles = Self::tiles_per_axis(z);
        if u64::from(x) >= tiles || u64::from(y) >= tiles {
            return Err(DemError::TileOutOfRange { z, x, y });
        }
        Ok(Self { z, x, y })
    }

    /// Number of tiles along one axis at zoom `z`.
    fn tiles_per_axis(z: u8) -> u64 {
        1u64 << z
    }

    /// Convert latitude/longitude to the tile containing it.
    ///
    /// - x = floor((lon + 180) / 360 * 2^z)
    /// - y = floor((1 - ln(tan(lat) + sec(lat)) / π) / 2 * 2^z)
    pub fn from_lat_lon(lat: f64, lon: f64, z: u8) -> Result<Self> {
        if z > MAX_ZOOM {
            return Err(DemError::InvalidZoomLevel(z));
        }

        // The exact Web Mercator limit is ±85.0511287798° (arctan(sinh(π)))
        let lat_clamped = lat.clamp(-85.0511, 85.0511);

        let n = Self::tiles_per_axis(z) as f64;
        let x = ((lon + 180.0) / 360.0 * n).floor();
        let lat_rad = lat_clamped.to_radians();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

        // Clamp to valid range (handles edge cases at exactly ±180°)
        let max_coord = n - 1.0;
        let x = x.clamp(0.0, max_coord) as u32;
        let y = y.clamp(0.0, max_coord) as u32;

        Ok(Self { z, x, y })
    }

    /// The tile offset by `(dx, dy)` at the same zoom, if it exists.
    ///
    /// There is no wrap-around at the antimeridian; a neighbor off the edge
    /// of the tile grid is simply absent.
    pub fn neighbor(&self, dx: i64, dy: i64) -> Option<Self> {
        let x = i64::from(self.x) + dx;
        let y = i64::from(self.y) + dy;
        let tiles = Self::tiles_per_axis(self.z) as i64;
        if x < 0 || y < 0 || x >= tiles || y >= tiles {
            return None;
        }
        Some(Self {
            z: self.z,
            x: x as u32,
            y: y as u32,
        })
    }

    /// Geographic bounds of this tile in degrees.
    pub fn bounds(&self) -> crate::BoundingBox {
        let n = Self::tiles_per_axis(self.z) as f64;

        let west = f64::from(self.x) / n * 360.0 - 180.0;
        let east = f64::from(self.x + 1) / n * 360.0 - 180.0;

        // Inverse of the Slippy Map latitude formula
        let north = (PI * (1.0 - 2.0 * f64::from(self.y) / n)).sinh().atan().to_degrees();
        let south = (PI * (1.0 - 2.0 * f64::from(self.y + 1) / n)).sinh().atan().to_degrees();

        crate::BoundingBox {
            west,
            south,
            east,
            north,
        }
    }

    /// Path of this tile below `root` with the given file extension.
    pub fn path_in(&self, root: &Path, extension: &str) -> PathBuf {
        root.join(self.z.to_string())
            .join(self.x.to_string())
            .join(format!("{}.{}", self.y, extension))
    }

    /// Parse a tile from the last three components of a `{z}/{x}/{y}.{ext}` path.
    ///
    /// Returns `None` when the components are not numeric or do not form a
    /// valid tile.
    pub fn from_path(path: &Path) -> Option<Self> {
        let y: u32 = path.file_stem()?.to_str()?.parse().ok()?;
        let x_dir = path.parent()?;
        let x: u32 = x_dir.file_name()?.to_str()?.parse().ok()?;
        let z: u8 = x_dir.parent()?.file_name()?.to_str()?.parse().ok()?;
        Self::new(z, x, y).ok()
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
