//! # relief-dem
//!
//! Slippy-map tile addressing and elevation raster input.
//!
//! This crate provides:
//! - [`TileCoord`]: `z/x/y` tile coordinates, neighbor lookup and on-disk paths
//! - [`Projector`] and [`BoundingBox`]: the tile-to-lon/lat projection
//! - [`RgbRaster`]: decoded Terrain-RGB rasters, read from PNG files
//! - [`RasterSource`]: the seam the contour engine pulls rasters through, with
//!   a directory-backed ([`TileDirectory`]) and an in-memory
//!   ([`MemoryRasterSource`]) implementation
//!
//! ## Example
//!
//! ```no_run
//! use relief_dem::{RasterSource, TileCoord, TileDirectory};
//!
//! let tiles = TileDirectory::new("./hillshades");
//! for coord in tiles.discover()? {
//!     if let Some(raster) = tiles.load(coord)? {
//!         println!("{}: {:?}", coord, raster.dimensions());
//!     }
//! }
//! # Ok::<(), relief_dem::DemError>(())
//! ```

mod coord;
mod error;
mod projection;
mod raster;
mod source;

pub use coord::{TileCoord, MAX_ZOOM, MIN_ZOOM};
pub use error::DemError;
pub use projection::{BoundingBox, Projector};
pub use raster::{
    decode_elevation, encode_elevation, RgbRaster, TERRAIN_RGB_BASE, TERRAIN_RGB_RESOLUTION,
};
pub use source::{MemoryRasterSource, RasterSource, TileDirectory, TILE_EXTENSION};

/// Result type for DEM operations.
pub type Result<T> = std::result::Result<T, DemError>;
