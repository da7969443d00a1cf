//! Raster sources addressed by tile coordinate.

use crate::{Result, RgbRaster, TileCoord};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Something that can hand out the decoded raster for a tile.
///
/// A missing tile is not an error: `Ok(None)` means the dataset simply has
/// no raster at that coordinate. Errors are reserved for rasters that exist
/// but cannot be read.
pub trait RasterSource {
    /// Load the raster for `coord`, if the source has one.
    fn load(&self, coord: TileCoord) -> Result<Option<RgbRaster>>;
}

impl<T: RasterSource + ?Sized> RasterSource for &T {
    fn load(&self, coord: TileCoord) -> Result<Option<RgbRaster>> {
        (**self).load(coord)
    }
}

/// File extension of elevation tiles on disk.
pub const TILE_EXTENSION: &str = "png";

/// A directory of PNG elevation tiles laid out as `{root}/{z}/{x}/{y}.png`.
#[derive(Debug, Clone)]
pub struct TileDirectory {
    root: PathBuf,
}

impl TileDirectory {
    /// Create a source rooted at `root`. The directory is not read until used.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the tile pyramid.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a tile would have in this directory.
    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        coord.path_in(&self.root, TILE_EXTENSION)
    }

    /// Find every tile present below the root.
    ///
    /// Walks the whole tree and keeps files whose last three path components
    /// parse as `{z}/{x}/{y}.png`. The result is sorted.
    pub fn discover(&self) -> Result<Vec<TileCoord>> {
        let mut tiles = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();

                if entry.file_type()?.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == TILE_EXTENSION) {
                    match TileCoord::from_path(&path) {
                        Some(coord) => tiles.push(coord),
                        None => trace!(path = %path.display(), "ignoring non-tile file"),
                    }
                }
            }
        }

        tiles.sort();
        Ok(tiles)
    }
}

impl RasterSource for TileDirectory {
    fn load(&self, coord: TileCoord) -> Result<Option<RgbRaster>> {
        let path = self.tile_path(coord);
        if !path.exists() {
            return Ok(None);
        }
        RgbRaster::from_png_file(&path).map(Some)
    }
}

/// An in-memory set of rasters, mostly useful for tests and tools that
/// already hold decoded data.
#[derive(Debug, Clone, Default)]
pub struct MemoryRasterSource {
    rasters: HashMap<TileCoord, RgbRaster>,
}

impl MemoryRasterSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the raster for a tile.
    pub fn insert(&mut self, coord: TileCoord, raster: RgbRaster) {
        self.rasters.insert(coord, raster);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, coord: TileCoord, raster: RgbRaster) -> Self {
        self.insert(coord, raster);
        self
    }

    /// Number of rasters held.
    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    /// Whether the source holds no rasters.
    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }
}

impl RasterSource for MemoryRasterSource {
    fn load(&self, coord: TileCoord) -> Result<Option<RgbRaster>> {
        Ok(self.rasters.get(&coord).cloned())
    }
}

