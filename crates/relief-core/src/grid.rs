//! Halo-padded elevation grid.
//!
//! A grid for a tile of `size` pixels holds `(size + 2) x (size + 2)`
//! samples. Row 0, row `size + 1`, column 0 and column `size + 1` form a
//! one-cell halo sourced from the neighboring tiles; the tile's own pixels
//! occupy rows and columns `1..=size`.

use crate::geometry::Point;

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Longitude of the pixel center.
    pub lon: f64,
    /// Latitude of the pixel center.
    pub lat: f64,
    /// Elevation in the configured unit; `None` where no raster covered the
    /// cell. Coordinates of a `None` cell are meaningless.
    pub elevation: Option<f64>,
}

impl Sample {
    /// A sample with data.
    pub fn new(lon: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: Some(elevation),
        }
    }

    /// Position as `[lon, lat]`.
    pub fn point(&self) -> Point {
        [self.lon, self.lat]
    }
}

/// Dense row-major sample grid for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    samples: Vec<Sample>,
}

impl Grid {
    /// An empty grid: every sample lacks elevation data.
    pub fn new(size: usize) -> Self {
        let dim = size + 2;
        Self {
            size,
            samples: vec![Sample::default(); dim * dim],
        }
    }

    /// Build a grid by evaluating `sample(row, col)` for every cell,
    /// halo included.
    pub fn from_fn(size: usize, mut sample: impl FnMut(usize, usize) -> Sample) -> Self {
        let dim = size + 2;
        let mut samples = Vec::with_capacity(dim * dim);
        for row in 0..dim {
            for col in 0..dim {
                samples.push(sample(row, col));
            }
        }
        Self { size, samples }
    }

    /// Tile resolution N (interior edge length).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Edge length including the halo, `N + 2`.
    pub fn dim(&self) -> usize {
        self.size + 2
    }

    /// Flat index of `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.dim() + col
    }

    /// Sample at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> &Sample {
        &self.samples[self.index(row, col)]
    }

    /// Mutable sample at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut Sample {
        let idx = self.index(row, col);
        &mut self.samples[idx]
    }

    /// Elevation at `(row, col)`, if present.
    pub fn elevation(&self, row: usize, col: usize) -> Option<f64> {
        self.get(row, col).elevation
    }

    /// Lowest and highest elevation over all cells with data.
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| s.elevation)
            .fold(None, |range, elev| match range {
                None => Some((elev, elev)),
                Some((min, max)) => Some((min.min(elev), max.max(elev))),
            })
    }

    /// Number of cells with elevation data.
    pub fn filled(&self) -> usize {
        self.samples.iter().filter(|s| s.elevation.is_some()).count()
    }
}
