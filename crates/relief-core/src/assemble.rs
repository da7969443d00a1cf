//! Grid assembly from a tile and its eight neighbors.
//!
//! The center tile fills the grid interior. Each neighbor contributes only
//! the pixels touching the center tile: a one-pixel strip for edge
//! neighbors, a single pixel for corner neighbors. Missing neighbors leave
//! their halo cells without data.

use relief_dem::{Projector, RasterSource, TileCoord};
use tracing::trace;

use crate::config::Units;
use crate::grid::{Grid, Sample};
use crate::{ReliefError, Result};

/// Logical position of a raster relative to the tile being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Position {
    /// All positions, center first so a missing tile fails before any
    /// neighbor is decoded.
    pub const LOAD_ORDER: [Position; 9] = [
        Position::Center,
        Position::TopLeft,
        Position::Top,
        Position::TopRight,
        Position::Left,
        Position::Right,
        Position::BottomLeft,
        Position::Bottom,
        Position::BottomRight,
    ];

    /// Tile offset `(dx, dy)`; `dy` grows southward.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Position::TopLeft => (-1, -1),
            Position::Top => (0, -1),
            Position::TopRight => (1, -1),
            Position::Left => (-1, 0),
            Position::Center => (0, 0),
            Position::Right => (1, 0),
            Position::BottomLeft => (-1, 1),
            Position::Bottom => (0, 1),
            Position::BottomRight => (1, 1),
        }
    }
}

/// Pairs of `(source pixel index, grid index)` copied along one axis for a
/// raster at offset `d` on that axis.
fn axis_span(d: i64, size: usize) -> Vec<(usize, usize)> {
    match d {
        -1 => vec![(size - 1, 0)],
        0 => (0..size).map(|i| (i, i + 1)).collect(),
        _ => vec![(0, size + 1)],
    }
}

/// Builds halo-padded grids for tiles of one size.
#[derive(Debug, Clone, Copy)]
pub struct GridAssembler {
    projector: Projector,
    units: Units,
}

impl GridAssembler {
    /// Create an assembler for `size`-pixel tiles producing elevations in `units`.
    pub fn new(size: usize, units: Units) -> Result<Self> {
        if size < 2 {
            return Err(ReliefError::InvalidSize(size));
        }
        Ok(Self {
            projector: Projector::new(size),
            units,
        })
    }

    /// Projector used for pixel coordinates.
    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Assemble the grid for `coord`.
    ///
    /// Fails with [`ReliefError::DataUnavailable`] when the center raster is
    /// missing, and with [`ReliefError::Decode`] when any present raster
    /// cannot be read or has the wrong dimensions.
    pub fn assemble<S: RasterSource + ?Sized>(&self, coord: TileCoord, source: &S) -> Result<Grid> {
        let size = self.projector.size();
        let mut grid = Grid::new(size);

        for position in Position::LOAD_ORDER {
            let (dx, dy) = position.offset();
            let Some(tile) = coord.neighbor(dx, dy) else {
                trace!(%coord, ?position, "neighbor off the tile grid");
                continue;
            };

            let loaded = source
                .load(tile)
                .map_err(|source| ReliefError::Decode { coord: tile, source })?;
            let raster = match loaded {
                Some(raster) => raster,
                None if position == Position::Center => {
                    return Err(ReliefError::DataUnavailable { coord });
                }
                None => {
                    trace!(%coord, ?position, "neighbor raster absent");
                    continue;
                }
            };
            raster
                .ensure_square(size)
                .map_err(|source| ReliefError::Decode { coord: tile, source })?;

            let bbox = self.projector.bounding_box(tile);
            let cols = axis_span(dx, size);
            for (src_row, grid_row) in axis_span(dy, size) {
                for &(src_col, grid_col) in &cols {
                    let (lon, lat) = self.projector.pixel_center(&bbox, src_col, src_row);
                    let elevation = self.units.from_meters(raster.elevation(src_col, src_row));
                    *grid.get_mut(grid_row, grid_col) = Sample::new(lon, lat, elevation);
                }
            }
        }

        Ok(grid)
    }
}
