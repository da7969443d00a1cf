//! Error types for per-tile processing.

use relief_dem::{DemError, TileCoord};
use thiserror::Error;

/// Errors that abandon the processing of a single tile.
///
/// Degenerate geometry (flat cells, saddles, collapsed rings) is never an
/// error; it is skipped where it is produced.
#[derive(Debug, Error)]
pub enum ReliefError {
    /// The tile's own raster is missing, so there is nothing to contour.
    #[error("No elevation raster for tile {coord}")]
    DataUnavailable {
        /// The tile that was requested.
        coord: TileCoord,
    },

    /// A raster exists but could not be decoded, or has the wrong size.
    #[error("Failed to decode raster for tile {coord}: {source}")]
    Decode {
        /// The tile whose raster failed.
        coord: TileCoord,
        /// Underlying raster error.
        #[source]
        source: DemError,
    },

    /// Grid resolution must be at least 2 samples.
    #[error("Invalid grid size {0} (must be at least 2)")]
    InvalidSize(usize),

    /// Contour interval must be positive.
    #[error("Invalid contour step {0} (must be positive)")]
    InvalidStepSize(i64),
}
