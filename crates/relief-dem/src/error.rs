//! Error types for the DEM crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when addressing tiles or reading raster data.
#[derive(Debug, Error)]
pub enum DemError {
    /// I/O error reading a file or walking a directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG decoding error.
    #[error("Image decode error in {path}: {source}")]
    ImageDecode {
        /// File that failed to decode.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The raster does not have the expected square dimensions.
    #[error("Raster is {width}x{height}, expected {expected}x{expected}")]
    InvalidDimensions {
        /// Expected edge length in pixels.
        expected: u32,
        /// Actual width.
        width: u32,
        /// Actual height.
        height: u32,
    },

    /// The raster buffer length does not match its dimensions.
    #[error("Raster buffer holds {actual} bytes, expected {expected}")]
    BufferLength {
        /// Expected byte count (`width * height * 3`).
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// Invalid zoom level.
    #[error("Invalid zoom level {0} (must be {min}-{max})", min = crate::MIN_ZOOM, max = crate::MAX_ZOOM)]
    InvalidZoomLevel(u8),

    /// Tile column or row outside the range of its zoom level.
    #[error("Tile z={z} x={x} y={y} is outside the tile grid")]
    TileOutOfRange {
        /// Zoom level.
        z: u8,
        /// X tile coordinate.
        x: u32,
        /// Y tile coordinate.
        y: u32,
    },
}
