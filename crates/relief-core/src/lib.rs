//! # relief-core
//!
//! Turns Terrain-RGB elevation tiles into vector relief: contour lines at a
//! zoom-dependent interval and shadow/highlight polygons traced from a
//! hillshade.
//!
//! ## Pipeline
//!
//! 1. [`GridAssembler`] builds a halo-padded [`Grid`] from the tile and its
//!    eight neighbors.
//! 2. [`contour::extract`] runs marching squares per level, [`join`] stitches
//!    the segments into polylines and [`smooth`] removes zigzags.
//! 3. [`ShadeMap`] lights each cell from four azimuths; [`HullTracer`]
//!    follows the boundaries of each intensity band.
//! 4. [`FeatureCollection::assemble`] gathers everything for output.
//!
//! [`TileProcessor`] runs all of it for one tile.
//!
//! ## Example
//!
//! ```no_run
//! use relief_core::{ReliefOptions, TileProcessor};
//! use relief_dem::{TileCoord, TileDirectory};
//!
//! let processor = TileProcessor::new(ReliefOptions::default())?;
//! let tiles = TileDirectory::new("./terrain");
//! let coord = TileCoord::new(12, 655, 1407)?;
//! let features = processor.process(coord, &tiles)?;
//! println!("{} features", features.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assemble;
pub mod config;
pub mod contour;
mod error;
pub mod feature;
pub mod geometry;
pub mod grid;
pub mod hull;
pub mod join;
mod processor;
pub mod shade;
pub mod smooth;

pub use assemble::{GridAssembler, Position};
pub use config::{HullThresholds, ReliefOptions, StepSchedule, Units, DEFAULT_LAYER, DEFAULT_SIZE};
pub use contour::Level;
pub use error::ReliefError;
pub use feature::{ContourFeature, Feature, FeatureCollection, HullFeature};
pub use geometry::{Point, Polygon, Polyline, Segment};
pub use grid::{Grid, Sample};
pub use hull::{Band, Hull, HullTracer, ShadeClass, ShadeLevel};
pub use processor::TileProcessor;
pub use shade::{Shade, ShadeMap};

/// Result type for tile processing.
pub type Result<T> = std::result::Result<T, ReliefError>;
