//! Runner for the relief tile pipeline.
//!
//! Discovers `{z}/{x}/{y}.png` elevation tiles under an input root, processes
//! them across a pool of worker threads, and writes one GeoJSON
//! `FeatureCollection` per tile under the output root.
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use relief_runner::{RunConfig, Runner};
//!
//! let runner = Runner::new(RunConfig::default())?;
//! let tiles = runner.discover()?;
//! let summary = runner.run(&tiles, &AtomicBool::new(false));
//! println!("{}", summary);
//! # Ok::<(), relief_runner::RunnerError>(())
//! ```

pub mod cli;
pub mod config;
mod error;
pub mod geojson;
pub mod output;
pub mod worker;

pub use cli::Cli;
pub use config::{RunConfig, DEFAULT_INPUT, DEFAULT_OUTPUT};
pub use error::{Result, RunnerError};
pub use geojson::to_geojson;
pub use output::OutputLayout;
pub use worker::{partition, RunSummary, Runner, TileOutcome};
