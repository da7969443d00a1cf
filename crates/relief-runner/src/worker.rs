//! Tile worker pool.
//!
//! The work-list is split round-robin into one partition per worker. Each
//! partition is drained by its own scoped thread, which reports a
//! [`TileOutcome`] per tile over a channel. The reporting loop on the calling
//! thread logs outcomes, records metrics and tallies a [`RunSummary`].
//!
//! Tiles share no state, so a failed tile never stops its siblings.
//! Cancellation is checked between tiles only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use relief_core::TileProcessor;
use relief_dem::{TileCoord, TileDirectory};
use relief_metrics::{metric_defs, TileLabels};
use tracing::{debug, error, info, warn};

use crate::config::RunConfig;
use crate::geojson::to_geojson;
use crate::output::OutputLayout;
use crate::Result;

/// Split `items` round-robin into `parts` partitions.
///
/// Item `i` lands in partition `i % parts`. A `parts` of zero is treated as
/// one. Trailing partitions may be empty when there are fewer items than parts.
pub fn partition<T: Clone>(items: &[T], parts: usize) -> Vec<Vec<T>> {
    let parts = parts.max(1);
    let mut out: Vec<Vec<T>> = (0..parts).map(|_| Vec::new()).collect();
    for (i, item) in items.iter().enumerate() {
        out[i % parts].push(item.clone());
    }
    out
}

/// What happened to one tile.
#[derive(Debug, Clone, PartialEq)]
pub enum TileOutcome {
    /// Features were computed and written.
    Written {
        coord: TileCoord,
        features: usize,
        elapsed: Duration,
    },
    /// Output already existed and overwrite was off.
    Skipped { coord: TileCoord },
    /// The tile was abandoned.
    Failed {
        coord: TileCoord,
        reason: &'static str,
        message: String,
    },
}

impl TileOutcome {
    pub fn coord(&self) -> TileCoord {
        match self {
            TileOutcome::Written { coord, .. }
            | TileOutcome::Skipped { coord }
            | TileOutcome::Failed { coord, .. } => *coord,
        }
    }
}

/// Tally of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Tiles never attempted because the run was cancelled.
    pub unprocessed: usize,
    /// Failed tiles with their error messages.
    pub failures: Vec<(TileCoord, String)>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: TileOutcome) {
        match outcome {
            TileOutcome::Written { .. } => self.written += 1,
            TileOutcome::Skipped { .. } => self.skipped += 1,
            TileOutcome::Failed { coord, message, .. } => {
                self.failed += 1;
                self.failures.push((coord, message));
            }
        }
    }

    /// Tiles that produced an outcome.
    pub fn attempted(&self) -> usize {
        self.written + self.skipped + self.failed
    }

    pub fn total(&self) -> usize {
        self.attempted() + self.unprocessed
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} written, {} skipped, {} failed",
            self.written, self.skipped, self.failed
        )?;
        if self.unprocessed > 0 {
            write!(f, ", {} not processed", self.unprocessed)?;
        }
        Ok(())
    }
}

/// Processes a tile pyramid from an input directory into GeoJSON files.
pub struct Runner {
    config: RunConfig,
    processor: TileProcessor,
    source: TileDirectory,
    layout: OutputLayout,
}

impl Runner {
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let processor = TileProcessor::new(config.options.clone())?;
        let source = TileDirectory::new(&config.input);
        let layout = OutputLayout::new(&config.output);
        Ok(Self {
            config,
            processor,
            source,
            layout,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Build the work-list from the input directory.
    pub fn discover(&self) -> Result<Vec<TileCoord>> {
        let tiles = self.source.discover()?;
        info!(
            input = %self.config.input.display(),
            tiles = tiles.len(),
            "Discovered input tiles"
        );
        Ok(tiles)
    }

    /// Process one tile, honouring the overwrite policy.
    pub fn process_tile(&self, coord: TileCoord) -> TileOutcome {
        if !self.config.overwrite && self.layout.exists(coord) {
            return TileOutcome::Skipped { coord };
        }
        let start = Instant::now();
        match self.render(coord) {
            Ok(features) => TileOutcome::Written {
                coord,
                features,
                elapsed: start.elapsed(),
            },
            Err(err) => TileOutcome::Failed {
                coord,
                reason: err.reason(),
                message: err.to_string(),
            },
        }
    }

    fn render(&self, coord: TileCoord) -> Result<usize> {
        let collection = self.processor.process(coord, &self.source)?;
        let path = self.layout.write(coord, &to_geojson(&collection))?;
        debug!(
            z = coord.z,
            x = coord.x,
            y = coord.y,
            features = collection.len(),
            path = %path.display(),
            "Wrote tile"
        );
        Ok(collection.len())
    }

    /// Process `tiles` across the configured number of workers.
    ///
    /// Returns once every worker has drained its partition or observed
    /// `cancel`.
    pub fn run(&self, tiles: &[TileCoord], cancel: &AtomicBool) -> RunSummary {
        let partitions = partition(tiles, self.config.workers);
        let mut summary = RunSummary::default();

        thread::scope(|scope| {
            let (tx, rx) = crossbeam_channel::unbounded();
            for (i, chunk) in partitions.into_iter().enumerate() {
                if chunk.is_empty() {
                    continue;
                }
                let tx = tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("relief-worker-{}", i))
                    .spawn_scoped(scope, move || self.drain(&chunk, &tx, cancel));
                if let Err(e) = spawned {
                    error!(worker = i, error = %e, "Failed to spawn worker thread");
                }
            }
            drop(tx);

            for outcome in rx.iter() {
                report(&outcome);
                summary.record(outcome);
            }
        });

        summary.unprocessed = tiles.len() - summary.attempted();
        if summary.unprocessed > 0 {
            warn!(unprocessed = summary.unprocessed, "Run stopped before all tiles were processed");
        }
        summary
    }

    fn drain(&self, tiles: &[TileCoord], tx: &Sender<TileOutcome>, cancel: &AtomicBool) {
        for &coord in tiles {
            if cancel.load(Ordering::Relaxed) {
                debug!("Worker stopping on cancellation");
                break;
            }
            if tx.send(self.process_tile(coord)).is_err() {
                break;
            }
        }
    }
}

fn report(outcome: &TileOutcome) {
    let coord = outcome.coord();
    let labels = TileLabels::new(coord.z);
    match outcome {
        TileOutcome::Written {
            features, elapsed, ..
        } => {
            metrics::counter!(metric_defs::TILES_PROCESSED.name, &labels.to_labels()).increment(1);
            metrics::histogram!(metric_defs::TILE_DURATION.name, &labels.to_labels())
                .record(elapsed.as_secs_f64() * 1000.0);
            metrics::histogram!(metric_defs::TILE_FEATURES.name, &labels.to_labels())
                .record(*features as f64);
        }
        TileOutcome::Skipped { .. } => {
            debug!(z = coord.z, x = coord.x, y = coord.y, "Output exists, skipping");
            metrics::counter!(metric_defs::TILES_SKIPPED.name, &labels.to_labels()).increment(1);
        }
        TileOutcome::Failed {
            reason, message, ..
        } => {
            warn!(z = coord.z, x = coord.x, y = coord.y, reason, "Tile failed: {}", message);
            metrics::counter!(
                metric_defs::TILES_FAILED.name,
                &labels.with(&[("reason", reason.to_string())])
            )
            .increment(1);
        }
    }
}
