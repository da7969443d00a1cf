//! Metric declarations for the relief tile pipeline.
//!
//! Every metric the runner records is declared here as a [`Metric`] constant
//! so names, units and label keys live in one place. The `metrics` crate is
//! re-exported; nothing is recorded unless the binary installs a recorder.
//!
//! # Example
//!
//! ```rust,ignore
//! use relief_metrics::{describe_metrics, metric_defs, TileLabels};
//!
//! describe_metrics();
//!
//! let labels = TileLabels::new(12);
//! metrics::counter!(metric_defs::TILES_PROCESSED.name, &labels.to_labels()).increment(1);
//! ```
//!
//! # Declaring a metric
//!
//! ```rust
//! use relief_metrics::{Metric, MetricKind};
//! use metrics::Unit;
//!
//! const RINGS: Metric = Metric::histogram("relief.hull.rings")
//!     .with_description("Rings traced per band")
//!     .with_unit(Unit::Count)
//!     .with_labels(&["zoom", "shade"]);
//!
//! assert_eq!(RINGS.kind, MetricKind::Histogram);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// Built with the const constructors so declarations can be `const` items.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "relief.tiles.processed").
    pub name: &'static str,
    pub kind: MetricKind,
    /// Human-readable description.
    pub description: &'static str,
    pub unit: Option<Unit>,
    /// Expected label keys.
    pub labels: &'static [&'static str],
}

impl Metric {
    const fn of_kind(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// A counter named `name`.
    pub const fn counter(name: &'static str) -> Self {
        Self::of_kind(name, MetricKind::Counter)
    }

    /// A gauge named `name`.
    pub const fn gauge(name: &'static str) -> Self {
        Self::of_kind(name, MetricKind::Gauge)
    }

    /// A histogram named `name`.
    pub const fn histogram(name: &'static str) -> Self {
        Self::of_kind(name, MetricKind::Histogram)
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Gauge, Some(unit)) => {
                describe_gauge!(self.name, unit, self.description);
            }
            (MetricKind::Gauge, None) => {
                describe_gauge!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }
}

/// All metric definitions for the tile runner.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Labels present on every tile-scoped metric.
    pub const TILE_LABELS: &[&str] = &["zoom"];

    /// Tiles whose features were written.
    pub const TILES_PROCESSED: Metric = Metric::counter("relief.tiles.processed")
        .with_description("Tiles processed and written")
        .with_unit(Unit::Count)
        .with_labels(TILE_LABELS);

    /// Tiles abandoned because of an error.
    ///
    /// Labels: zoom, reason (`unavailable`, `decode`, `io`, `other`)
    pub const TILES_FAILED: Metric = Metric::counter("relief.tiles.failed")
        .with_description("Tiles abandoned because of an error")
        .with_unit(Unit::Count)
        .with_labels(&["zoom", "reason"]);

    /// Tiles skipped because their output already existed.
    pub const TILES_SKIPPED: Metric = Metric::counter("relief.tiles.skipped")
        .with_description("Tiles skipped because their output already exists")
        .with_unit(Unit::Count)
        .with_labels(TILE_LABELS);

    /// Wall time spent on one tile, from raster load to file write.
    pub const TILE_DURATION: Metric = Metric::histogram("relief.tile.duration_ms")
        .with_description("Time to process and write one tile")
        .with_unit(Unit::Milliseconds)
        .with_labels(TILE_LABELS);

    /// Features written for one tile.
    pub const TILE_FEATURES: Metric = Metric::histogram("relief.tile.features")
        .with_description("Features written per tile")
        .with_unit(Unit::Count)
        .with_labels(TILE_LABELS);

    /// Returns a slice of all defined metrics.
    pub const ALL: &[&Metric] = &[
        &TILES_PROCESSED,
        &TILES_FAILED,
        &TILES_SKIPPED,
        &TILE_DURATION,
        &TILE_FEATURES,
    ];
}

/// Labels identifying the tile a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLabels {
    pub zoom: u8,
}

impl TileLabels {
    pub fn new(zoom: u8) -> Self {
        Self { zoom }
    }

    /// Converts the labels to the metrics crate label format.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        vec![("zoom", self.zoom.to_string())]
    }

    /// Returns labels with additional key-value pairs.
    pub fn with(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut labels = self.to_labels();
        labels.extend_from_slice(extra);
        labels
    }
}

/// Registers the descriptions of every metric in [`metric_defs::ALL`].
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}

/// Install a Prometheus recorder serving `/metrics` on `addr`, then describe
/// all metrics.
#[cfg(feature = "prometheus")]
pub fn install_prometheus(
    addr: std::net::SocketAddr,
) -> Result<(), metrics_exporter_prometheus::BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    describe_metrics();
    Ok(())
}
