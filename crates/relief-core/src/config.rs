//! Per-tile processing options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::contour::Level;

/// Default grid resolution (pixels per tile edge).
pub const DEFAULT_SIZE: usize = 512;

/// Default layer tag written on every feature.
pub const DEFAULT_LAYER: &str = "contourLines";

/// Default Sobel kernel cell size used for slope estimation.
pub const DEFAULT_CELL_SIZE: f64 = 5.0;

/// Feet in one meter.
pub const FEET_PER_METER: f64 = 3.2808398950131;

/// Unit that decoded elevations are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Meters, as stored in the raster.
    #[default]
    #[serde(alias = "meters")]
    Metric,
    /// Feet.
    Feet,
}

impl Units {
    /// Convert a value in meters into this unit.
    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            Units::Metric => meters,
            Units::Feet => meters * FEET_PER_METER,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Metric => f.write_str("metric"),
            Units::Feet => f.write_str("feet"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" | "meters" | "m" => Ok(Units::Metric),
            "feet" | "ft" => Ok(Units::Feet),
            other => Err(format!("unknown units '{}' (expected metric or feet)", other)),
        }
    }
}

/// Zoom-dependent contour interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepSchedule {
    /// Fixed interval overriding the zoom table.
    pub interval: Option<i64>,
}

impl StepSchedule {
    /// A schedule that uses the same interval at every zoom.
    pub fn fixed(interval: i64) -> Self {
        Self {
            interval: Some(interval),
        }
    }

    /// Contour interval at `zoom`.
    pub fn step_for_zoom(&self, zoom: u8) -> i64 {
        if let Some(interval) = self.interval {
            return interval;
        }
        match zoom {
            11 => 100,
            12 => 50,
            13 => 20,
            14 => 10,
            _ => 1,
        }
    }

    /// Position of `level` within its group of ten intervals.
    ///
    /// Renderers use this to emphasize every tenth line.
    pub fn index(&self, level: Level, zoom: u8) -> i64 {
        let step = self.step_for_zoom(zoom).max(1);
        level / step % 10
    }
}

/// Intensity thresholds for the shade bands at one zoom.
///
/// A cell belongs to a band when its intensity is at or below the band's
/// threshold, so lower thresholds select stronger shade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullThresholds {
    /// Shadow thresholds on the dark intensity: ultra, high, medium, low.
    pub shadow: [f64; 4],
    /// Highlight thresholds on the light intensity: high, low.
    pub highlight: [f64; 2],
}

impl HullThresholds {
    /// Thresholds tuned for `zoom`. Coarser zooms flatten the apparent
    /// slope, so their bands reach further up the intensity scale.
    pub fn for_zoom(zoom: u8) -> Self {
        match zoom {
            0..=11 => Self {
                shadow: [90.0, 120.0, 150.0, 170.0],
                highlight: [130.0, 160.0],
            },
            12 | 13 => Self {
                shadow: [80.0, 110.0, 140.0, 165.0],
                highlight: [120.0, 150.0],
            },
            _ => Self {
                shadow: [70.0, 100.0, 130.0, 160.0],
                highlight: [110.0, 140.0],
            },
        }
    }
}

/// Options controlling how a single tile is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliefOptions {
    /// Run the zigzag-removal and corner-rounding pass over contour lines.
    pub smooth: bool,
    /// Samples per tile edge.
    pub size: usize,
    /// Unit of the output elevations and contour levels.
    pub units: Units,
    /// Layer tag attached to every feature.
    #[serde(alias = "tippecanoeLayer")]
    pub layer: String,
    /// Sobel kernel cell size.
    pub cell_size: f64,
    /// Contour interval schedule.
    pub steps: StepSchedule,
    /// Trace shadow and highlight polygons.
    pub hulls: bool,
}

impl Default for ReliefOptions {
    fn default() -> Self {
        Self {
            smooth: true,
            size: DEFAULT_SIZE,
            units: Units::Metric,
            layer: DEFAULT_LAYER.to_string(),
            cell_size: DEFAULT_CELL_SIZE,
            steps: StepSchedule::default(),
            hulls: true,
        }
    }
}
