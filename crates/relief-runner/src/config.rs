//! Run configuration: where tiles come from, where features go, and how the
//! per-tile pipeline is tuned.
//!
//! A config file is YAML; every key is optional:
//!
//! ```yaml
//! input: ./hillshades
//! output: ./out
//! overwrite: false
//! workers: 4
//! smooth: true
//! size: 512
//! units: feet
//! tippecanoeLayer: contourLines
//! steps:
//!   interval: 25
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use relief_core::ReliefOptions;
use serde::{Deserialize, Serialize};

use crate::{Result, RunnerError};

/// Default input root, scanned for `{z}/{x}/{y}.png`.
pub const DEFAULT_INPUT: &str = "./hillshades";

/// Default output root.
pub const DEFAULT_OUTPUT: &str = "./out";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root of the input tile pyramid.
    pub input: PathBuf,
    /// Root the GeoJSON pyramid is written under.
    pub output: PathBuf,
    /// Reprocess tiles whose output already exists.
    pub overwrite: bool,
    /// Number of worker threads (and work-list partitions).
    pub workers: usize,
    /// Per-tile pipeline options.
    #[serde(flatten)]
    pub options: ReliefOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            overwrite: false,
            workers: 1,
            options: ReliefOptions::default(),
        }
    }
}

impl RunConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load a YAML config file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|source| RunnerError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(RunnerError::InvalidInput("workers must be at least 1".into()));
        }
        if self.options.size < 2 {
            return Err(RunnerError::InvalidInput(format!(
                "size must be at least 2, got {}",
                self.options.size
            )));
        }
        if let Some(interval) = self.options.steps.interval {
            if interval <= 0 {
                return Err(RunnerError::InvalidInput(format!(
                    "contour interval must be positive, got {}",
                    interval
                )));
            }
        }
        if self.options.cell_size.is_nan() || self.options.cell_size <= 0.0 {
            return Err(RunnerError::InvalidInput(format!(
                "cell size must be positive, got {}",
                self.options.cell_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_core::{StepSchedule, Units};

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.input, PathBuf::from("./hillshades"));
        assert_eq!(config.output, PathBuf::from("./out"));
        assert!(!config.overwrite);
        assert_eq!(config.workers, 1);
        assert!(config.options.smooth);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_with_flattened_options() {
        let yaml = r#"
input: /data/terrain
workers: 4
overwrite: true
units: feet
tippecanoeLayer: contours
size: 256
steps:
  interval: 40
"#;
        let config = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.input, PathBuf::from("/data/terrain"));
        assert_eq!(config.output, PathBuf::from("./out"));
        assert_eq!(config.workers, 4);
        assert!(config.overwrite);
        assert_eq!(config.options.units, Units::Feet);
        assert_eq!(config.options.layer, "contours");
        assert_eq!(config.options.size, 256);
        assert_eq!(config.options.steps, StepSchedule::fixed(40));
        assert!(config.options.smooth);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RunConfig {
            workers: 0,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(RunnerError::InvalidInput(_))));

        config.workers = 2;
        config.options.steps = StepSchedule::fixed(0);
        assert!(matches!(config.validate(), Err(RunnerError::InvalidInput(_))));

        config.options.steps = StepSchedule::default();
        config.options.size = 1;
        assert!(matches!(config.validate(), Err(RunnerError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = RunConfig::from_yaml_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(RunnerError::Io(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "workers: [1, 2").unwrap();
        assert!(matches!(RunConfig::from_yaml_file(&path), Err(RunnerError::Yaml { .. })));
    }
}
