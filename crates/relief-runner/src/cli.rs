//! Command-line interface.
//!
//! Flags override values from the optional `--config` YAML file, which in
//! turn overrides the built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use relief_core::Units;

use crate::config::RunConfig;
use crate::Result;

/// Convert Terrain-RGB elevation tiles into contour and hillshade GeoJSON.
#[derive(Debug, Parser)]
#[command(name = "relief")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML config file; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input root containing `{z}/{x}/{y}.png` tiles [default: ./hillshades].
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output root for `{z}/{x}/{y}.geojson` files [default: ./out].
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Samples per tile edge [default: 512].
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Output units: metric or feet.
    #[arg(short, long)]
    pub units: Option<Units>,

    /// Reprocess tiles whose output already exists.
    #[arg(short = 'w', long)]
    pub overwrite: bool,

    /// Skip contour smoothing.
    #[arg(long)]
    pub no_smooth: bool,

    /// Skip shadow and highlight polygons.
    #[arg(long)]
    pub no_hulls: bool,

    /// Layer tag written on every feature.
    #[arg(short, long, alias = "tippecanoe-layer")]
    pub layer: Option<String>,

    /// Number of worker threads.
    #[arg(short = 't', long, alias = "threads")]
    pub workers: Option<usize>,

    /// Fixed contour interval, replacing the per-zoom schedule.
    #[arg(long)]
    pub interval: Option<i64>,

    /// Cell size used by the slope kernel.
    #[arg(long)]
    pub cell_size: Option<f64>,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long)]
    pub verbose: bool,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9000).
    #[cfg(feature = "prometheus")]
    #[arg(long)]
    pub prometheus: Option<std::net::SocketAddr>,
}

impl Cli {
    /// Resolve the run configuration: config file, then flag overrides.
    pub fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_yaml_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(size) = self.size {
            config.options.size = size;
        }
        if let Some(units) = self.units {
            config.options.units = units;
        }
        if self.overwrite {
            config.overwrite = true;
        }
        if self.no_smooth {
            config.options.smooth = false;
        }
        if self.no_hulls {
            config.options.hulls = false;
        }
        if let Some(layer) = self.layer {
            config.options.layer = layer;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(interval) = self.interval {
            config.options.steps.interval = Some(interval);
        }
        if let Some(cell_size) = self.cell_size {
            config.options.cell_size = cell_size;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunnerError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("relief").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&["-i", "tiles", "-o", "geo", "-s", "256", "-u", "feet", "-w", "-t", "3", "-l", "topo"])
            .into_config()
            .unwrap();
        assert_eq!(config.input, PathBuf::from("tiles"));
        assert_eq!(config.output, PathBuf::from("geo"));
        assert_eq!(config.options.size, 256);
        assert_eq!(config.options.units, Units::Feet);
        assert!(config.overwrite);
        assert_eq!(config.workers, 3);
        assert_eq!(config.options.layer, "topo");
    }

    #[test]
    fn test_aliases_and_toggles() {
        let config = parse(&["--threads", "2", "--tippecanoe-layer", "lines", "--no-smooth", "--no-hulls"])
            .into_config()
            .unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.options.layer, "lines");
        assert!(!config.options.smooth);
        assert!(!config.options.hulls);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relief.yaml");
        std::fs::write(&path, "workers: 4\nunits: feet\noutput: /from/file\n").unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let config = parse(&["-c", &path_arg, "-t", "8"]).into_config().unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(config.options.units, Units::Feet);
        assert_eq!(config.output, PathBuf::from("/from/file"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(Cli::try_parse_from(["relief", "-u", "furlongs"]).is_err());
        let result = parse(&["--interval=-5"]).into_config();
        assert!(matches!(result, Err(RunnerError::InvalidInput(_))));
        let result = parse(&["-t", "0"]).into_config();
        assert!(matches!(result, Err(RunnerError::InvalidInput(_))));
    }
}
