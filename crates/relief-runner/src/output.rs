//! Output placement: one GeoJSON file per tile at `{root}/{z}/{x}/{y}.geojson`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use relief_dem::TileCoord;
use serde_json::Value;

use crate::Result;

/// File extension of written tiles.
pub const OUTPUT_EXTENSION: &str = "geojson";

#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the features of `coord` are written.
    pub fn path_for(&self, coord: TileCoord) -> PathBuf {
        coord.path_in(&self.root, OUTPUT_EXTENSION)
    }

    /// Whether output for `coord` already exists.
    pub fn exists(&self, coord: TileCoord) -> bool {
        self.path_for(coord).is_file()
    }

    /// Write `document` for `coord`, creating parent directories. Returns the
    /// path written.
    pub fn write(&self, coord: TileCoord, document: &Value) -> Result<PathBuf> {
        let path = self.path_for(coord);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, document)?;
        writer.flush()?;
        Ok(path)
    }
}
