//! The per-tile pipeline.

use relief_dem::{RasterSource, TileCoord};
use tracing::debug;

use crate::assemble::GridAssembler;
use crate::config::{HullThresholds, ReliefOptions};
use crate::contour;
use crate::feature::FeatureCollection;
use crate::grid::Grid;
use crate::hull::{Hull, HullTracer};
use crate::join;
use crate::shade::ShadeMap;
use crate::smooth;
use crate::Result;

/// Runs grid assembly, contouring and hull tracing for single tiles.
///
/// A processor holds no per-tile state, so one instance can be shared by
/// every worker thread.
#[derive(Debug, Clone)]
pub struct TileProcessor {
    options: ReliefOptions,
    assembler: GridAssembler,
}

impl TileProcessor {
    /// Create a processor; fails if the configured grid size is unusable.
    pub fn new(options: ReliefOptions) -> Result<Self> {
        let assembler = GridAssembler::new(options.size, options.units)?;
        Ok(Self { options, assembler })
    }

    pub fn options(&self) -> &ReliefOptions {
        &self.options
    }

    /// Produce the feature collection for `coord`, reading rasters from
    /// `source`.
    pub fn process<S: RasterSource + ?Sized>(&self, coord: TileCoord, source: &S) -> Result<FeatureCollection> {
        let grid = self.assembler.assemble(coord, source)?;
        debug!(z = coord.z, x = coord.x, y = coord.y, filled = grid.filled(), "assembled grid");
        self.process_grid(coord.z, &grid)
    }

    /// Run the contour and hull stages over an already assembled grid.
    pub fn process_grid(&self, zoom: u8, grid: &Grid) -> Result<FeatureCollection> {
        let steps = self.options.steps;
        let step = steps.step_for_zoom(zoom);

        let segments = contour::extract(grid, step)?;
        let mut lines = join::join(&segments);
        if self.options.smooth {
            for level_lines in lines.values_mut() {
                smooth::smooth_lines(level_lines);
            }
        }

        let hulls: Vec<Hull> = if self.options.hulls {
            let shades = ShadeMap::compute(grid, self.options.cell_size);
            HullTracer::new(grid, &shades, zoom).trace_all(&HullThresholds::for_zoom(zoom))
        } else {
            Vec::new()
        };

        debug!(
            zoom,
            step,
            levels = lines.len(),
            lines = lines.values().map(Vec::len).sum::<usize>(),
            hulls = hulls.len(),
            "built tile features"
        );

        Ok(FeatureCollection::assemble(
            self.options.layer.clone(),
            lines,
            |level| steps.index(level, zoom),
            hulls,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepSchedule;
    use crate::ReliefError;
    use relief_dem::{MemoryRasterSource, RgbRaster};

    fn options(size: usize) -> ReliefOptions {
        ReliefOptions {
            size,
            steps: StepSchedule::fixed(10),
            ..ReliefOptions::default()
        }
    }

    #[test]
    fn test_missing_tile() {
        let processor = TileProcessor::new(options(8)).unwrap();
        let coord = TileCoord::new(12, 100, 100).unwrap();
        let result = processor.process(coord, &MemoryRasterSource::new());
        assert!(matches!(result, Err(ReliefError::DataUnavailable { .. })));
    }

    #[test]
    fn test_flat_tile_has_no_features() {
        let processor = TileProcessor::new(options(8)).unwrap();
        let coord = TileCoord::new(12, 100, 100).unwrap();
        let source = MemoryRasterSource::new().with(coord, RgbRaster::from_elevation_fn(8, |_, _| 105.0));
        let collection = processor.process(coord, &source).unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.layer, "contourLines");
    }

    #[test]
    fn test_ramp_has_contours_with_index() {
        let processor = TileProcessor::new(options(16)).unwrap();
        let coord = TileCoord::new(12, 100, 100).unwrap();
        // Rises 3 m per column
        let source = MemoryRasterSource::new().with(
            coord,
            RgbRaster::from_elevation_fn(16, |col, _| 1000.0 + 3.0 * f64::from(col)),
        );
        let collection = processor.process(coord, &source).unwrap();
        let levels: Vec<_> = collection.contours().map(|c| c.level).collect();
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|l| l % 10 == 0 && (1000..=1045).contains(l)));
        for feature in collection.contours() {
            assert_eq!(feature.index, feature.level / 10 % 10);
        }
    }

    #[test]
    fn test_rejects_bad_size() {
        assert!(matches!(TileProcessor::new(options(1)), Err(ReliefError::InvalidSize(1))));
    }
}
