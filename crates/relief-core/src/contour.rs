//! Marching-squares contour extraction.
//!
//! Every 2x2 block of samples whose top-left corner lies in rows and columns
//! `0..size` is a cell. The cells along the bottom and right halo are left to
//! the neighboring tiles, so adjacent tiles never emit the same segment twice.

use std::collections::BTreeMap;

use tracing::debug;

use crate::geometry::{Point, Segment};
use crate::grid::{Grid, Sample};
use crate::{ReliefError, Result};

/// A contour elevation: an integer multiple of the contour interval.
pub type Level = i64;

/// One corner of a marching-squares cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Position of the sample.
    pub point: Point,
    /// Elevation of the sample.
    pub elev: f64,
}

impl Corner {
    /// Corner at `point` with elevation `elev`.
    pub fn new(point: Point, elev: f64) -> Self {
        Self { point, elev }
    }

    fn from_sample(sample: &Sample) -> Option<Self> {
        sample.elevation.map(|elev| Self::new(sample.point(), elev))
    }
}

/// The four corners of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub top_left: Corner,
    pub top_right: Corner,
    pub bottom_left: Corner,
    pub bottom_right: Corner,
}

impl Cell {
    /// The cell whose top-left sample is `(row, col)`, or `None` if any
    /// corner lacks data.
    pub fn at(grid: &Grid, row: usize, col: usize) -> Option<Self> {
        Some(Self {
            top_left: Corner::from_sample(grid.get(row, col))?,
            top_right: Corner::from_sample(grid.get(row, col + 1))?,
            bottom_left: Corner::from_sample(grid.get(row + 1, col))?,
            bottom_right: Corner::from_sample(grid.get(row + 1, col + 1))?,
        })
    }

    /// Lowest and highest corner elevation.
    pub fn range(&self) -> (f64, f64) {
        let elevs = [
            self.top_left.elev,
            self.top_right.elev,
            self.bottom_left.elev,
            self.bottom_right.elev,
        ];
        elevs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| (lo.min(e), hi.max(e)))
    }
}

/// Which coordinate varies along a cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Lon,
    Lat,
}

/// Where `level` meets the edge `a -> b`, if it does.
fn edge_crossing(a: &Corner, b: &Corner, level: f64, axis: Axis) -> Option<Point> {
    if a.elev == b.elev {
        return None;
    }
    if a.elev == level {
        return Some(a.point);
    }
    if b.elev == level {
        return Some(b.point);
    }
    let between = (level < a.elev && level > b.elev) || (level > a.elev && level < b.elev);
    if !between {
        return None;
    }

    // coord = slope * level + intercept, along the axis that varies
    match axis {
        Axis::Lon => {
            let slope = (a.point[0] - b.point[0]) / (a.elev - b.elev);
            Some([slope * level + (a.point[0] - slope * a.elev), a.point[1]])
        }
        Axis::Lat => {
            let slope = (a.point[1] - b.point[1]) / (a.elev - b.elev);
            Some([a.point[0], slope * level + (a.point[1] - slope * a.elev)])
        }
    }
}

/// The contour segment for `level` through one cell.
///
/// Rules, in order of precedence:
/// 1. all four corners on the level: flat, no line
/// 2. three corners on the level: the diagonal that excludes the odd corner,
///    only when the odd corner lies below the level
/// 3. two corners on the level: the diagonal if they are opposite; otherwise
///    the shared edge, only when one of the other corners lies below
/// 4. otherwise the interpolated edge crossings; exactly two distinct points
///    make a segment, and a saddle with four crossings keeps the pair on the
///    top and left edges
pub fn find_line(cell: &Cell, level: f64) -> Option<Segment> {
    let Cell {
        top_left: tl,
        top_right: tr,
        bottom_left: bl,
        bottom_right: br,
    } = cell;

    let on_level = [tl, tr, bl, br].iter().filter(|c| c.elev == level).count();

    match on_level {
        4 => None,
        3 => {
            if tl.elev < level || br.elev < level {
                Some([tr.point, bl.point])
            } else if tr.elev < level || bl.elev < level {
                Some([tl.point, br.point])
            } else {
                None
            }
        }
        2 => {
            if tl.elev == level && br.elev == level {
                return Some([tl.point, br.point]);
            }
            if tr.elev == level && bl.elev == level {
                return Some([tr.point, bl.point]);
            }
            let mut points = Vec::with_capacity(2);
            let mut lower = false;
            for corner in [tl, tr, bl, br] {
                if corner.elev == level {
                    points.push(corner.point);
                } else if corner.elev < level {
                    lower = true;
                }
            }
            if lower {
                Some([points[0], points[1]])
            } else {
                None
            }
        }
        _ => {
            let mut points: Vec<Point> = Vec::with_capacity(4);
            let edges = [
                (tl, tr, Axis::Lon),
                (tr, br, Axis::Lat),
                (br, bl, Axis::Lon),
                (bl, tl, Axis::Lat),
            ];
            for (a, b, axis) in edges {
                if let Some(point) = edge_crossing(a, b, level, axis) {
                    if !points.contains(&point) {
                        points.push(point);
                    }
                }
            }

            match points.len() {
                2 => Some([points[0], points[1]]),
                4 => Some([points[0], points[3]]),
                _ => None,
            }
        }
    }
}

/// Every multiple of `step` within `[ceil(min), floor(max)]` of the grid's
/// elevations.
pub fn levels(grid: &Grid, step: i64) -> Result<Vec<Level>> {
    if step <= 0 {
        return Err(ReliefError::InvalidStepSize(step));
    }
    let Some((min, max)) = grid.elevation_range() else {
        return Ok(Vec::new());
    };
    Ok(levels_between(min.ceil(), max.floor(), step))
}

fn levels_between(lo: f64, hi: f64, step: i64) -> Vec<Level> {
    let step_f = step as f64;
    let first = (lo / step_f).ceil() as i64;
    let last = (hi / step_f).floor() as i64;
    (first..=last).map(|k| k * step).collect()
}

/// Run marching squares over the grid.
///
/// Returns the raw segments for every level that produced at least one.
pub fn extract(grid: &Grid, step: i64) -> Result<BTreeMap<Level, Vec<Segment>>> {
    let all_levels = levels(grid, step)?;
    let mut contours: BTreeMap<Level, Vec<Segment>> = BTreeMap::new();
    let (Some(&lowest), Some(&highest)) = (all_levels.first(), all_levels.last()) else {
        return Ok(contours);
    };

    let size = grid.size();
    for row in 0..size {
        for col in 0..size {
            let Some(cell) = Cell::at(grid, row, col) else {
                continue;
            };
            let (lo, hi) = cell.range();
            for level in levels_between(lo, hi, step) {
                if level < lowest || level > highest {
                    continue;
                }
                if let Some(segment) = find_line(&cell, level as f64) {
                    contours.entry(level).or_default().push(segment);
                }
            }
        }
    }

    debug!(
        levels = contours.len(),
        segments = contours.values().map(Vec::len).sum::<usize>(),
        "extracted contour segments"
    );
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cell on a unit square: top-left at (0, 1), bottom-right at (1, 0).
    fn cell(tl: f64, tr: f64, bl: f64, br: f64) -> Cell {
        Cell {
            top_left: Corner::new([0.0, 1.0], tl),
            top_right: Corner::new([1.0, 1.0], tr),
            bottom_left: Corner::new([0.0, 0.0], bl),
            bottom_right: Corner::new([1.0, 0.0], br),
        }
    }

    fn grid_from_rows(rows: &[&[f64]]) -> Grid {
        let size = rows.len() - 2;
        Grid::from_fn(size, |row, col| Sample::new(col as f64, -(row as f64), rows[row][col]))
    }

    #[test]
    fn test_flat_cell_has_no_line() {
        assert_eq!(find_line(&cell(10.0, 10.0, 10.0, 10.0), 10.0), None);
    }

    #[test]
    fn test_three_equal_with_lower_corner() {
        // Odd corner (bottom-right) below: diagonal from top-right to bottom-left
        let line = find_line(&cell(10.0, 10.0, 10.0, 5.0), 10.0);
        assert_eq!(line, Some([[1.0, 1.0], [0.0, 0.0]]));

        // Odd corner (top-right) below: the other diagonal
        let line = find_line(&cell(100.0, 90.0, 100.0, 100.0), 100.0);
        assert_eq!(line, Some([[0.0, 1.0], [1.0, 0.0]]));
    }

    #[test]
    fn test_three_equal_with_higher_corner() {
        assert_eq!(find_line(&cell(10.0, 10.0, 10.0, 15.0), 10.0), None);
    }

    #[test]
    fn test_two_equal_diagonal() {
        let line = find_line(&cell(10.0, 4.0, 20.0, 10.0), 10.0);
        assert_eq!(line, Some([[0.0, 1.0], [1.0, 0.0]]));
        let line = find_line(&cell(4.0, 10.0, 10.0, 20.0), 10.0);
        assert_eq!(line, Some([[1.0, 1.0], [0.0, 0.0]]));
    }

    #[test]
    fn test_two_equal_diagonal_ignores_other_pair() {
        // The off-level pair happens to be equal to each other; the line
        // still runs through the on-level corners
        let line = find_line(&cell(5.0, 10.0, 10.0, 5.0), 10.0);
        assert_eq!(line, Some([[1.0, 1.0], [0.0, 0.0]]));
    }

    #[test]
    fn test_two_equal_edge() {
        // Top edge on the level, bottom below: the top edge is the line
        let line = find_line(&cell(10.0, 10.0, 3.0, 12.0), 10.0);
        assert_eq!(line, Some([[0.0, 1.0], [1.0, 1.0]]));
        // Both others above: nothing
        assert_eq!(find_line(&cell(10.0, 10.0, 13.0, 12.0), 10.0), None);
    }

    #[test]
    fn test_general_crossing_interpolates() {
        // Left column low, right column high: vertical line at lon 0.25
        let line = find_line(&cell(0.0, 32.0, 0.0, 32.0), 8.0).unwrap();
        assert_eq!(line, [[0.25, 1.0], [0.25, 0.0]]);
    }

    #[test]
    fn test_saddle_keeps_top_left_pair() {
        let c = cell(12.0, 8.0, 9.0, 15.0);
        let [a, b] = find_line(&c, 10.0).unwrap();
        // Crossing on the top edge (lat 1), interpolated between 12 and 8
        assert_eq!(a[1], 1.0);
        assert!((a[0] - 0.5).abs() < 1e-12);
        // Crossing on the left edge (lon 0), interpolated between 9 and 12
        assert_eq!(b[0], 0.0);
        assert!((b[1] - 1.0 / 3.0).abs() < 1e-12);

        assert_eq!(find_line(&c, 20.0), None);
    }

    #[test]
    fn test_single_vertex_touch_is_degenerate() {
        // Only the top-left corner touches the level
        assert_eq!(find_line(&cell(10.0, 20.0, 20.0, 20.0), 10.0), None);
    }

    #[test]
    fn test_uniform_grid_has_no_contours() {
        let grid = Grid::from_fn(4, |row, col| Sample::new(col as f64, -(row as f64), 100.0));
        let contours = extract(&grid, 10).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn test_three_corner_grid() {
        // size 2 grid whose first cell has three corners at 100 and one at 90
        let grid = grid_from_rows(&[
            &[100.0, 100.0, 100.0, 100.0],
            &[100.0, 90.0, 100.0, 100.0],
            &[100.0, 100.0, 100.0, 100.0],
            &[100.0, 100.0, 100.0, 100.0],
        ]);
        let cell = Cell::at(&grid, 0, 0).unwrap();
        assert_eq!(find_line(&cell, 100.0), Some([[1.0, 0.0], [0.0, -1.0]]));
    }

    #[test]
    fn test_levels_respect_step() {
        let grid = grid_from_rows(&[
            &[12.0, 18.0, 25.0],
            &[31.0, 47.5, 50.2],
            &[3.2, 11.0, 19.0],
        ]);
        assert_eq!(levels(&grid, 10).unwrap(), vec![10, 20, 30, 40, 50]);
        assert_eq!(levels(&grid, 25).unwrap(), vec![25, 50]);
        assert!(matches!(levels(&grid, 0), Err(ReliefError::InvalidStepSize(0))));
    }

    #[test]
    fn test_negative_levels() {
        let grid = grid_from_rows(&[&[-35.0, -12.0, 4.0], &[-20.0, -5.0, 1.0], &[-1.0, 0.0, 2.0]]);
        assert_eq!(levels(&grid, 10).unwrap(), vec![-30, -20, -10, 0]);
    }

    #[test]
    fn test_missing_corner_skips_cell() {
        let mut grid = grid_from_rows(&[
            &[0.0, 0.0, 0.0, 0.0],
            &[0.0, 20.0, 20.0, 0.0],
            &[0.0, 20.0, 20.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0],
        ]);
        let full = extract(&grid, 10).unwrap();
        grid.get_mut(0, 0).elevation = None;
        let partial = extract(&grid, 10).unwrap();
        assert_eq!(full[&10].len(), partial[&10].len() + 1);
    }

    #[test]
    fn test_bottom_right_halo_not_contoured() {
        // Only the bottom-right halo cell differs; no interior cell sees it
        let grid = grid_from_rows(&[
            &[0.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 50.0],
        ]);
        assert!(extract(&grid, 10).unwrap().is_empty());
    }
}
