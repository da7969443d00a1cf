//! Shadow and highlight polygons traced from the shade map.
//!
//! Each band is a threshold on one shade intensity. Boundary cells of the
//! band are found by a row-major scan and followed with Moore-neighbor
//! tracing; rings that land inside an earlier ring of the same band become
//! its holes.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::HullThresholds;
use crate::geometry::{point_in_ring, Point, Polygon};
use crate::grid::Grid;
use crate::shade::ShadeMap;

/// Zoom from which long rings are thinned to every other point.
pub const THIN_FROM_ZOOM: u8 = 10;

/// Rings must keep at least this many points (closing point included).
pub const MIN_RING_POINTS: usize = 5;

/// Which intensity a band thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeClass {
    Shadow,
    Highlight,
}

impl ShadeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShadeClass::Shadow => "shadow",
            ShadeClass::Highlight => "highlight",
        }
    }
}

impl fmt::Display for ShadeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of a band within its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeLevel {
    Ultra,
    High,
    Medium,
    Low,
}

impl ShadeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShadeLevel::Ultra => "ultra",
            ShadeLevel::High => "high",
            ShadeLevel::Medium => "medium",
            ShadeLevel::Low => "low",
        }
    }
}

impl fmt::Display for ShadeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One intensity band: cells whose intensity is at or below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub class: ShadeClass,
    pub level: ShadeLevel,
    pub threshold: f64,
}

impl Band {
    /// The six bands for a threshold set, shadows first.
    pub fn all(thresholds: &HullThresholds) -> Vec<Band> {
        let [ultra, high, medium, low] = thresholds.shadow;
        let [hl_high, hl_low] = thresholds.highlight;
        let band = |class, level, threshold| Band { class, level, threshold };
        vec![
            band(ShadeClass::Shadow, ShadeLevel::Ultra, ultra),
            band(ShadeClass::Shadow, ShadeLevel::High, high),
            band(ShadeClass::Shadow, ShadeLevel::Medium, medium),
            band(ShadeClass::Shadow, ShadeLevel::Low, low),
            band(ShadeClass::Highlight, ShadeLevel::High, hl_high),
            band(ShadeClass::Highlight, ShadeLevel::Low, hl_low),
        ]
    }
}

/// The polygons traced for one band.
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    pub class: ShadeClass,
    pub level: ShadeLevel,
    pub polygons: Vec<Polygon>,
}

/// Moore neighborhood, clockwise from north, as `(drow, dcol)`.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

const WEST: usize = 6;

/// Band membership over the `size x size` interior, in interior coordinates
/// (grid row/col minus one).
struct BandMask<'a> {
    shades: &'a ShadeMap,
    band: Band,
    size: usize,
}

impl BandMask<'_> {
    fn contains(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 || row >= self.size as isize || col >= self.size as isize {
            return false;
        }
        let Some(shade) = self.shades.get(row as usize + 1, col as usize + 1) else {
            return false;
        };
        let intensity = match self.band.class {
            ShadeClass::Shadow => shade.dark,
            ShadeClass::Highlight => shade.light,
        };
        intensity <= self.band.threshold
    }

    /// Whether an in-band cell borders the outside in the way that starts a
    /// trace. Each border of the interior has its own neighbor test.
    fn is_edge(&self, row: usize, col: usize) -> bool {
        let (r, c) = (row as isize, col as isize);
        let last = self.size - 1;
        let at = |dr: isize, dc: isize| self.contains(r + dr, c + dc);

        let left = at(0, -1);
        let right = at(0, 1);
        let bottom = at(1, 0);
        let bottom_left = at(1, -1);
        let bottom_right = at(1, 1);

        match (row == last, col == 0, col == last) {
            // bottom-left corner
            (true, true, _) => right,
            // bottom-right corner
            (true, false, true) => false,
            // bottom row
            (true, false, false) => !left && right,
            // left column
            (false, true, _) => right || bottom || bottom_right,
            // right column
            (false, false, true) => !left && (bottom || bottom_left),
            (false, false, false) => !left && (right || bottom || bottom_right || bottom_left),
        }
    }
}

/// Traces hull polygons for one tile.
pub struct HullTracer<'a> {
    grid: &'a Grid,
    shades: &'a ShadeMap,
    zoom: u8,
}

impl<'a> HullTracer<'a> {
    pub fn new(grid: &'a Grid, shades: &'a ShadeMap, zoom: u8) -> Self {
        Self { grid, shades, zoom }
    }

    /// Trace every band of `thresholds`, keeping the bands that produced at
    /// least one polygon.
    pub fn trace_all(&self, thresholds: &HullThresholds) -> Vec<Hull> {
        Band::all(thresholds)
            .into_iter()
            .filter_map(|band| {
                let polygons = self.trace_band(band);
                if polygons.is_empty() {
                    None
                } else {
                    Some(Hull {
                        class: band.class,
                        level: band.level,
                        polygons,
                    })
                }
            })
            .collect()
    }

    /// Trace all polygons of a single band.
    pub fn trace_band(&self, band: Band) -> Vec<Polygon> {
        let size = self.grid.size().min(self.shades.size());
        if size == 0 {
            return Vec::new();
        }
        let mask = BandMask {
            shades: self.shades,
            band,
            size,
        };
        let mut visited = vec![false; size * size];
        let mut polygons: Vec<Polygon> = Vec::new();
        let mut rings = 0usize;

        for row in 0..size {
            for col in 0..size {
                if visited[row * size + col] || !mask.contains(row as isize, col as isize) {
                    continue;
                }
                if !mask.is_edge(row, col) {
                    continue;
                }
                let Some(cells) = trace_boundary(&mask, &mut visited, (row, col)) else {
                    continue;
                };
                let ring: Vec<Point> = cells
                    .iter()
                    .map(|&(r, c)| self.grid.get(r + 1, c + 1).point())
                    .collect();
                let ring = simplify_ring(ring, self.zoom);
                if ring.len() < MIN_RING_POINTS {
                    trace!(class = %band.class, level = %band.level, "dropped short ring");
                    continue;
                }
                rings += 1;
                place_ring(&mut polygons, ring);
            }
        }

        debug!(
            class = %band.class,
            level = %band.level,
            rings,
            polygons = polygons.len(),
            "traced band"
        );
        polygons
    }
}

/// Follow the band boundary clockwise from `start` until it returns there.
///
/// Returns the visited cells with `start` repeated at the end, or `None`
/// when the start has no in-band neighbor or the walk never closes.
fn trace_boundary(mask: &BandMask<'_>, visited: &mut [bool], start: (usize, usize)) -> Option<Vec<(usize, usize)>> {
    let size = mask.size;
    let max_steps = 8 * size * size + 8;
    let mut dir = WEST;
    let mut cur = start;
    let mut cells = vec![start];
    visited[start.0 * size + start.1] = true;

    for _ in 0..max_steps {
        let mut next = None;
        for _ in 0..DIRECTIONS.len() {
            dir = (dir + 1) % DIRECTIONS.len();
            let (dr, dc) = DIRECTIONS[dir];
            let (r, c) = (cur.0 as isize + dr, cur.1 as isize + dc);
            if mask.contains(r, c) {
                next = Some((r as usize, c as usize));
                break;
            }
        }
        cur = next?;
        visited[cur.0 * size + cur.1] = true;
        cells.push(cur);
        if cur == start {
            return Some(cells);
        }
        // Reverse to face the cell we came from, then rotate once more; the
        // next scan starts one step further, past the backtrack cell.
        dir = (dir + 5) % DIRECTIONS.len();
    }
    None
}

/// Thin long rings at higher zooms, then drop colinear points.
fn simplify_ring(ring: Vec<Point>, zoom: u8) -> Vec<Point> {
    let len = ring.len();
    let thinned: Vec<Point> = if len > 6 && zoom >= THIN_FROM_ZOOM {
        ring.iter()
            .enumerate()
            .filter(|&(i, _)| i == 0 || i == len - 1 || i % 2 == 0)
            .map(|(_, p)| *p)
            .collect()
    } else {
        ring
    };
    remove_colinear(&thinned)
}

fn heading(a: Point, b: Point) -> f64 {
    (b[1] - a[1]).atan2(b[0] - a[0])
}

/// Drop interior points whose incoming and outgoing headings match.
fn remove_colinear(ring: &[Point]) -> Vec<Point> {
    let len = ring.len();
    if len < 3 {
        return ring.to_vec();
    }
    let mut out = Vec::with_capacity(len);
    out.push(ring[0]);
    for i in 1..len - 1 {
        let prev = out[out.len() - 1];
        if heading(prev, ring[i]) != heading(ring[i], ring[i + 1]) {
            out.push(ring[i]);
        }
    }
    out.push(ring[len - 1]);
    out
}

/// Add `ring` as a hole of the first polygon containing its first point, or
/// as a new polygon.
fn place_ring(polygons: &mut Vec<Polygon>, ring: Vec<Point>) {
    let first = ring[0];
    match polygons.iter_mut().find(|p| point_in_ring(first, &p.outer)) {
        Some(polygon) => polygon.holes.push(ring),
        None => polygons.push(Polygon::new(ring)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Sample;
    use crate::shade::Shade;

    /// Grid with lon = col and lat = -row (grid indices).
    fn unit_grid(size: usize) -> Grid {
        Grid::from_fn(size, |row, col| Sample::new(col as f64, -(row as f64), 0.0))
    }

    /// Shade map where interior cells selected by `dark(r, c)` are fully dark.
    fn mask_map(size: usize, dark: impl Fn(usize, usize) -> bool) -> ShadeMap {
        ShadeMap::from_fn(size, |row, col| {
            if row == 0 || col == 0 || row > size || col > size {
                return None;
            }
            let value = if dark(row - 1, col - 1) { 0.0 } else { 255.0 };
            Some(Shade {
                dark: value,
                light: 255.0,
            })
        })
    }

    fn shadow(threshold: f64) -> Band {
        Band {
            class: ShadeClass::Shadow,
            level: ShadeLevel::Ultra,
            threshold,
        }
    }

    #[test]
    fn test_square_block() {
        let grid = unit_grid(7);
        let shades = mask_map(7, |r, c| (2..=4).contains(&r) && (2..=4).contains(&c));
        for zoom in [9, 14] {
            let polygons = HullTracer::new(&grid, &shades, zoom).trace_band(shadow(100.0));
            assert_eq!(polygons.len(), 1);
            assert!(polygons[0].holes.is_empty());
            // Interior (r, c) sits at lon c + 1, lat -(r + 1)
            assert_eq!(
                polygons[0].outer,
                vec![[3.0, -3.0], [5.0, -3.0], [5.0, -5.0], [3.0, -5.0], [3.0, -3.0]]
            );
        }
    }

    #[test]
    fn test_thick_frame_has_hole() {
        let grid = unit_grid(9);
        let shades = mask_map(9, |r, c| {
            let frame = (1..=7).contains(&r) && (1..=7).contains(&c);
            let hole = (3..=5).contains(&r) && (3..=5).contains(&c);
            frame && !hole
        });
        let polygons = HullTracer::new(&grid, &shades, 9).trace_band(shadow(100.0));

        assert_eq!(polygons.len(), 1);
        let polygon = &polygons[0];
        assert_eq!(polygon.outer.len(), 5);
        assert_eq!(polygon.holes.len(), 1);
        let hole = &polygon.holes[0];
        assert_eq!(hole.first(), hole.last());
        assert!(point_in_ring(hole[0], &polygon.outer));
    }

    #[test]
    fn test_separate_blobs() {
        let grid = unit_grid(12);
        let shades = mask_map(12, |r, c| {
            let a = (1..=3).contains(&r) && (1..=3).contains(&c);
            let b = (6..=9).contains(&r) && (6..=9).contains(&c);
            a || b
        });
        let polygons = HullTracer::new(&grid, &shades, 12).trace_band(shadow(100.0));
        assert_eq!(polygons.len(), 2);
        assert!(polygons.iter().all(|p| p.holes.is_empty()));
    }

    #[test]
    fn test_isolated_pixels_are_skipped() {
        let grid = unit_grid(8);
        let shades = mask_map(8, |r, c| (r, c) == (3, 3) || (r, c) == (5, 6));
        let polygons = HullTracer::new(&grid, &shades, 12).trace_band(shadow(100.0));
        assert!(polygons.is_empty());
    }

    #[test]
    fn test_band_threshold_is_inclusive() {
        let grid = unit_grid(6);
        let shades = ShadeMap::from_fn(6, |row, col| {
            let inside = (2..=4).contains(&row) && (2..=4).contains(&col);
            let dark = if inside { 100.0 } else { 200.0 };
            Some(Shade { dark, light: 255.0 })
        });
        let tracer = HullTracer::new(&grid, &shades, 12);
        assert_eq!(tracer.trace_band(shadow(100.0)).len(), 1);
        assert!(tracer.trace_band(shadow(99.0)).is_empty());
    }

    #[test]
    fn test_trace_all_skips_empty_bands() {
        let grid = unit_grid(7);
        let shades = mask_map(7, |r, c| (2..=4).contains(&r) && (2..=4).contains(&c));
        let hulls = HullTracer::new(&grid, &shades, 12).trace_all(&HullThresholds::for_zoom(12));
        // All four shadow bands select the dark block; no cell is lit dimly enough
        // for a highlight band
        assert_eq!(hulls.len(), 4);
        assert!(hulls.iter().all(|h| h.class == ShadeClass::Shadow));
        assert_eq!(hulls[0].level, ShadeLevel::Ultra);
    }

    #[test]
    fn test_remove_colinear() {
        let ring = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [2.0, 2.0], [0.0, 0.0]];
        assert_eq!(remove_colinear(&ring), vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_thinning_keeps_endpoints() {
        let ring: Vec<Point> = (0..9).map(|i| [i as f64, (i * i) as f64]).collect();
        let thinned = simplify_ring(ring.clone(), 12);
        assert_eq!(thinned.first(), ring.first());
        assert_eq!(thinned.last(), ring.last());
        assert_eq!(thinned.len(), 5);
        assert_eq!(simplify_ring(ring.clone(), 9).len(), 9);
    }

    #[test]
    fn test_edge_rules_at_borders() {
        let size = 4;
        let shades = mask_map(size, |r, c| r == 3 || c == 0);
        let mask = BandMask {
            shades: &shades,
            band: shadow(100.0),
            size,
        };
        // left column: bottom neighbor in band
        assert!(mask.is_edge(0, 0));
        // bottom-left corner: right neighbor in band
        assert!(mask.is_edge(3, 0));
        // bottom row: left neighbor in band
        assert!(!mask.is_edge(3, 1));
        // bottom-right corner never starts a trace
        assert!(!mask.is_edge(3, 3));
    }
}
