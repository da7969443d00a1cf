//! Per-cell illumination from local slope and aspect.
//!
//! Gradients come from a 3x3 Sobel kernel. Each cell is lit from four fixed
//! azimuths at a 45 degree sun elevation; the two northerly lights reduce to
//! a `dark` intensity and the two southerly ones to a `light` intensity.

use std::f64::consts::PI;

use crate::grid::Grid;

/// Sun elevation above the horizon, in degrees.
pub const ZENITH_DEG: f64 = 45.0;

/// Azimuths (compass degrees) feeding the dark intensity.
pub const DARK_AZIMUTHS: [f64; 2] = [0.0, 310.0];

/// Azimuths (compass degrees) feeding the light intensity.
pub const LIGHT_AZIMUTHS: [f64; 2] = [130.0, 180.0];

/// Compass azimuth to the math angle used against the aspect.
fn azimuth_rad(azimuth_deg: f64) -> f64 {
    (360.0 - azimuth_deg + 90.0).to_radians()
}

/// Shade intensities of one cell, on a 0..=255 scale (negative when facing
/// fully away from the light).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shade {
    pub dark: f64,
    pub light: f64,
}

/// Slope and aspect (radians) of a 3x3 neighborhood given row-major, north
/// row first.
pub fn slope_aspect(n: &[[f64; 3]; 3], cell_size: f64) -> (f64, f64) {
    let [[nw, north, ne], [w, _, e], [sw, south, se]] = *n;
    let dz_dx = ((ne + 2.0 * e + se) - (nw + 2.0 * w + sw)) / (8.0 * cell_size);
    let dz_dy = ((sw + 2.0 * south + se) - (nw + 2.0 * north + ne)) / (8.0 * cell_size);
    let slope = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan();

    let aspect = if dz_dx == 0.0 {
        if dz_dy > 0.0 {
            PI / 2.0
        } else if dz_dy < 0.0 {
            2.0 * PI - PI / 2.0
        } else {
            slope
        }
    } else {
        let a = dz_dy.atan2(-dz_dx);
        if a < 0.0 {
            2.0 * PI + a
        } else {
            a
        }
    };
    (slope, aspect)
}

/// Hillshade intensity for light from `azimuth_deg`.
pub fn intensity(slope: f64, aspect: f64, azimuth_deg: f64) -> f64 {
    let zenith = ZENITH_DEG.to_radians();
    255.0 * (zenith.cos() * slope.cos() + zenith.sin() * slope.sin() * (azimuth_rad(azimuth_deg) - aspect).cos())
}

/// Dark/light pair for a neighborhood.
pub fn shade(n: &[[f64; 3]; 3], cell_size: f64) -> Shade {
    let (slope, aspect) = slope_aspect(n, cell_size);
    let [d1, d2] = DARK_AZIMUTHS.map(|az| intensity(slope, aspect, az));
    let [l1, l2] = LIGHT_AZIMUTHS.map(|az| intensity(slope, aspect, az));
    Shade {
        dark: d1.min(d2),
        // TODO: min mirrors the dark reduction; check against rendered output whether highlights want max
        light: l1.min(l2),
    }
}

/// Shade for every interior grid cell, indexed like the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadeMap {
    size: usize,
    cells: Vec<Option<Shade>>,
}

impl ShadeMap {
    /// Shade the interior of `grid`. Cells missing any of their nine samples
    /// get no shade.
    pub fn compute(grid: &Grid, cell_size: f64) -> Self {
        let size = grid.size();
        Self::from_fn(size, |row, col| {
            if row == 0 || col == 0 || row > size || col > size {
                return None;
            }
            let mut n = [[0.0; 3]; 3];
            for (dr, window_row) in n.iter_mut().enumerate() {
                for (dc, value) in window_row.iter_mut().enumerate() {
                    *value = grid.elevation(row + dr - 1, col + dc - 1)?;
                }
            }
            Some(shade(&n, cell_size))
        })
    }

    /// Build from `shade(row, col)` over the full `(size + 2)^2` layout.
    pub fn from_fn(size: usize, mut shade: impl FnMut(usize, usize) -> Option<Shade>) -> Self {
        let dim = size + 2;
        let mut cells = Vec::with_capacity(dim * dim);
        for row in 0..dim {
            for col in 0..dim {
                cells.push(shade(row, col));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Shade at grid position `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<Shade> {
        let dim = self.size + 2;
        if row >= dim || col >= dim {
            return None;
        }
        self.cells[row * dim + col]
    }

    /// Number of shaded cells.
    pub fn shaded(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
