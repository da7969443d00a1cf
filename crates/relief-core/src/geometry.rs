//! Geometric primitives shared by the contour and hull stages.

/// A `[lon, lat]` position in degrees.
pub type Point = [f64; 2];

/// A two-point line, the marching-squares output for one level in one cell.
pub type Segment = [Point; 2];

/// An ordered run of points; not necessarily closed.
pub type Polyline = Vec<Point>;

/// A polygon with one closed outer ring and any number of holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Closed outer ring (first point == last point).
    pub outer: Vec<Point>,
    /// Closed inner rings.
    pub holes: Vec<Vec<Point>>,
}

impl Polygon {
    /// A polygon with no holes.
    pub fn new(outer: Vec<Point>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }
}

/// Which side of the directed line `a -> b` the point `p` lies on.
///
/// Positive and negative results are opposite sides; zero is on the line.
pub fn side_of_line(a: Point, b: Point, p: Point) -> f64 {
    (a[1] - b[1]) * (p[0] - a[0]) + (b[0] - a[0]) * (p[1] - a[1])
}

/// Even-odd ray casting test of `point` against a ring.
///
/// The ring may be open or closed; points exactly on an edge may land on
/// either side.
pub fn point_in_ring(point: Point, ring: &[Point]) -> bool {
    let [x, y] = point;
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
