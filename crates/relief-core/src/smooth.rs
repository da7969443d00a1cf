//! Zigzag removal and corner rounding for contour polylines.
//!
//! Marching squares produces lines that step back and forth across the
//! sample lattice. A four-point window slides along each line: when the two
//! middle points straddle the chord between the outer two, both are dropped;
//! otherwise the middle pair is replaced by its midpoint.

use crate::geometry::{side_of_line, Point, Polyline};

/// True when `p1` and `p2` lie on opposite sides of the line `a -> b`.
fn is_staircase(a: Point, b: Point, p1: Point, p2: Point) -> bool {
    side_of_line(a, b, p1) * side_of_line(a, b, p2) < 0.0
}

fn midpoint(a: Point, b: Point) -> Point {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

/// Smooth one polyline. The first and last points are kept as they are;
/// lines shorter than three points are returned unchanged.
pub fn smooth_line(line: &[Point]) -> Polyline {
    let len = line.len();
    if len < 3 {
        return line.to_vec();
    }

    let mut out = Vec::with_capacity(len);
    out.push(line[0]);
    let mut prev = line[0];
    let mut i = 1;
    while i + 2 < len {
        let curr = line[i];
        let next = line[i + 1];
        let after = line[i + 2];
        if is_staircase(prev, after, curr, next) {
            // prev stays put: curr and next are gone
            out.push(after);
            i += 2;
        } else {
            out.push(midpoint(curr, next));
            prev = curr;
            i += 1;
        }
    }

    let last = line[len - 1];
    if out.last() != Some(&last) {
        out.push(last);
    }
    out
}

/// Smooth every polyline in place.
pub fn smooth_lines(lines: &mut [Polyline]) {
    for line in lines.iter_mut() {
        *line = smooth_line(line);
    }
}
