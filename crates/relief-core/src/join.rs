//! Line joining: stitch raw segments into polylines.
//!
//! Two lines merge when an endpoint of one coincides exactly with an endpoint
//! of the other. Merging repeats until a full pass finds nothing to merge, so
//! running the joiner over its own output changes nothing.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::contour::Level;
use crate::geometry::{Point, Polyline, Segment};

/// Bitwise key for exact coordinate matching. `+ 0.0` folds `-0.0` into `0.0`.
type PointKey = (u64, u64);

fn key(point: Point) -> PointKey {
    ((point[0] + 0.0).to_bits(), (point[1] + 0.0).to_bits())
}

/// How line `i` attaches to line `j`, in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    /// head(i) == tail(j): `j + i[1..]`
    HeadToTail,
    /// tail(i) == head(j): `i + j[1..]`
    TailToHead,
    /// head(i) == head(j): `reverse(i)[..-1] + j`
    HeadToHead,
    /// tail(i) == tail(j): `j + reverse(i)[1..]`
    TailToTail,
}

struct Joiner {
    lines: Vec<Option<Polyline>>,
    ends: HashMap<PointKey, Vec<usize>>,
}

impl Joiner {
    fn new(lines: Vec<Polyline>) -> Self {
        let mut joiner = Self {
            lines: lines.into_iter().map(Some).collect(),
            ends: HashMap::new(),
        };
        for idx in 0..joiner.lines.len() {
            joiner.register(idx);
        }
        joiner
    }

    fn endpoints(&self, idx: usize) -> Option<(Point, Point)> {
        let line = self.lines[idx].as_ref()?;
        Some((*line.first()?, *line.last()?))
    }

    fn register(&mut self, idx: usize) {
        if let Some((head, tail)) = self.endpoints(idx) {
            self.ends.entry(key(head)).or_default().push(idx);
            if key(head) != key(tail) {
                self.ends.entry(key(tail)).or_default().push(idx);
            }
        }
    }

    fn unregister(&mut self, idx: usize) {
        if let Some((head, tail)) = self.endpoints(idx) {
            for k in [key(head), key(tail)] {
                if let Some(ids) = self.ends.get_mut(&k) {
                    ids.retain(|&other| other != idx);
                }
            }
        }
    }

    /// Lowest-indexed live line other than `exclude` whose head (or tail)
    /// sits on `point`.
    fn partner(&self, exclude: usize, point: Point, at_head: bool) -> Option<usize> {
        let k = key(point);
        self.ends
            .get(&k)?
            .iter()
            .copied()
            .filter(|&j| j != exclude)
            .filter(|&j| match self.endpoints(j) {
                Some((head, tail)) => key(if at_head { head } else { tail }) == k,
                None => false,
            })
            .min()
    }

    fn find_merge(&self, i: usize) -> Option<(usize, Orientation)> {
        let (head, tail) = self.endpoints(i)?;
        self.partner(i, head, false)
            .map(|j| (j, Orientation::HeadToTail))
            .or_else(|| self.partner(i, tail, true).map(|j| (j, Orientation::TailToHead)))
            .or_else(|| self.partner(i, head, true).map(|j| (j, Orientation::HeadToHead)))
            .or_else(|| self.partner(i, tail, false).map(|j| (j, Orientation::TailToTail)))
    }

    /// Fold line `i` into line `j` and drop `i`.
    fn merge(&mut self, i: usize, j: usize, orientation: Orientation) {
        self.unregister(i);
        self.unregister(j);
        let (Some(src), Some(dst)) = (self.lines[i].take(), self.lines[j].take()) else {
            return;
        };

        let merged = match orientation {
            Orientation::HeadToTail => {
                let mut out = dst;
                out.extend_from_slice(&src[1..]);
                out
            }
            Orientation::TailToHead => {
                let mut out = src;
                out.extend_from_slice(&dst[1..]);
                out
            }
            Orientation::HeadToHead => {
                let mut out: Polyline = src.iter().rev().take(src.len() - 1).copied().collect();
                out.extend(dst);
                out
            }
            Orientation::TailToTail => {
                let mut out = dst;
                out.extend(src.iter().rev().skip(1).copied());
                out
            }
        };

        self.lines[j] = Some(merged);
        self.register(j);
    }

    fn run(mut self) -> Vec<Polyline> {
        let mut passes = 0usize;
        let mut merges = 0usize;
        loop {
            passes += 1;
            let mut changed = false;
            for i in 0..self.lines.len() {
                if let Some((j, orientation)) = self.find_merge(i) {
                    self.merge(i, j, orientation);
                    merges += 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        trace!(passes, merges, "joined lines");
        self.lines.into_iter().flatten().collect()
    }
}

/// Join polylines that share endpoints until none remain joinable.
pub fn join_lines(lines: Vec<Polyline>) -> Vec<Polyline> {
    Joiner::new(lines.into_iter().filter(|l| !l.is_empty()).collect()).run()
}

/// Join the raw segments of one level.
pub fn join_segments(segments: &[Segment]) -> Vec<Polyline> {
    join_lines(segments.iter().map(|s| s.to_vec()).collect())
}

/// Join every level.
pub fn join(segments: &BTreeMap<Level, Vec<Segment>>) -> BTreeMap<Level, Vec<Polyline>> {
    segments
        .iter()
        .map(|(&level, segs)| (level, join_segments(segs)))
        .collect()
}
