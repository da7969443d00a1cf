//! Output features for one tile.

use std::collections::BTreeMap;

use crate::contour::Level;
use crate::geometry::{Polygon, Polyline};
use crate::hull::{Hull, ShadeClass, ShadeLevel};

/// A contour polyline at one elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourFeature {
    /// Elevation of the line.
    pub level: Level,
    /// Position of the level within its group of ten intervals.
    pub index: i64,
    pub line: Polyline,
}

/// The polygons of one shade band.
#[derive(Debug, Clone, PartialEq)]
pub struct HullFeature {
    pub class: ShadeClass,
    pub level: ShadeLevel,
    pub polygons: Vec<Polygon>,
}

/// A single output feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    /// Rendered as a LineString.
    Contour(ContourFeature),
    /// Rendered as a MultiPolygon.
    Hull(HullFeature),
}

/// All features of a tile, tagged with the output layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub layer: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// An empty collection for `layer`.
    pub fn new(layer: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            features: Vec::new(),
        }
    }

    /// Contours in ascending level order followed by hulls in band order.
    ///
    /// `index` derives the decile index of a level. Polylines with fewer
    /// than two points are dropped.
    pub fn assemble(
        layer: impl Into<String>,
        contours: BTreeMap<Level, Vec<Polyline>>,
        index: impl Fn(Level) -> i64,
        hulls: Vec<Hull>,
    ) -> Self {
        let mut collection = Self::new(layer);
        for (level, lines) in contours {
            let idx = index(level);
            collection.features.extend(
                lines
                    .into_iter()
                    .filter(|line| line.len() >= 2)
                    .map(|line| Feature::Contour(ContourFeature { level, index: idx, line })),
            );
        }
        collection.features.extend(hulls.into_iter().map(|hull| {
            Feature::Hull(HullFeature {
                class: hull.class,
                level: hull.level,
                polygons: hull.polygons,
            })
        }));
        collection
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Contour features only.
    pub fn contours(&self) -> impl Iterator<Item = &ContourFeature> {
        self.features.iter().filter_map(|f| match f {
            Feature::Contour(c) => Some(c),
            Feature::Hull(_) => None,
        })
    }

    /// Hull features only.
    pub fn hulls(&self) -> impl Iterator<Item = &HullFeature> {
        self.features.iter().filter_map(|f| match f {
            Feature::Hull(h) => Some(h),
            Feature::Contour(_) => None,
        })
    }
}
