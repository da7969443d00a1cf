//! GeoJSON encoding of tile features.
//!
//! Contours become `LineString` features with `{ele, index}` properties;
//! hull bands become `MultiPolygon` features with `{shade, level}`. Every
//! feature carries a `tippecanoe.layer` member naming the output layer.

use relief_core::{ContourFeature, Feature, FeatureCollection, HullFeature, Point, Polygon};
use serde_json::{json, Value};

fn coordinates(points: &[Point]) -> Value {
    Value::Array(points.iter().map(|p| json!([p[0], p[1]])).collect())
}

fn polygon_rings(polygon: &Polygon) -> Value {
    let mut rings = vec![coordinates(&polygon.outer)];
    rings.extend(polygon.holes.iter().map(|hole| coordinates(hole)));
    Value::Array(rings)
}

fn contour_feature(contour: &ContourFeature, layer: &str) -> Value {
    json!({
        "type": "Feature",
        "properties": { "ele": contour.level, "index": contour.index },
        "tippecanoe": { "layer": layer },
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates(&contour.line),
        },
    })
}

fn hull_feature(hull: &HullFeature, layer: &str) -> Value {
    json!({
        "type": "Feature",
        "properties": { "shade": hull.class.as_str(), "level": hull.level.as_str() },
        "tippecanoe": { "layer": layer },
        "geometry": {
            "type": "MultiPolygon",
            "coordinates": Value::Array(hull.polygons.iter().map(polygon_rings).collect()),
        },
    })
}

/// Encode one feature.
pub fn feature_to_value(feature: &Feature, layer: &str) -> Value {
    match feature {
        Feature::Contour(contour) => contour_feature(contour, layer),
        Feature::Hull(hull) => hull_feature(hull, layer),
    }
}

/// Encode a whole collection as a GeoJSON `FeatureCollection`.
pub fn to_geojson(collection: &FeatureCollection) -> Value {
    let features: Vec<Value> = collection
        .features
        .iter()
        .map(|f| feature_to_value(f, &collection.layer))
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
