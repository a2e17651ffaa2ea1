//! GeoJSON conversions (requires the `geojson` feature)
//!
//! Input is a collection of point features whose numeric properties become
//! sample values. Every output converts to a feature collection carrying the
//! attributes a map layer needs to style it.

use ::geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use glam::DVec2;

use crate::contour::ContourLine;
use crate::error::{Result, SurfaceError};
use crate::model::Surface;
use crate::point::{PointSet, SamplePoint};
use crate::topology::{LineNetwork, Topology};

impl TryFrom<&FeatureCollection> for PointSet {
    type Error = SurfaceError;

    /// Read point features into samples
    ///
    /// Numeric properties become values; other properties are skipped. A
    /// third coordinate is stored as `"z"` unless a `z` property exists.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a feature without point geometry
    fn try_from(collection: &FeatureCollection) -> Result<Self> {
        collection
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| sample_from_feature(index, feature))
            .collect::<Result<Vec<SamplePoint>>>()
            .map(PointSet::new)
    }
}

fn sample_from_feature(index: usize, feature: &Feature) -> Result<SamplePoint> {
    let coords = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => coords,
        _ => {
            return Err(SurfaceError::InvalidInput(format!(
                "feature {} is not a point",
                index
            )))
        }
    };

    let mut sample = SamplePoint::at(DVec2::new(coords[0], coords[1]));
    if let Some(properties) = &feature.properties {
        for (name, value) in properties {
            if let Some(number) = value.as_f64() {
                sample.values.insert(name.clone(), number);
            }
        }
    }
    if let Some(&z) = coords.get(2) {
        sample.values.entry("z".to_string()).or_insert(z);
    }
    Ok(sample)
}

fn position(p: DVec2) -> Vec<f64> {
    vec![p.x, p.y]
}

fn ring(points: &[DVec2]) -> Vec<Vec<f64>> {
    points.iter().copied().map(position).collect()
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Grid cells or triangles as polygon features
///
/// Grid cells carry their value under `property`; triangles carry their
/// corner values as `a`, `b` and `c`.
pub fn surface_to_geojson(surface: &Surface, property: &str) -> FeatureCollection {
    let features = match surface {
        Surface::Grid(grid) => grid
            .cells
            .iter()
            .map(|cell| {
                let mut properties = JsonObject::new();
                properties.insert(property.to_string(), JsonValue::from(cell.value));
                feature(Value::Polygon(vec![ring(&cell.ring())]), properties)
            })
            .collect(),
        Surface::Tin(triangles) => triangles
            .iter()
            .map(|triangle| {
                let mut properties = JsonObject::new();
                properties.insert("a".to_string(), JsonValue::from(triangle.a.value));
                properties.insert("b".to_string(), JsonValue::from(triangle.b.value));
                properties.insert("c".to_string(), JsonValue::from(triangle.c.value));
                feature(Value::Polygon(vec![ring(&triangle.ring())]), properties)
            })
            .collect(),
    };
    collection(features)
}

/// Contour lines as line features tagged `{ "z": level }`
pub fn contours_to_geojson(contours: &[ContourLine]) -> FeatureCollection {
    collection(
        contours
            .iter()
            .map(|line| {
                let mut properties = JsonObject::new();
                properties.insert("z".to_string(), JsonValue::from(line.level));
                feature(Value::LineString(ring(&line.points)), properties)
            })
            .collect(),
    )
}

/// Line network as plain line features
pub fn network_to_geojson(network: &LineNetwork) -> FeatureCollection {
    collection(
        network
            .lines
            .iter()
            .map(|line| feature(Value::LineString(ring(line)), JsonObject::new()))
            .collect(),
    )
}

/// Regions as polygon features tagged `{ "color": "#rrggbb" }`, and the
/// line network they were built from
pub fn topology_to_geojson(topology: &Topology) -> (FeatureCollection, FeatureCollection) {
    let regions = topology
        .regions
        .iter()
        .map(|region| {
            let mut rings = vec![ring(&region.polygon.exterior)];
            rings.extend(region.polygon.holes.iter().map(|hole| ring(hole)));
            let mut properties = JsonObject::new();
            properties.insert("color".to_string(), JsonValue::from(region.color.to_hex()));
            feature(Value::Polygon(rings), properties)
        })
        .collect();
    (collection(regions), network_to_geojson(&topology.network))
}
