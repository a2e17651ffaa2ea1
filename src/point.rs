//! Elevation samples
//!
//! Scattered input points: a planar position plus named scalar values.

use std::collections::BTreeMap;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};

/// A single scattered sample
///
/// Positions are planar (already projected). A sample may carry any number of
/// named values; the pipeline reads the one named by
/// [`SurfaceConfig::property`](crate::SurfaceConfig::property).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoint {
    /// Planar position
    pub position: DVec2,
    /// Values by property name
    pub values: BTreeMap<String, f64>,
}

impl SamplePoint {
    /// Create a sample with a single `"z"` value
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::at(DVec2::new(x, y)).with_value("z", z)
    }

    /// Create a sample without any values
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            values: BTreeMap::new(),
        }
    }

    /// Attach (or replace) a named value
    pub fn with_value(mut self, property: impl Into<String>, value: f64) -> Self {
        self.values.insert(property.into(), value);
        self
    }

    /// Read a named value
    ///
    /// A sample without the property counts as 0, so a partially attributed
    /// point set still interpolates.
    #[inline]
    pub fn value(&self, property: &str) -> f64 {
        self.values.get(property).copied().unwrap_or(0.0)
    }
}

/// Axis-aligned bounding box of a point set
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// Create a box from its corners
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every position, `None` for an empty iterator
    pub fn from_positions(positions: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut positions = positions.into_iter();
        let first = positions.next()?;
        Some(positions.fold(Self::new(first, first), |bbox, p| {
            Self::new(bbox.min.min(p), bbox.max.max(p))
        }))
    }

    /// Extent along x
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Midpoint of the box
    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Width times height
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Corners counter-clockwise from the minimum corner
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }
}

/// Ordered collection of samples
///
/// Order does not affect interpolation; the triangulator sorts its own copy,
/// so repeated runs on the same set are reproducible.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<SamplePoint>,
}

impl PointSet {
    /// Wrap a list of samples
    pub fn new(points: Vec<SamplePoint>) -> Self {
        Self { points }
    }

    /// Build a set of `"z"` samples from `(x, y, z)` triples
    ///
    /// # Example
    ///
    /// ```
    /// use elevation_surface::PointSet;
    ///
    /// let points = PointSet::from_xyz(&[(0.0, 0.0, 10.0), (10.0, 0.0, 20.0)]);
    /// assert_eq!(points.len(), 2);
    /// assert_eq!(points.values("z"), vec![10.0, 20.0]);
    /// ```
    pub fn from_xyz(triples: &[(f64, f64, f64)]) -> Self {
        Self::new(
            triples
                .iter()
                .map(|&(x, y, z)| SamplePoint::new(x, y, z))
                .collect(),
        )
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All samples in input order
    #[inline]
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Iterate over the samples
    pub fn iter(&self) -> std::slice::Iter<'_, SamplePoint> {
        self.points.iter()
    }

    /// Append a sample
    pub fn push(&mut self, point: SamplePoint) {
        self.points.push(point);
    }

    /// Values of one property, in sample order
    pub fn values(&self, property: &str) -> Vec<f64> {
        self.points.iter().map(|p| p.value(property)).collect()
    }

    /// Bounding box of all sample positions, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_positions(self.points.iter().map(|p| p.position))
    }

    /// Reject samples with NaN or infinite coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first offending sample
    pub fn validate(&self) -> Result<()> {
        match self.points.iter().position(|p| !p.position.is_finite()) {
            Some(index) => Err(SurfaceError::InvalidInput(format!(
                "sample {} has a non-finite position {:?}",
                index, self.points[index].position
            ))),
            None => Ok(()),
        }
    }
}

impl From<Vec<SamplePoint>> for PointSet {
    fn from(points: Vec<SamplePoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<SamplePoint> for PointSet {
    fn from_iter<I: IntoIterator<Item = SamplePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a SamplePoint;
    type IntoIter = std::slice::Iter<'a, SamplePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_values() {
        let sample = SamplePoint::new(1.0, 2.0, 30.0).with_value("depth", -4.0);
        assert_eq!(sample.value("z"), 30.0);
        assert_eq!(sample.value("depth"), -4.0);
        assert_eq!(sample.value("missing"), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let points = PointSet::from_xyz(&[(0.0, 5.0, 1.0), (10.0, -2.0, 2.0), (3.0, 8.0, 3.0)]);
        let bbox = points.bounding_box().unwrap();
        assert_eq!(bbox.min, DVec2::new(0.0, -2.0));
        assert_eq!(bbox.max, DVec2::new(10.0, 8.0));
        assert_eq!(bbox.width(), 10.0);
        assert_eq!(bbox.height(), 10.0);
        assert_eq!(bbox.center(), DVec2::new(5.0, 3.0));
    }

    #[test]
    fn test_empty_set() {
        let points = PointSet::default();
        assert!(points.is_empty());
        assert!(points.bounding_box().is_none());
    }

    #[test]
    fn test_single_point_bbox_has_zero_area() {
        let points = PointSet::from_xyz(&[(4.0, 4.0, 1.0)]);
        let bbox = points.bounding_box().unwrap();
        assert_eq!(bbox.area(), 0.0);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let points = PointSet::from_xyz(&[(0.0, 0.0, 1.0), (f64::NAN, 1.0, 2.0)]);
        assert!(matches!(points.validate(), Err(SurfaceError::InvalidInput(_))));
        assert!(PointSet::from_xyz(&[(0.0, 0.0, 1.0)]).validate().is_ok());
    }
}
