//! Triangulated irregular network
//!
//! The triangle surface built directly on the samples, with each corner
//! carrying the value of the sample it sits on.

mod circumcircle;
mod delaunay;

pub use delaunay::triangulate;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::signed_area;

/// Triangle corner: a sample position and its value
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: DVec2,
    pub value: f64,
}

impl Corner {
    /// Create a corner
    pub fn new(position: DVec2, value: f64) -> Self {
        Self { position, value }
    }
}

/// One triangle of the network
///
/// Corners are always input samples; triangles touching the synthetic
/// bounding triangle used during construction never appear.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Corner,
    pub b: Corner,
    pub c: Corner,
}

impl Triangle {
    /// Create a triangle from its corners in winding order
    pub fn new(a: Corner, b: Corner, c: Corner) -> Self {
        Self { a, b, c }
    }

    /// Corners in winding order
    #[inline]
    pub fn corners(&self) -> [Corner; 3] {
        [self.a, self.b, self.c]
    }

    /// Corner positions in winding order
    #[inline]
    pub fn positions(&self) -> [DVec2; 3] {
        [self.a.position, self.b.position, self.c.position]
    }

    /// Corner values in winding order
    #[inline]
    pub fn values(&self) -> [f64; 3] {
        [self.a.value, self.b.value, self.c.value]
    }

    /// Closed outline `a, b, c, a`
    pub fn ring(&self) -> [DVec2; 4] {
        [self.a.position, self.b.position, self.c.position, self.a.position]
    }

    /// Unsigned area
    pub fn area(&self) -> f64 {
        signed_area(&self.positions()).abs()
    }

    /// Edges `(a, b)`, `(b, c)`, `(c, a)`
    pub fn edges(&self) -> [(Corner, Corner); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    /// Smallest and largest corner value
    pub fn value_range(&self) -> (f64, f64) {
        let [a, b, c] = self.values();
        (a.min(b).min(c), a.max(b).max(c))
    }
}
