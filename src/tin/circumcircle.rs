//! Circumcircles of candidate triangles

use glam::DVec2;

/// Determinant magnitude below which three vertices count as collinear
pub(crate) const COLLINEAR_EPSILON: f64 = 1e-6;

/// Centre and squared radius of a triangle's circumcircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Circumcircle {
    pub center: DVec2,
    pub radius_sq: f64,
}

impl Circumcircle {
    /// Circumcircle through `a`, `b` and `c`
    ///
    /// Nearly collinear triples fall back to the centre and half-diagonal of
    /// their bounding box instead of dividing by a vanishing determinant.
    pub fn new(a: DVec2, b: DVec2, c: DVec2) -> Self {
        let ab = b - a;
        let ac = c - a;
        let e = ab.dot(a + b);
        let f = ac.dot(a + c);
        let g = 2.0 * (ab.x * (c.y - b.y) - ab.y * (c.x - b.x));

        if g.abs() < COLLINEAR_EPSILON {
            let min = a.min(b).min(c);
            let half = (a.max(b).max(c) - min) * 0.5;
            return Self {
                center: min + half,
                radius_sq: half.length_squared(),
            };
        }

        let center = DVec2::new((ac.y * e - ab.y * f) / g, (ab.x * f - ac.x * e) / g);
        Self {
            center,
            radius_sq: center.distance_squared(a),
        }
    }

    /// Whether `point` lies inside or on the circle
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point.distance_squared(self.center) <= self.radius_sq
    }

    /// Whether `point` lies so far right of the circle that no point with a
    /// larger x can fall inside it either
    #[inline]
    pub fn is_left_of(&self, point: DVec2) -> bool {
        let dx = point.x - self.center.x;
        dx > 0.0 && dx * dx > self.radius_sq
    }
}
