//! Planar helpers shared by the contour and topology stages

use glam::DVec2;

/// Decimal digits kept when positions are compared as graph keys
///
/// Two crossings that agree to this many decimals are treated as the same
/// node when segments are stitched or noded.
pub const QUANTIZE_DECIMALS: i32 = 5;

/// Hashable stand-in for a position, rounded to [`QUANTIZE_DECIMALS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(i64, i64);

/// Round a position to the shared precision
#[inline]
pub fn quantize(position: DVec2) -> NodeKey {
    let scale = 10f64.powi(QUANTIZE_DECIMALS);
    NodeKey(
        (position.x * scale).round() as i64,
        (position.y * scale).round() as i64,
    )
}

/// Shoelace area of a ring; positive when counter-clockwise
///
/// Works with or without a repeated closing position.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let twice: f64 = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    twice * 0.5
}

/// Parameters along two segments where they touch
///
/// Returns `(t, u)` pairs with `p0 + t (p1 - p0) == q0 + u (q1 - q0)`, both in
/// `[0, 1]`. Proper crossings give one pair; collinear overlaps give the pair
/// for each overlap endpoint.
pub fn segment_intersections(p0: DVec2, p1: DVec2, q0: DVec2, q1: DVec2) -> Vec<(f64, f64)> {
    let r = p1 - p0;
    let s = q1 - q0;
    let denom = r.perp_dot(s);
    let offset = q0 - p0;
    let eps = 1e-12 * (r.length_squared() + s.length_squared()).max(1.0);

    if denom.abs() > eps {
        let t = offset.perp_dot(s) / denom;
        let u = offset.perp_dot(r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            return vec![(t, u)];
        }
        return Vec::new();
    }

    // Parallel: only collinear overlaps matter.
    if offset.perp_dot(r).abs() > eps || r.length_squared() == 0.0 || s.length_squared() == 0.0 {
        return Vec::new();
    }
    let rr = r.length_squared();
    let ss = s.length_squared();
    let project_p = |point: DVec2| (point - p0).dot(r) / rr;
    let project_q = |point: DVec2| (point - q0).dot(s) / ss;

    let mut hits = Vec::new();
    for (t, point) in [(project_p(q0), q0), (project_p(q1), q1)] {
        if (0.0..=1.0).contains(&t) {
            hits.push((t, project_q(point)));
        }
    }
    for (u, point) in [(project_q(p0), p0), (project_q(p1), p1)] {
        if (0.0..=1.0).contains(&u) {
            hits.push((project_p(point), u));
        }
    }
    hits
}

/// Even-odd test of `point` against a ring (closed or open)
///
/// Points exactly on the boundary may land on either side.
pub fn point_in_ring(point: DVec2, ring: &[DVec2]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
