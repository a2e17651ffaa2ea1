//! Contour extraction
//!
//! Isolines at equally spaced breaks, traced either over the interpolated
//! grid or across the triangles of a TIN, then joined into polylines.

mod isolines;
mod smooth;
mod stitch;
mod triangles;

pub use isolines::contours_from_grid;
pub use smooth::{smooth_contours, smooth_polyline};
pub use stitch::{CyclePolicy, SegmentGraph};
pub use triangles::contours_from_tin;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::quantize;

/// A polyline of constant value
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLine {
    /// Break value this line traces
    pub level: f64,
    /// Ordered positions, at least two
    pub points: Vec<DVec2>,
}

impl ContourLine {
    /// Create a line at `level`
    pub fn new(level: f64, points: Vec<DVec2>) -> Self {
        Self { level, points }
    }

    /// Number of positions
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the line has no positions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the line ends where it starts (a ring)
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(&first), Some(&last)) if self.points.len() > 2 => {
                quantize(first) == quantize(last)
            }
            _ => false,
        }
    }

    /// Summed segment lengths
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// `count` equally spaced breaks strictly between the extremes of `values`
///
/// Break `i` (from 1) is `min + (max - min) / (count + 1) * i`. Non-finite
/// values are ignored; no values, a zero count or `min == max` give none.
///
/// # Example
///
/// ```
/// use elevation_surface::equal_interval_breaks;
///
/// let breaks = equal_interval_breaks(&[10.0, 20.0, 30.0], 2);
/// assert_eq!(breaks.len(), 2);
/// assert!((breaks[0] - 16.666_666).abs() < 1e-5);
/// assert!((breaks[1] - 23.333_333).abs() < 1e-5);
///
/// assert!(equal_interval_breaks(&[4.0, 4.0], 3).is_empty());
/// ```
pub fn equal_interval_breaks(values: &[f64], count: usize) -> Vec<f64> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = match finite.next() {
        Some(v) => v,
        None => return Vec::new(),
    };
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if count == 0 || min == max {
        return Vec::new();
    }
    let step = (max - min) / (count + 1) as f64;
    (1..=count).map(|i| min + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_are_strictly_increasing_and_inside() {
        let values = [3.0, -2.0, 11.5, 7.0, f64::NAN];
        let breaks = equal_interval_breaks(&values, 9);
        assert_eq!(breaks.len(), 9);
        assert!(breaks.windows(2).all(|w| w[0] < w[1]));
        assert!(breaks[0] > -2.0 && breaks[8] < 11.5);
    }

    #[test]
    fn test_breaks_degenerate_inputs() {
        assert!(equal_interval_breaks(&[], 5).is_empty());
        assert!(equal_interval_breaks(&[1.0, 2.0], 0).is_empty());
        assert!(equal_interval_breaks(&[f64::NAN], 2).is_empty());
        assert!(equal_interval_breaks(&[6.0, 6.0, 6.0], 2).is_empty());
    }

    #[test]
    fn test_single_break_is_midpoint() {
        assert_eq!(equal_interval_breaks(&[0.0, 10.0], 1), vec![5.0]);
    }

    #[test]
    fn test_contour_line_helpers() {
        let open = ContourLine::new(1.0, vec![DVec2::ZERO, DVec2::new(3.0, 4.0)]);
        assert!(!open.is_closed());
        assert_eq!(open.length(), 5.0);

        let ring = ContourLine::new(
            1.0,
            vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::ZERO],
        );
        assert!(ring.is_closed());
        assert_eq!(ring.len(), 4);
    }
}
