//! Moving-average smoothing of contour lines

use glam::DVec2;

use super::ContourLine;

/// 3-point moving average over a polyline
///
/// Each interior position becomes the mean of itself and its two neighbours
/// in the input; the first and last positions are kept as they are, so a
/// polyline of two positions comes back unchanged.
///
/// # Example
///
/// ```
/// use elevation_surface::{smooth_polyline, DVec2};
///
/// let line = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 3.0), DVec2::new(2.0, 0.0)];
/// let smoothed = smooth_polyline(&line);
/// assert_eq!(smoothed, vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0), DVec2::new(2.0, 0.0)]);
/// ```
pub fn smooth_polyline(points: &[DVec2]) -> Vec<DVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let mut smoothed = Vec::with_capacity(points.len());
    smoothed.push(points[0]);
    smoothed.extend(points.windows(3).map(|w| (w[0] + w[1] + w[2]) / 3.0));
    smoothed.push(points[last]);
    smoothed
}

/// Smooth every line independently, keeping its level
pub fn smooth_contours(lines: &[ContourLine]) -> Vec<ContourLine> {
    lines
        .iter()
        .map(|line| ContourLine::new(line.level, smooth_polyline(&line.points)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_point_line_is_unchanged() {
        let line = [DVec2::new(0.0, 0.0), DVec2::new(5.0, 5.0)];
        assert_eq!(smooth_polyline(&line), line.to_vec());
        assert!(smooth_polyline(&[]).is_empty());
    }

    #[test]
    fn test_uses_input_neighbours() {
        let line = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 3.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(3.0, 3.0),
        ];
        let smoothed = smooth_polyline(&line);
        assert_eq!(smoothed.len(), 4);
        assert_eq!(smoothed[0], line[0]);
        assert_eq!(smoothed[3], line[3]);
        assert_eq!(smoothed[1], DVec2::new(1.0, 1.0));
        assert_eq!(smoothed[2], DVec2::new(2.0, 2.0));
    }

    #[test]
    fn test_straight_line_is_a_fixed_point() {
        let line: Vec<DVec2> = (0..6).map(|i| DVec2::new(i as f64, 2.0 * i as f64)).collect();
        let smoothed = smooth_polyline(&line);
        for (a, b) in line.iter().zip(&smoothed) {
            assert!((*a - *b).length() < 1e-12);
        }
    }

    #[test]
    fn test_contours_keep_levels() {
        let lines = vec![
            ContourLine::new(5.0, vec![DVec2::ZERO, DVec2::ONE]),
            ContourLine::new(
                7.5,
                vec![DVec2::ZERO, DVec2::new(1.0, 3.0), DVec2::new(2.0, 0.0)],
            ),
        ];
        let smoothed = smooth_contours(&lines);
        assert_eq!(smoothed[0], lines[0]);
        assert_eq!(smoothed[1].level, 7.5);
        assert_eq!(smoothed[1].points[1], DVec2::new(1.0, 1.0));
    }
}
