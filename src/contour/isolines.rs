//! Marching squares over the grid's centroid lattice

use std::time::Instant;

use glam::DVec2;

use super::stitch::{CyclePolicy, SegmentGraph};
use super::{equal_interval_breaks, ContourLine};
use crate::interpolation::Grid;

/// One lattice square: corner positions and values, counter-clockwise from
/// the lower left
struct LatticeSquare {
    positions: [DVec2; 4],
    values: [f64; 4],
}

// Corner indices
const BOTTOM_LEFT: usize = 0;
const BOTTOM_RIGHT: usize = 1;
const TOP_RIGHT: usize = 2;
const TOP_LEFT: usize = 3;

/// Sides of a square as corner index pairs
#[derive(Debug, Clone, Copy)]
enum Side {
    Bottom,
    Right,
    Top,
    Left,
}

impl Side {
    fn corners(self) -> (usize, usize) {
        match self {
            Side::Bottom => (BOTTOM_LEFT, BOTTOM_RIGHT),
            Side::Right => (BOTTOM_RIGHT, TOP_RIGHT),
            Side::Top => (TOP_LEFT, TOP_RIGHT),
            Side::Left => (BOTTOM_LEFT, TOP_LEFT),
        }
    }
}

impl LatticeSquare {
    fn at(grid: &Grid, column: usize, row: usize) -> Option<Self> {
        let corners = [
            grid.cell(column, row)?,
            grid.cell(column + 1, row)?,
            grid.cell(column + 1, row + 1)?,
            grid.cell(column, row + 1)?,
        ];
        Some(Self {
            positions: corners.map(|c| c.centroid()),
            values: corners.map(|c| c.value),
        })
    }

    /// Linear crossing of `level` along one side
    fn crossing(&self, side: Side, level: f64) -> DVec2 {
        let (i, j) = side.corners();
        let (vi, vj) = (self.values[i], self.values[j]);
        let t = if vi == vj {
            0.5
        } else {
            ((level - vi) / (vj - vi)).clamp(0.0, 1.0)
        };
        self.positions[i].lerp(self.positions[j], t)
    }

    /// Side pairs the isoline joins inside this square
    fn side_pairs(&self, level: f64) -> Vec<(Side, Side)> {
        use Side::*;

        let above = self.values.map(|v| v >= level);
        let case = above
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &up)| if up { acc | (1 << i) } else { acc });

        match case {
            0 | 15 => vec![],
            1 | 14 => vec![(Left, Bottom)],
            2 | 13 => vec![(Bottom, Right)],
            3 | 12 => vec![(Left, Right)],
            4 | 11 => vec![(Right, Top)],
            6 | 9 => vec![(Bottom, Top)],
            7 | 8 => vec![(Left, Top)],
            5 | 10 => {
                // Saddle: the centre value decides which diagonal pair connects
                let centre = self.values.iter().sum::<f64>() / 4.0;
                let centre_above = centre >= level;
                // bl and tr high (5) with a high centre isolates br and tl
                if (case == 5) == centre_above {
                    vec![(Bottom, Right), (Top, Left)]
                } else {
                    vec![(Left, Bottom), (Right, Top)]
                }
            }
            _ => vec![],
        }
    }
}

fn isolines_at(grid: &Grid, level: f64) -> Vec<ContourLine> {
    let mut graph = SegmentGraph::new();
    for column in 0..grid.columns - 1 {
        for row in 0..grid.rows - 1 {
            let square = match LatticeSquare::at(grid, column, row) {
                Some(square) if square.values.iter().all(|v| v.is_finite()) => square,
                _ => continue,
            };
            for (from, to) in square.side_pairs(level) {
                graph.add_segment(square.crossing(from, level), square.crossing(to, level));
            }
        }
    }

    let lines: Vec<ContourLine> = graph
        .into_polylines(CyclePolicy::Close)
        .into_iter()
        .map(|points| ContourLine::new(level, points))
        .collect();
    log::trace!("level {}: {} grid isolines", level, lines.len());
    lines
}

/// Isolines of an interpolated grid at `count` equally spaced breaks
///
/// Cell centroids form the lattice; crossings are interpolated linearly
/// along lattice sides and ambiguous saddle squares are resolved by the mean
/// of their four corners. Closed rings are emitted with their first position
/// repeated at the end. Grids narrower than two cells in either direction
/// have no lattice squares and give no lines.
///
/// # Example
///
/// ```
/// use elevation_surface::*;
///
/// let points = PointSet::from_xyz(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0), (0.0, 10.0, 0.0)]);
/// let density = GridDensity::square(1.0).unwrap();
/// let grid = interpolate_grid(&points, density, &InverseDistance::default(), "z").unwrap();
///
/// let lines = contours_from_grid(&grid, 3);
/// assert!(!lines.is_empty());
/// assert!(lines.iter().all(|line| line.points.len() >= 2));
/// ```
pub fn contours_from_grid(grid: &Grid, count: usize) -> Vec<ContourLine> {
    if grid.columns < 2 || grid.rows < 2 {
        return Vec::new();
    }
    let values: Vec<f64> = grid.cells.iter().map(|c| c.value).collect();
    let breaks = equal_interval_breaks(&values, count);

    let start = Instant::now();
    let lines: Vec<ContourLine> = breaks
        .iter()
        .flat_map(|&level| isolines_at(grid, level))
        .collect();

    log::debug!(
        "traced {} grid isolines at {} breaks in {:.2?}",
        lines.len(),
        breaks.len(),
        start.elapsed()
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::GridCell;

    /// Unit grid whose cell values come from `f(column, row)`
    fn grid_from(columns: usize, rows: usize, f: impl Fn(usize, usize) -> f64) -> Grid {
        let size = DVec2::ONE;
        let mut cells = Vec::new();
        for column in 0..columns {
            for row in 0..rows {
                cells.push(GridCell {
                    min: DVec2::new(column as f64, row as f64),
                    size,
                    value: f(column, row),
                });
            }
        }
        Grid {
            origin: DVec2::ZERO,
            cell_size: size,
            columns,
            rows,
            cells,
        }
    }

    #[test]
    fn test_linear_ramp_gives_straight_lines() {
        // Value equals the column index, so isolines are vertical
        let grid = grid_from(5, 4, |column, _| column as f64);
        let lines = contours_from_grid(&grid, 3);

        // Breaks at 1, 2, 3
        assert_eq!(lines.len(), 3);
        for line in &lines {
            let expected_x = line.level + 0.5;
            assert!(line.points.iter().all(|p| (p.x - expected_x).abs() < 1e-9));
            assert_eq!(line.points.len(), 4);
            assert!(!line.is_closed());
        }
    }

    #[test]
    fn test_peak_gives_closed_ring() {
        let grid = grid_from(5, 5, |c, r| if (c, r) == (2, 2) { 10.0 } else { 0.0 });
        let lines = contours_from_grid(&grid, 1);

        assert_eq!(lines.len(), 1);
        let ring = &lines[0];
        assert_eq!(ring.level, 5.0);
        assert!(ring.is_closed());
        // Four crossings around the peak plus the repeated start
        assert_eq!(ring.points.len(), 5);
        let centre = DVec2::new(2.5, 2.5);
        for p in &ring.points {
            assert!((p.distance(centre) - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_saddle_uses_centre_mean() {
        // Checkerboard 2x2: bl and tr high
        let high_centre = grid_from(2, 2, |c, r| if c == r { 10.0 } else { 4.0 });
        let square = LatticeSquare::at(&high_centre, 0, 0).unwrap();
        let pairs = square.side_pairs(6.0);
        assert_eq!(pairs.len(), 2);
        assert!(matches!(pairs[0], (Side::Bottom, Side::Right)));

        let low_centre = grid_from(2, 2, |c, r| if c == r { 10.0 } else { 0.0 });
        let square = LatticeSquare::at(&low_centre, 0, 0).unwrap();
        let pairs = square.side_pairs(6.0);
        assert!(matches!(pairs[0], (Side::Left, Side::Bottom)));
    }

    #[test]
    fn test_narrow_or_flat_grid_has_no_lines() {
        assert!(contours_from_grid(&grid_from(1, 6, |_, r| r as f64), 3).is_empty());
        assert!(contours_from_grid(&grid_from(4, 4, |_, _| 2.0), 3).is_empty());
        assert!(contours_from_grid(&Grid::default(), 3).is_empty());
    }

    #[test]
    fn test_non_finite_squares_are_skipped() {
        let grid = grid_from(3, 3, |c, r| if (c, r) == (0, 0) { f64::NAN } else { c as f64 });
        let lines = contours_from_grid(&grid, 1);
        assert!(lines.iter().all(|l| l.points.iter().all(|p| p.is_finite())));
    }
}
