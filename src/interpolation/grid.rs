//! Regular grid of interpolated cells
//!
//! Tiles the bounding box of the samples with cells of the configured
//! density and values each cell at its centroid.

use std::time::Instant;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Interpolator;
use crate::config::GridDensity;
use crate::error::{Result, SurfaceError};
use crate::point::PointSet;

/// Largest number of cells a single grid may hold
pub const MAX_GRID_CELLS: usize = 1 << 26;

/// One rectangular grid cell with its interpolated value
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Lower-left corner
    pub min: DVec2,
    /// Width and height (the grid density)
    pub size: DVec2,
    /// Value interpolated at the centroid
    pub value: f64,
}

impl GridCell {
    /// Upper-right corner
    #[inline]
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    /// Centre of the cell, where the value was interpolated
    #[inline]
    pub fn centroid(&self) -> DVec2 {
        self.min + self.size * 0.5
    }

    /// Closed counter-clockwise outline, ready to render as a filled polygon
    pub fn ring(&self) -> [DVec2; 5] {
        let max = self.max();
        [
            self.min,
            DVec2::new(max.x, self.min.y),
            max,
            DVec2::new(self.min.x, max.y),
            self.min,
        ]
    }
}

/// Interpolated grid covering the samples' bounding box
///
/// Cells are stored column-major: all cells of the first column (bottom to
/// top), then the next column, and so on. The last column and row may extend
/// past the bounding box when the density does not divide it evenly.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    /// Lower-left corner of the first cell
    pub origin: DVec2,
    /// Cell width and height
    pub cell_size: DVec2,
    /// Number of cells along x
    pub columns: usize,
    /// Number of cells along y
    pub rows: usize,
    /// All cells, column-major
    pub cells: Vec<GridCell>,
}

impl Grid {
    /// Number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(column, row)`, `None` when out of range
    pub fn cell(&self, column: usize, row: usize) -> Option<&GridCell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(column * self.rows + row)
    }

    /// Interpolated value at `(column, row)`
    pub fn value_at(&self, column: usize, row: usize) -> Option<f64> {
        self.cell(column, row).map(|c| c.value)
    }

    /// Smallest and largest cell value, `None` for an empty grid
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.cells.iter().map(|c| c.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Number of steps of `step` starting at `start` that stay strictly below `end`
///
/// `None` when the count does not fit the cell limit.
fn step_count(start: f64, end: f64, step: f64) -> Option<usize> {
    let estimate = ((end - start) / step).ceil();
    if estimate.is_nan() || estimate <= 0.0 {
        return Some(0);
    }
    if estimate > MAX_GRID_CELLS as f64 {
        return None;
    }
    let below = |count: usize| start + count as f64 * step < end;
    let mut count = estimate as usize;
    // The estimate can be off by one step after rounding
    while count > 0 && !below(count - 1) {
        count -= 1;
    }
    while below(count) {
        count += 1;
    }
    Some(count)
}

fn too_many_cells(density: GridDensity) -> SurfaceError {
    SurfaceError::InvalidConfig(format!(
        "density {} x {} needs more than {} cells",
        density.horizontal, density.vertical, MAX_GRID_CELLS
    ))
}

/// Interpolate a grid over the samples' bounding box
///
/// Starting at the minimum corner, cells are laid out every `density` units
/// while their lower-left corner stays strictly inside the box, so a final
/// partial cell is still emitted and a box of zero width or height yields no
/// cells. Each cell is valued at its centroid against the full sample set.
///
/// An empty sample set yields an empty grid.
///
/// # Errors
///
/// Returns `InvalidConfig` if the density is not strictly positive, or if it
/// would tile the box with more than [`MAX_GRID_CELLS`] cells
///
/// # Example
///
/// ```
/// use elevation_surface::*;
///
/// let points = PointSet::from_xyz(&[(0.0, 0.0, 10.0), (10.0, 0.0, 20.0), (0.0, 10.0, 30.0)]);
/// let density = GridDensity::square(10.0).unwrap();
/// let grid = interpolate_grid(&points, density, &InverseDistance::default(), "z").unwrap();
///
/// assert_eq!(grid.cell_count(), 1);
/// assert_eq!(grid.cells[0].centroid(), DVec2::new(5.0, 5.0));
/// assert!((grid.cells[0].value - 20.0).abs() < 1e-9);
/// ```
pub fn interpolate_grid<I>(
    points: &PointSet,
    density: GridDensity,
    interpolator: &I,
    property: &str,
) -> Result<Grid>
where
    I: Interpolator + ?Sized,
{
    density.validate()?;

    let bbox = match points.bounding_box() {
        Some(bbox) => bbox,
        None => return Ok(Grid::default()),
    };

    let start = Instant::now();
    let cell_size = DVec2::new(density.horizontal, density.vertical);
    let columns = step_count(bbox.min.x, bbox.max.x, cell_size.x);
    let rows = step_count(bbox.min.y, bbox.max.y, cell_size.y);
    let (columns, rows, total) = match (columns, rows) {
        (Some(columns), Some(rows)) => match columns.checked_mul(rows) {
            Some(total) if total <= MAX_GRID_CELLS => (columns, rows, total),
            _ => return Err(too_many_cells(density)),
        },
        _ => return Err(too_many_cells(density)),
    };

    let mut cells = Vec::with_capacity(total);
    for column in 0..columns {
        let x = bbox.min.x + column as f64 * cell_size.x;
        for row in 0..rows {
            let y = bbox.min.y + row as f64 * cell_size.y;
            let min = DVec2::new(x, y);
            let centroid = min + cell_size * 0.5;
            let value = interpolator.interpolate(points, centroid, property);
            if !value.is_finite() {
                log::warn!("non-finite value {} interpolated at {:?}", value, centroid);
            }
            cells.push(GridCell {
                min,
                size: cell_size,
                value,
            });
        }
    }

    log::debug!(
        "interpolated {}x{} grid from {} samples in {:.2?}",
        columns,
        rows,
        points.len(),
        start.elapsed()
    );

    Ok(Grid {
        origin: bbox.min,
        cell_size,
        columns,
        rows,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::{DirectionalSectors, InverseDistance};

    fn corner_points() -> PointSet {
        PointSet::from_xyz(&[(0.0, 0.0, 10.0), (10.0, 0.0, 20.0), (0.0, 10.0, 30.0)])
    }

    #[test]
    fn test_single_cell_scenario() {
        let grid = interpolate_grid(
            &corner_points(),
            GridDensity::square(10.0).unwrap(),
            &InverseDistance::default(),
            "z",
        )
        .unwrap();

        assert_eq!((grid.columns, grid.rows), (1, 1));
        let cell = grid.cells[0];
        assert_eq!(cell.min, DVec2::ZERO);
        assert_eq!(cell.max(), DVec2::new(10.0, 10.0));
        assert!((cell.value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_cells_are_emitted() {
        let density = GridDensity::new(3.0, 4.0).unwrap();
        let grid = interpolate_grid(&corner_points(), density, &InverseDistance::default(), "z")
            .unwrap();

        // x: 0, 3, 6, 9 (< 10); y: 0, 4, 8 (< 10)
        assert_eq!(grid.columns, 4);
        assert_eq!(grid.rows, 3);
        assert_eq!(grid.cell_count(), 12);

        let last = grid.cell(3, 2).unwrap();
        assert_eq!(last.min, DVec2::new(9.0, 8.0));
        assert_eq!(last.max(), DVec2::new(12.0, 12.0));
        assert!(grid.cell(4, 0).is_none());
    }

    #[test]
    fn test_column_major_layout() {
        let density = GridDensity::square(5.0).unwrap();
        let grid = interpolate_grid(&corner_points(), density, &InverseDistance::default(), "z")
            .unwrap();
        assert_eq!(grid.cells[1].min, DVec2::new(0.0, 5.0));
        assert_eq!(grid.cells[2].min, DVec2::new(5.0, 0.0));
        assert_eq!(grid.value_at(1, 0), Some(grid.cells[2].value));
    }

    #[test]
    fn test_empty_points_give_empty_grid() {
        let grid = interpolate_grid(
            &PointSet::default(),
            GridDensity::default(),
            &InverseDistance::default(),
            "z",
        )
        .unwrap();
        assert!(grid.is_empty());
        assert!(grid.value_range().is_none());
    }

    #[test]
    fn test_single_point_gives_no_cells() {
        let points = PointSet::from_xyz(&[(3.0, 3.0, 1.0)]);
        let idw = InverseDistance::default();
        let grid = interpolate_grid(&points, GridDensity::default(), &idw, "z").unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_invalid_density_is_rejected() {
        let density = GridDensity {
            horizontal: 0.0,
            vertical: 1.0,
        };
        let result = interpolate_grid(&corner_points(), density, &InverseDistance::default(), "z");
        assert!(result.is_err());
    }

    #[test]
    fn test_step_count_matches_stepping() {
        for (start, end, step) in [
            (0.0, 10.0, 3.0),
            (0.0, 10.0, 2.5),
            (0.1, 0.7, 0.1),
            (-3.3, 4.4, 1.1),
            (5.0, 5.0, 1.0),
        ] {
            let mut stepped = 0;
            while start + stepped as f64 * step < end {
                stepped += 1;
            }
            assert_eq!(step_count(start, end, step), Some(stepped));
        }
        assert_eq!(step_count(0.0, 1.0e12, 1.0), None);
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let density = GridDensity::square(1.0e-6).unwrap();
        let idw = InverseDistance::default();
        let result = interpolate_grid(&corner_points(), density, &idw, "z");
        assert!(matches!(result, Err(SurfaceError::InvalidConfig(_))));

        // Each axis fits, the product does not
        let density = GridDensity::new(1.0e-3, 1.0e-3).unwrap();
        let result = interpolate_grid(&corner_points(), density, &idw, "z");
        assert!(matches!(result, Err(SurfaceError::InvalidConfig(_))));
    }

    #[test]
    fn test_grid_is_deterministic() {
        let density = GridDensity::new(0.7, 1.3).unwrap();
        let sectors = DirectionalSectors::default();
        let first = interpolate_grid(&corner_points(), density, &sectors, "z").unwrap();
        let second = interpolate_grid(&corner_points(), density, &sectors, "z").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_value_range() {
        let density = GridDensity::square(2.0).unwrap();
        let grid = interpolate_grid(&corner_points(), density, &InverseDistance::default(), "z")
            .unwrap();
        let (lo, hi) = grid.value_range().unwrap();
        assert!(lo >= 10.0 && hi <= 30.0);
        assert!(lo < hi);
    }
}
