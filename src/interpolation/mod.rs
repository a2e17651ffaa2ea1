//! Grid interpolation over scattered samples
//!
//! Provides the weighting schemes and the grid builder that evaluates one of
//! them at every cell centroid.

mod grid;
mod weighting;

pub use grid::{interpolate_grid, Grid, GridCell, MAX_GRID_CELLS};
pub use weighting::{directional_weighted_average, inverse_distance_weighting};

use glam::DVec2;

use crate::point::PointSet;

/// Trait for evaluating a scalar field at arbitrary locations from samples
pub trait Interpolator {
    /// Interpolate `property` at `at` from every sample in `points`
    fn interpolate(&self, points: &PointSet, at: DVec2, property: &str) -> f64;
}

/// Inverse-distance weighting with a configurable exponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseDistance {
    pub power: f64,
}

impl Default for InverseDistance {
    fn default() -> Self {
        Self { power: 2.0 }
    }
}

impl Interpolator for InverseDistance {
    fn interpolate(&self, points: &PointSet, at: DVec2, property: &str) -> f64 {
        inverse_distance_weighting(points, at.x, at.y, self.power, property)
    }
}

/// Nearest-sample-per-sector weighting
///
/// `sector_count` sectors per quadrant, so `4 * sector_count` in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalSectors {
    pub sector_count: usize,
}

impl Default for DirectionalSectors {
    fn default() -> Self {
        Self { sector_count: 2 }
    }
}

impl Interpolator for DirectionalSectors {
    fn interpolate(&self, points: &PointSet, at: DVec2, property: &str) -> f64 {
        directional_weighted_average(points, at.x, at.y, self.sector_count, property)
    }
}

impl<F> Interpolator for F
where
    F: Fn(&PointSet, DVec2, &str) -> f64,
{
    fn interpolate(&self, points: &PointSet, at: DVec2, property: &str) -> f64 {
        self(points, at, property)
    }
}
