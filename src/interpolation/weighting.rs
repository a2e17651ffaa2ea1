//! Scalar weighting schemes for scattered-sample interpolation
//!
//! Both schemes evaluate a single location against the full sample set; there
//! is no neighbourhood pruning.

use std::f64::consts::PI;

use glam::DVec2;

use crate::point::PointSet;

/// Inverse-distance weighted value at `(x, y)`
///
/// Each sample is weighted by `1 / distance^power`. A sample lying exactly on
/// the query location short-circuits to its own value, and an empty set
/// yields 0.
///
/// # Example
///
/// ```
/// use elevation_surface::{inverse_distance_weighting, PointSet};
///
/// let points = PointSet::from_xyz(&[(0.0, 0.0, 10.0), (10.0, 0.0, 20.0), (0.0, 10.0, 30.0)]);
///
/// // Equidistant from all three samples
/// let value = inverse_distance_weighting(&points, 5.0, 5.0, 2.0, "z");
/// assert!((value - 20.0).abs() < 1e-9);
///
/// // Exact hit
/// assert_eq!(inverse_distance_weighting(&points, 10.0, 0.0, 2.0, "z"), 20.0);
/// ```
pub fn inverse_distance_weighting(
    points: &PointSet,
    x: f64,
    y: f64,
    power: f64,
    property: &str,
) -> f64 {
    let at = DVec2::new(x, y);
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for point in points {
        let distance = point.position.distance(at);
        if distance == 0.0 {
            return point.value(property);
        }
        let weight = 1.0 / distance.powf(power);
        numerator += point.value(property) * weight;
        denominator += weight;
    }

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Nearest sample found in one angular sector
#[derive(Debug, Clone, Copy)]
struct Sector {
    distance_sq: f64,
    value: f64,
}

/// Directional (sector) weighted value at `(x, y)`
///
/// The circle around the query location is split into `4 * sector_count`
/// equal sectors and only the nearest sample of each sector is kept. A kept
/// sector's weight is the product of the squared distances of all *other*
/// kept sectors, normalised so the weights sum to 1. Empty sectors are
/// skipped, and so is a sector whose nearest sample sits exactly on the query
/// location (the whole sector drops out, not just that sample). With no
/// usable sector the result is 0.
///
/// # Example
///
/// ```
/// use elevation_surface::{directional_weighted_average, PointSet};
///
/// let points = PointSet::from_xyz(&[(0.0, 0.0, 10.0), (10.0, 0.0, 20.0), (0.0, 10.0, 30.0)]);
/// let value = directional_weighted_average(&points, 5.0, 5.0, 2, "z");
/// assert!((value - 20.0).abs() < 1e-9);
/// ```
pub fn directional_weighted_average(
    points: &PointSet,
    x: f64,
    y: f64,
    sector_count: usize,
    property: &str,
) -> f64 {
    let total_sectors = 4 * sector_count;
    if total_sectors == 0 {
        return 0.0;
    }
    let angle_step = 360.0 / total_sectors as f64;
    let mut sectors: Vec<Option<Sector>> = vec![None; total_sectors];

    for point in points {
        let dx = point.position.x - x;
        let dy = point.position.y - y;
        let distance_sq = dx * dx + dy * dy;
        let angle = (dy.atan2(dx) * (180.0 / PI) + 360.0) % 360.0;
        let index = ((angle / angle_step).floor() as usize).min(total_sectors - 1);

        let closer = sectors[index].map_or(true, |s| distance_sq < s.distance_sq);
        if closer {
            sectors[index] = Some(Sector {
                distance_sq,
                value: point.value(property),
            });
        }
    }

    let valid: Vec<Sector> = sectors
        .into_iter()
        .flatten()
        .filter(|s| s.distance_sq != 0.0)
        .collect();
    if valid.is_empty() {
        return 0.0;
    }

    let weights = sector_weights(&valid);
    let sum: f64 = weights.iter().sum();
    valid
        .iter()
        .zip(&weights)
        .map(|(sector, weight)| weight / sum * sector.value)
        .sum()
}

/// Product of every other sector's squared distance, per sector
///
/// When the full product leaves the f64 range the algebraically identical
/// `1 / distance_sq` form is used instead; only the normalised ratios matter.
fn sector_weights(sectors: &[Sector]) -> Vec<f64> {
    let full_product: f64 = sectors.iter().map(|s| s.distance_sq).product();
    if full_product.is_finite() && full_product > 0.0 {
        sectors.iter().map(|s| full_product / s.distance_sq).collect()
    } else {
        sectors.iter().map(|s| 1.0 / s.distance_sq).collect()
    }
}
