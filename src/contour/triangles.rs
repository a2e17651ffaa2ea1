//! Isolines across the triangles of a TIN

use std::time::Instant;

use glam::DVec2;

use super::stitch::{CyclePolicy, SegmentGraph};
use super::{equal_interval_breaks, ContourLine};
use crate::geometry::quantize;
use crate::tin::Triangle;

/// Positions where `level` meets the triangle's edges, with the raw hit count
///
/// An edge whose corner values bracket the level (inclusively) yields its
/// interpolated crossing, or both corners when the edge lies flat at the
/// level. Hits on a shared corner are merged.
fn edge_crossings(triangle: &Triangle, level: f64) -> (Vec<DVec2>, usize) {
    let mut hits = Vec::with_capacity(4);
    let mut raw = 0;
    for (p, q) in triangle.edges() {
        let (lo, hi) = (p.value.min(q.value), p.value.max(q.value));
        if level < lo || level > hi {
            continue;
        }
        raw += 1;
        if p.value == q.value {
            hits.push(p.position);
            hits.push(q.position);
        } else {
            let t = (level - p.value) / (q.value - p.value);
            hits.push(p.position.lerp(q.position, t));
        }
    }

    let mut distinct: Vec<DVec2> = Vec::with_capacity(hits.len());
    for hit in hits {
        if !distinct.iter().any(|d| quantize(*d) == quantize(hit)) {
            distinct.push(hit);
        }
    }
    (distinct, raw)
}

fn isolines_at(triangles: &[Triangle], level: f64) -> Vec<ContourLine> {
    let mut graph = SegmentGraph::new();
    let mut segments = 0;
    for triangle in triangles {
        if !triangle.values().iter().all(|v| v.is_finite()) {
            continue;
        }
        let (crossings, raw) = edge_crossings(triangle, level);
        debug_assert_ne!(raw, 1, "level {} crosses a single edge of {:?}", level, triangle);
        match crossings.as_slice() {
            [a, b] => {
                graph.add_segment(*a, *b);
                segments += 1;
            }
            // Untouched, or touching only at a corner
            [] | [_] if raw != 1 => {}
            [_] => log::warn!("level {} crosses a single edge of {:?}", level, triangle),
            // Flat triangle lying at the level
            _ => log::trace!("skipping flat triangle at level {}", level),
        }
    }

    let lines: Vec<ContourLine> = graph
        .into_polylines(CyclePolicy::Drop)
        .into_iter()
        .map(|points| ContourLine::new(level, points))
        .collect();
    log::trace!(
        "level {}: {} segments joined into {} lines",
        level,
        segments,
        lines.len()
    );
    lines
}

/// Isolines of a TIN at `count` equally spaced breaks
///
/// Breaks span the triangles' corner values. Each triangle the level passes
/// through contributes one straight segment; segments are then joined on
/// shared endpoints. Rings that close on themselves without any free end are
/// not emitted.
///
/// # Example
///
/// ```
/// use elevation_surface::*;
///
/// let points = PointSet::from_xyz(&[
///     (0.0, 0.0, 0.0),
///     (10.0, 0.0, 10.0),
///     (0.0, 10.0, 0.0),
///     (10.0, 10.0, 10.0),
/// ]);
/// let triangles = triangulate(&points, "z");
/// let lines = contours_from_tin(&triangles, 1);
///
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].level, 5.0);
/// assert!(lines[0].points.iter().all(|p| (p.x - 5.0).abs() < 1e-9));
/// ```
pub fn contours_from_tin(triangles: &[Triangle], count: usize) -> Vec<ContourLine> {
    let values: Vec<f64> = triangles.iter().flat_map(|t| t.values()).collect();
    let breaks = equal_interval_breaks(&values, count);

    let start = Instant::now();
    let lines: Vec<ContourLine> = breaks
        .iter()
        .flat_map(|&level| isolines_at(triangles, level))
        .collect();

    log::debug!(
        "traced {} TIN isolines at {} breaks over {} triangles in {:.2?}",
        lines.len(),
        breaks.len(),
        triangles.len(),
        start.elapsed()
    );
    lines
}
