//! Incremental Delaunay triangulation
//!
//! A sweep along x inserts one sample at a time into a triangulation seeded
//! with a synthetic bounding triangle. Triangles live in an arena and are
//! referenced by index; each slot is active (may still change), finalized (no
//! later sample can reach its circumcircle) or discarded (replaced by the
//! re-triangulated cavity of a later insertion).

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use glam::DVec2;

use super::circumcircle::Circumcircle;
use super::{Corner, Triangle};
use crate::point::PointSet;

/// Bounding triangle size as a multiple of the samples' largest extent
const SUPER_TRIANGLE_SCALE: f64 = 20.0;

/// Where a vertex of the working triangulation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexOrigin {
    /// Index into the input point set
    Sample(usize),
    /// Corner of the synthetic bounding triangle
    Sentinel,
}

#[derive(Debug, Clone, Copy)]
struct Vertex {
    position: DVec2,
    origin: VertexOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriangleState {
    Active,
    Finalized,
    Discarded,
}

#[derive(Debug, Clone, Copy)]
struct TriangleSlot {
    vertices: [usize; 3],
    circle: Circumcircle,
    state: TriangleState,
}

/// Working state of one triangulation run
struct TriangleArena {
    vertices: Vec<Vertex>,
    slots: Vec<TriangleSlot>,
    /// Active slot indices, in creation order
    active: Vec<usize>,
    /// Finalized slot indices, in the order they were closed
    finalized: Vec<usize>,
}

impl TriangleArena {
    fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            slots: Vec::new(),
            active: Vec::new(),
            finalized: Vec::new(),
        }
    }

    fn add_triangle(&mut self, a: usize, b: usize, c: usize) {
        let circle = Circumcircle::new(
            self.vertices[a].position,
            self.vertices[b].position,
            self.vertices[c].position,
        );
        self.active.push(self.slots.len());
        self.slots.push(TriangleSlot {
            vertices: [a, b, c],
            circle,
            state: TriangleState::Active,
        });
    }

    /// Insert one vertex, re-triangulating the cavity of every active
    /// triangle whose circumcircle contains it
    fn insert(&mut self, vertex: usize) {
        let position = self.vertices[vertex].position;
        let mut cavity_edges: Vec<(usize, usize)> = Vec::new();
        let mut still_active = Vec::with_capacity(self.active.len());

        for &id in self.active.iter().rev() {
            let slot = &mut self.slots[id];
            if slot.circle.is_left_of(position) {
                slot.state = TriangleState::Finalized;
                self.finalized.push(id);
                continue;
            }
            if !slot.circle.contains(position) {
                still_active.push(id);
                continue;
            }
            let [a, b, c] = slot.vertices;
            cavity_edges.extend([(a, b), (b, c), (c, a)]);
            slot.state = TriangleState::Discarded;
        }
        still_active.reverse();
        self.active = still_active;

        for (a, b) in boundary_edges(cavity_edges).into_iter().rev() {
            self.add_triangle(a, b, vertex);
        }
    }

    fn sample_index(&self, vertex: usize) -> Option<usize> {
        match self.vertices[vertex].origin {
            VertexOrigin::Sample(i) => Some(i),
            VertexOrigin::Sentinel => None,
        }
    }

    /// Finalized then still-active triangles as input sample indices,
    /// without any that touch the bounding triangle
    fn into_sample_triangles(self) -> Vec<[usize; 3]> {
        self.finalized
            .iter()
            .chain(self.active.iter())
            .map(|&id| &self.slots[id])
            .filter(|slot| slot.state != TriangleState::Discarded)
            .filter_map(|slot| {
                let [a, b, c] = slot.vertices;
                Some([
                    self.sample_index(a)?,
                    self.sample_index(b)?,
                    self.sample_index(c)?,
                ])
            })
            .collect()
    }
}

/// Drop every edge shared by two invalidated triangles
///
/// What remains is the boundary of the star-shaped cavity, in pool order.
fn boundary_edges(edges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let key = |&(a, b): &(usize, usize)| if a < b { (a, b) } else { (b, a) };
    let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
    for edge in &edges {
        *counts.entry(key(edge)).or_insert(0) += 1;
    }
    edges
        .into_iter()
        .filter(|edge| counts[&key(edge)] == 1)
        .collect()
}

/// Sample indices with exact duplicate positions removed (first one wins)
fn distinct_samples(points: &PointSet) -> Vec<usize> {
    let mut seen = HashSet::new();
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| seen.insert((p.position.x.to_bits(), p.position.y.to_bits())))
        .map(|(i, _)| i)
        .collect()
}

/// Delaunay triangulation of the samples
///
/// Returns an empty collection for fewer than three distinct positions.
/// Samples are swept in increasing x (ties keep the reverse of their input
/// order), so repeated runs on the same set yield the same triangles in the
/// same order. Each triangle carries its corners' `property` values.
///
/// # Example
///
/// ```
/// use elevation_surface::{triangulate, PointSet};
///
/// let points = PointSet::from_xyz(&[(0.0, 0.0, 10.0), (10.0, 0.0, 20.0), (0.0, 10.0, 30.0)]);
/// let triangles = triangulate(&points, "z");
///
/// assert_eq!(triangles.len(), 1);
/// let mut values = triangles[0].values();
/// values.sort_by(|a, b| a.partial_cmp(b).unwrap());
/// assert_eq!(values, [10.0, 20.0, 30.0]);
/// ```
pub fn triangulate(points: &PointSet, property: &str) -> Vec<Triangle> {
    let samples = distinct_samples(points);
    if samples.len() < 3 {
        return Vec::new();
    }
    if samples.len() < points.len() {
        log::debug!(
            "ignoring {} samples with duplicate positions",
            points.len() - samples.len()
        );
    }

    let start = Instant::now();
    let sample_points = points.points();

    // Descending x, stable; walking it backwards sweeps left to right.
    let mut order = samples;
    order.sort_by(|&i, &j| {
        sample_points[j]
            .position
            .x
            .total_cmp(&sample_points[i].position.x)
    });

    let mut vertices: Vec<Vertex> = order
        .iter()
        .map(|&i| Vertex {
            position: sample_points[i].position,
            origin: VertexOrigin::Sample(i),
        })
        .collect();

    let x_min = vertices[vertices.len() - 1].position.x;
    let x_max = vertices[0].position.x;
    let (y_min, y_max) = vertices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.position.y), hi.max(v.position.y))
        });
    let extent = (x_max - x_min).max(y_max - y_min);
    if extent <= 0.0 {
        return Vec::new();
    }
    let mid = DVec2::new((x_min + x_max) * 0.5, (y_min + y_max) * 0.5);

    let sample_count = vertices.len();
    let reach = SUPER_TRIANGLE_SCALE * extent;
    for corner in [
        DVec2::new(mid.x - reach, mid.y - extent),
        DVec2::new(mid.x, mid.y + reach),
        DVec2::new(mid.x + reach, mid.y - extent),
    ] {
        vertices.push(Vertex {
            position: corner,
            origin: VertexOrigin::Sentinel,
        });
    }

    let mut arena = TriangleArena::new(vertices);
    arena.add_triangle(sample_count, sample_count + 1, sample_count + 2);
    for vertex in (0..sample_count).rev() {
        arena.insert(vertex);
    }

    let corner = |i: usize| Corner {
        position: sample_points[i].position,
        value: sample_points[i].value(property),
    };
    let triangles: Vec<Triangle> = arena
        .into_sample_triangles()
        .into_iter()
        .map(|[a, b, c]| Triangle {
            a: corner(a),
            b: corner(b),
            c: corner(c),
        })
        .collect();

    log::debug!(
        "triangulated {} samples into {} triangles in {:.2?}",
        sample_count,
        triangles.len(),
        start.elapsed()
    );
    triangles
}
