//! Polygonization of a noded line network
//!
//! Builds a planar graph over the noded segments, strips dangling and cut
//! edges, then traces the minimal rings around every face. Counter-clockwise
//! rings bound faces and become polygon shells; clockwise rings are the
//! outer boundaries of connected components and become holes of the
//! smallest shell that encloses them, if any.

use std::f64::consts::PI;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::noding::NodedSegments;
use crate::geometry::{point_in_ring, quantize, signed_area};
use crate::point::BoundingBox;

/// A face of the network: one shell and any holes, all rings closed
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Counter-clockwise outer ring
    pub exterior: Vec<DVec2>,
    /// Clockwise inner rings
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon {
    /// Enclosed area, holes subtracted
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        signed_area(&self.exterior).abs() - holes
    }
}

/// Directed edges `2e` (a to b) and `2e + 1` (b to a) for undirected edge `e`
struct PlanarGraph {
    nodes: Vec<DVec2>,
    edges: Vec<(usize, usize)>,
    alive: Vec<bool>,
}

impl PlanarGraph {
    fn new(noded: &NodedSegments) -> Self {
        Self {
            nodes: noded.nodes.clone(),
            edges: noded.edges.clone(),
            alive: vec![true; noded.edges.len()],
        }
    }

    #[inline]
    fn origin(&self, directed: usize) -> usize {
        let (a, b) = self.edges[directed / 2];
        if directed % 2 == 0 {
            a
        } else {
            b
        }
    }

    #[inline]
    fn destination(&self, directed: usize) -> usize {
        self.origin(directed ^ 1)
    }

    fn degrees(&self) -> Vec<usize> {
        let mut degree = vec![0; self.nodes.len()];
        for (e, &(a, b)) in self.edges.iter().enumerate() {
            if self.alive[e] {
                degree[a] += 1;
                degree[b] += 1;
            }
        }
        degree
    }

    /// Repeatedly delete edges ending at a node of degree one
    fn remove_dangles(&mut self) -> usize {
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (e, &(a, b)) in self.edges.iter().enumerate() {
            incident[a].push(e);
            incident[b].push(e);
        }
        let mut degree = self.degrees();
        let mut removed = 0;
        let mut stack: Vec<usize> = (0..self.nodes.len()).filter(|&n| degree[n] == 1).collect();
        while let Some(node) = stack.pop() {
            if degree[node] != 1 {
                continue;
            }
            let Some(&e) = incident[node].iter().find(|&&e| self.alive[e]) else {
                continue;
            };
            self.alive[e] = false;
            removed += 1;
            let (a, b) = self.edges[e];
            let other = if a == node { b } else { a };
            degree[node] -= 1;
            degree[other] -= 1;
            if degree[other] == 1 {
                stack.push(other);
            }
        }
        removed
    }

    /// Outgoing live directed edges per node, sorted counter-clockwise by
    /// angle
    fn outgoing_sorted(&self) -> Vec<Vec<usize>> {
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (e, alive) in self.alive.iter().enumerate() {
            if *alive {
                outgoing[self.edges[e].0].push(2 * e);
                outgoing[self.edges[e].1].push(2 * e + 1);
            }
        }
        for list in &mut outgoing {
            list.sort_by(|&x, &y| self.angle(x).total_cmp(&self.angle(y)));
        }
        outgoing
    }

    fn angle(&self, directed: usize) -> f64 {
        let d = self.nodes[self.destination(directed)] - self.nodes[self.origin(directed)];
        let angle = d.y.atan2(d.x);
        // -pi shows up for a negative-zero y; fold it onto pi
        if angle <= -PI {
            PI
        } else {
            angle
        }
    }

    /// Trace every ring, each as its directed edges in walk order
    ///
    /// Arriving at a node along `u -> v`, the walk leaves on the edge just
    /// clockwise of `v -> u`, which keeps the face on the left.
    fn rings(&self) -> Vec<Vec<usize>> {
        let outgoing = self.outgoing_sorted();
        let mut position = vec![usize::MAX; self.edges.len() * 2];
        for list in &outgoing {
            for (i, &d) in list.iter().enumerate() {
                position[d] = i;
            }
        }
        let next = |d: usize| -> usize {
            let v = self.destination(d);
            let list = &outgoing[v];
            let back = position[d ^ 1];
            list[(back + list.len() - 1) % list.len()]
        };

        let mut visited = vec![false; self.edges.len() * 2];
        let mut rings = Vec::new();
        for start in 0..self.edges.len() * 2 {
            if !self.alive[start / 2] || visited[start] {
                continue;
            }
            let mut ring = Vec::new();
            let mut d = start;
            while !visited[d] {
                visited[d] = true;
                ring.push(d);
                d = next(d);
            }
            rings.push(ring);
        }
        rings
    }

    /// Mark edges walked in both directions by one ring as dead
    fn remove_cut_edges(&mut self, rings: &[Vec<usize>]) -> usize {
        let mut ring_of = vec![usize::MAX; self.edges.len() * 2];
        for (r, ring) in rings.iter().enumerate() {
            for &d in ring {
                ring_of[d] = r;
            }
        }
        let mut removed = 0;
        for e in 0..self.edges.len() {
            if self.alive[e] && ring_of[2 * e] == ring_of[2 * e + 1] {
                self.alive[e] = false;
                removed += 1;
            }
        }
        removed
    }

    fn ring_positions(&self, ring: &[usize]) -> Vec<DVec2> {
        let mut positions: Vec<DVec2> =
            ring.iter().map(|&d| self.nodes[self.origin(d)]).collect();
        if let Some(&first) = positions.first() {
            positions.push(first);
        }
        positions
    }
}

/// Find the smallest shell strictly enclosing `hole`
fn enclosing_shell(hole: &[DVec2], shells: &[Vec<DVec2>]) -> Option<usize> {
    let hole_box = BoundingBox::from_positions(hole.iter().copied())?;
    let mut best: Option<(usize, f64)> = None;
    for (i, shell) in shells.iter().enumerate() {
        let shell_box = match BoundingBox::from_positions(shell.iter().copied()) {
            Some(b) => b,
            None => continue,
        };
        let covers = shell_box.min.cmple(hole_box.min).all()
            && shell_box.max.cmpge(hole_box.max).all();
        if !covers || shell_box == hole_box {
            continue;
        }
        let off_shell = hole
            .iter()
            .find(|p| !shell.iter().any(|s| quantize(*s) == quantize(**p)));
        let inside = match off_shell {
            Some(&p) => point_in_ring(p, shell),
            None => false,
        };
        if inside && best.map_or(true, |(_, area)| shell_box.area() < area) {
            best = Some((i, shell_box.area()));
        }
    }
    best.map(|(i, _)| i)
}

/// Partition a noded network into polygons
///
/// Dangling edges and cut edges never bound a face and are discarded.
/// Polygons come out in the order their shells are first traced, which only
/// depends on the order of `noded`.
pub fn polygonize(noded: &NodedSegments) -> Vec<Polygon> {
    let mut graph = PlanarGraph::new(noded);
    let mut rings;
    loop {
        let dangles = graph.remove_dangles();
        rings = graph.rings();
        let cuts = graph.remove_cut_edges(&rings);
        log::trace!("removed {} dangling and {} cut edges", dangles, cuts);
        if cuts == 0 {
            break;
        }
    }

    let mut shells = Vec::new();
    let mut holes = Vec::new();
    for ring in &rings {
        let positions = graph.ring_positions(ring);
        let area = signed_area(&positions);
        if area > 0.0 {
            shells.push(positions);
        } else if area < 0.0 {
            holes.push(positions);
        }
    }

    let mut polygons: Vec<Polygon> = shells
        .iter()
        .map(|shell| Polygon {
            exterior: shell.clone(),
            holes: Vec::new(),
        })
        .collect();
    for hole in holes {
        if let Some(i) = enclosing_shell(&hole, &shells) {
            polygons[i].holes.push(hole);
        }
    }
    polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::noding::node_lines;

    fn square(min: DVec2, size: f64) -> Vec<DVec2> {
        vec![
            min,
            min + DVec2::new(size, 0.0),
            min + DVec2::new(size, size),
            min + DVec2::new(0.0, size),
            min,
        ]
    }

    #[test]
    fn test_single_square() {
        let polygons = polygonize(&node_lines(&[square(DVec2::ZERO, 2.0)]));
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].area(), 4.0);
        assert!(signed_area(&polygons[0].exterior) > 0.0);
        assert_eq!(polygons[0].exterior.first(), polygons[0].exterior.last());
    }

    #[test]
    fn test_crossed_square_gives_four_triangles() {
        let lines = vec![
            square(DVec2::ZERO, 2.0),
            vec![DVec2::new(0.0, 0.0), DVec2::new(2.0, 2.0)],
            vec![DVec2::new(0.0, 2.0), DVec2::new(2.0, 0.0)],
        ];
        let polygons = polygonize(&node_lines(&lines));
        assert_eq!(polygons.len(), 4);
        for polygon in &polygons {
            assert!((polygon.area() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dangles_are_ignored() {
        let lines = vec![
            square(DVec2::ZERO, 2.0),
            vec![DVec2::new(2.0, 1.0), DVec2::new(5.0, 1.0), DVec2::new(5.0, 3.0)],
            vec![DVec2::new(1.0, 1.0), DVec2::new(1.5, 1.5)],
        ];
        let polygons = polygonize(&node_lines(&lines));
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].area(), 4.0);
    }

    #[test]
    fn test_cut_edge_between_two_squares() {
        let lines = vec![
            square(DVec2::ZERO, 1.0),
            square(DVec2::new(3.0, 0.0), 1.0),
            vec![DVec2::new(1.0, 0.5), DVec2::new(3.0, 0.5)],
        ];
        let polygons = polygonize(&node_lines(&lines));
        assert_eq!(polygons.len(), 2);
        assert!(polygons.iter().all(|p| (p.area() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_island_becomes_hole() {
        let lines = vec![square(DVec2::ZERO, 10.0), square(DVec2::new(4.0, 4.0), 2.0)];
        let polygons = polygonize(&node_lines(&lines));
        assert_eq!(polygons.len(), 2);

        let outer = polygons
            .iter()
            .find(|p| p.holes.len() == 1)
            .expect("outer square keeps the island as a hole");
        assert!((outer.area() - 96.0).abs() < 1e-12);
        assert!(polygons.iter().any(|p| p.holes.is_empty() && p.area() == 4.0));
    }

    #[test]
    fn test_empty_network() {
        assert!(polygonize(&NodedSegments::default()).is_empty());
    }
}
