//! Splitting a line network at its intersections
//!
//! The polygonizer needs segments that meet only at their endpoints. Every
//! polyline is broken into segments, each segment is cut wherever another
//! touches it, and the pieces are merged on quantized endpoints.

use std::collections::{HashMap, HashSet};

use glam::DVec2;

use crate::geometry::{quantize, segment_intersections, NodeKey};

/// Segments of a noded network with shared, canonical endpoint positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodedSegments {
    /// Distinct node positions in first-seen order
    pub nodes: Vec<DVec2>,
    /// Node index pairs, each undirected pair at most once
    pub edges: Vec<(usize, usize)>,
}

/// Split every polyline segment at every intersection with any other
///
/// Intersections are found pairwise, which is fine for frame-and-contour
/// networks of a few thousand segments. Pieces that collapse to a single
/// node are dropped.
pub fn node_lines(lines: &[Vec<DVec2>]) -> NodedSegments {
    let segments: Vec<(DVec2, DVec2)> = lines
        .iter()
        .flat_map(|line| line.windows(2).map(|w| (w[0], w[1])))
        .filter(|(a, b)| quantize(*a) != quantize(*b))
        .collect();

    let mut cuts: Vec<Vec<f64>> = vec![vec![0.0, 1.0]; segments.len()];
    for i in 0..segments.len() {
        let (p0, p1) = segments[i];
        for j in (i + 1)..segments.len() {
            let (q0, q1) = segments[j];
            for (t, u) in segment_intersections(p0, p1, q0, q1) {
                cuts[i].push(t);
                cuts[j].push(u);
            }
        }
    }

    let mut noded = NodedSegments::default();
    let mut index: HashMap<NodeKey, usize> = HashMap::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for ((start, end), mut params) in segments.into_iter().zip(cuts) {
        params.sort_by(|a, b| a.total_cmp(b));
        let nodes: Vec<usize> = params
            .iter()
            .map(|&t| node_index(&mut noded.nodes, &mut index, start.lerp(end, t)))
            .collect();
        for pair in nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a == b {
                continue;
            }
            if seen.insert((a.min(b), a.max(b))) {
                noded.edges.push((a, b));
            }
        }
    }
    noded
}

fn node_index(nodes: &mut Vec<DVec2>, index: &mut HashMap<NodeKey, usize>, at: DVec2) -> usize {
    *index.entry(quantize(at)).or_insert_with(|| {
        nodes.push(at);
        nodes.len() - 1
    })
}
