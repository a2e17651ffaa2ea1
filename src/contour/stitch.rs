//! Joining raw two-point segments into polylines
//!
//! Segment endpoints are merged on their quantized position, so crossings
//! computed independently in neighbouring cells or triangles meet at one node.

use std::collections::HashMap;

use glam::DVec2;

use crate::geometry::{quantize, NodeKey};

/// What to do with components that have no open end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Leave pure cycles unemitted; only chains with a free end are walked
    #[default]
    Drop,
    /// Walk pure cycles too, emitting them as closed rings
    Close,
}

/// Undirected graph over quantized segment endpoints
///
/// Neighbour lists keep insertion order and never hold the same node twice,
/// so a segment contributed by two adjacent triangles appears once.
#[derive(Debug, Clone, Default)]
pub struct SegmentGraph {
    /// Node keys in first-seen order
    order: Vec<NodeKey>,
    /// First position seen for each key
    positions: HashMap<NodeKey, DVec2>,
    adjacency: HashMap<NodeKey, Vec<NodeKey>>,
}

impl SegmentGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the segment `a`-`b`; segments collapsing to one node are ignored
    pub fn add_segment(&mut self, a: DVec2, b: DVec2) {
        let (ka, kb) = (quantize(a), quantize(b));
        if ka == kb {
            return;
        }
        self.add_node(ka, a);
        self.add_node(kb, b);
        link(&mut self.adjacency, ka, kb);
        link(&mut self.adjacency, kb, ka);
    }

    fn add_node(&mut self, key: NodeKey, position: DVec2) {
        if !self.positions.contains_key(&key) {
            self.positions.insert(key, position);
            self.order.push(key);
            self.adjacency.insert(key, Vec::new());
        }
    }

    /// Number of distinct nodes added so far
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Number of edges still in the graph
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    fn degree(&self, key: NodeKey) -> usize {
        self.adjacency.get(&key).map_or(0, Vec::len)
    }

    fn remove_edge(&mut self, a: NodeKey, b: NodeKey) {
        if let Some(neighbours) = self.adjacency.get_mut(&a) {
            neighbours.retain(|&n| n != b);
        }
        if let Some(neighbours) = self.adjacency.get_mut(&b) {
            neighbours.retain(|&n| n != a);
        }
    }

    /// Follow first neighbours from `start`, consuming edges, until stuck
    fn walk(&mut self, start: NodeKey) -> Vec<DVec2> {
        let mut path = vec![self.positions[&start]];
        let mut current = start;
        while let Some(&next) = self.adjacency.get(&current).and_then(|n| n.first()) {
            self.remove_edge(current, next);
            path.push(self.positions[&next]);
            current = next;
        }
        path
    }

    /// Consume the graph into polylines
    ///
    /// Walks start at nodes with exactly one remaining neighbour, in the
    /// order nodes were first seen, until no such node is left. With
    /// [`CyclePolicy::Close`] the remaining edges are then walked as rings
    /// whose last position repeats the first. Walks shorter than two
    /// positions are not emitted.
    pub fn into_polylines(mut self, policy: CyclePolicy) -> Vec<Vec<DVec2>> {
        let order = std::mem::take(&mut self.order);
        let mut polylines = Vec::new();

        loop {
            let mut walked = false;
            for &key in &order {
                while self.degree(key) == 1 {
                    let path = self.walk(key);
                    if path.len() >= 2 {
                        polylines.push(path);
                    }
                    walked = true;
                }
            }
            if !walked {
                break;
            }
        }

        if policy == CyclePolicy::Close {
            for &key in &order {
                while self.degree(key) > 0 {
                    let path = self.walk(key);
                    if path.len() >= 2 {
                        polylines.push(path);
                    }
                }
            }
        }
        polylines
    }
}

fn link(adjacency: &mut HashMap<NodeKey, Vec<NodeKey>>, from: NodeKey, to: NodeKey) {
    let neighbours = adjacency.entry(from).or_default();
    if !neighbours.contains(&to) {
        neighbours.push(to);
    }
}
