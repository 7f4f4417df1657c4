//! Placement quality metrics.
//!
//! Cheap whole-graph measurements taken after a run: connection lengths and
//! counts of remaining constraint violations.

use crate::graph::PlacementGraph;
use placer_common::{distance, overlap_depth};

/// Mean center-to-center length over all edges, or `0.0` with no edges.
pub fn average_connection_length(graph: &PlacementGraph) -> f64 {
    let edges = graph.edges();
    if edges.is_empty() {
        return 0.0;
    }
    let total: f64 = edges
        .iter()
        .map(|e| distance(graph.node(e.a).position, graph.node(e.b).position))
        .sum();
    total / edges.len() as f64
}

/// Sum of edge length times edge weight.
///
/// This is the quantity the attraction term pulls down, so it is the natural
/// figure for comparing two runs over the same problem.
pub fn total_weighted_length(graph: &PlacementGraph) -> f64 {
    graph
        .edges()
        .iter()
        .map(|e| e.weight * distance(graph.node(e.a).position, graph.node(e.b).position))
        .sum()
}

/// Number of components whose box is not inside the usable interior.
pub fn count_boundary_violations(graph: &PlacementGraph) -> usize {
    let interior = graph.interior();
    graph
        .nodes()
        .iter()
        .filter(|n| !interior.contains_rect(&n.bounds()))
        .count()
}

/// Number of pairs closer than `spacing` with at least one unlocked member.
///
/// Overlaps between two locked components are the caller's own layout and
/// are not counted.
pub fn count_overlaps(graph: &PlacementGraph, spacing: f64) -> usize {
    overlapping_pairs(graph, spacing).len()
}

/// Names of every pair counted by [`count_overlaps`], in index order.
pub fn overlapping_pairs(graph: &PlacementGraph, spacing: f64) -> Vec<(&str, &str)> {
    let nodes = graph.nodes();
    let mut pairs = Vec::new();
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            if a.locked && b.locked {
                continue;
            }
            if overlap_depth(&a.bounds(), &b.bounds(), spacing).is_some() {
                pairs.push((a.name.as_str(), b.name.as_str()));
            }
        }
    }
    pairs
}
