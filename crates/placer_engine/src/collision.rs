//! Post-simulation overlap removal.
//!
//! Repeated passes over every node pair push overlapping boxes apart along
//! their axis of least penetration until a pass finds nothing to fix or the
//! pass limit is reached. Moves are applied immediately, so later pairs in
//! the same pass see earlier corrections.

use crate::graph::PlacementGraph;
use placer_common::{overlap_depth, NodeId, Point, Vec2};

/// Outcome of collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    /// Passes executed, including the final clean pass if one was reached.
    pub passes: usize,
    /// Individual pair corrections applied.
    pub moves: usize,
    /// Whether the last pass found no overlapping pair.
    pub resolved: bool,
}

/// Separates overlapping components by at least `spacing`.
///
/// Locked nodes never move; a pair of locked nodes is left as is. When both
/// nodes are free each takes half of the separation, and whatever one side
/// could not absorb against the board edge is pushed onto the other.
pub fn resolve_collisions(
    graph: &mut PlacementGraph,
    spacing: f64,
    max_passes: usize,
) -> CollisionReport {
    let n = graph.node_count();
    let mut report = CollisionReport {
        passes: 0,
        moves: 0,
        resolved: n < 2,
    };
    if n < 2 {
        return report;
    }

    while report.passes < max_passes {
        report.passes += 1;
        let mut moved = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                if separate(graph, NodeId::from_index(i), NodeId::from_index(j), spacing) {
                    moved += 1;
                }
            }
        }
        report.moves += moved;
        if moved == 0 {
            report.resolved = true;
            break;
        }
    }
    report
}

/// Pushes `a` and `b` apart if they overlap. Returns whether anything was
/// attempted.
fn separate(graph: &mut PlacementGraph, a: NodeId, b: NodeId, spacing: f64) -> bool {
    let (na, nb) = (graph.node(a), graph.node(b));
    if na.locked && nb.locked {
        return false;
    }
    let Some(mtv) = overlap_depth(&na.bounds(), &nb.bounds(), spacing) else {
        return false;
    };

    match (na.locked, nb.locked) {
        (false, false) => {
            let moved = shift(graph, a, mtv * 0.5);
            shift(graph, b, -(mtv - moved));
        }
        (true, false) => {
            shift(graph, b, -mtv);
        }
        (false, true) => {
            shift(graph, a, mtv);
        }
        (true, true) => {}
    }
    true
}

/// Moves `id` by `delta` (clamped to the interior) and returns the actual
/// displacement.
fn shift(graph: &mut PlacementGraph, id: NodeId, delta: Vec2) -> Vec2 {
    let before: Point = graph.node(id).position;
    graph.move_node(id, before + delta);
    graph.node(id).position - before
}
