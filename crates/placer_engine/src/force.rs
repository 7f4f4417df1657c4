//! Force model.
//!
//! Every unlocked node feels four terms per iteration:
//!
//! | term       | magnitude                                                  | direction          |
//! |------------|------------------------------------------------------------|--------------------|
//! | repulsion  | `repulsion_constant / max(d, 1)²` for every other node      | away from the node |
//! | attraction | `spring_constant · weight · attraction_multiplier · d`      | toward neighbour   |
//! | grouping   | `grouping_strength · grouping_multiplier · d(centroid)`     | toward centroid    |
//! | boundary   | `boundary_strength · penetration` per offending side        | inward             |
//!
//! Forces are evaluated against the positions at the start of the step and
//! summed in ascending index order, so results do not depend on scheduling.

use crate::graph::PlacementGraph;
use crate::schedule::Phase;
use placer_common::{direction, distance, NodeId, Point, Vec2};
use placer_config::PlacementConfig;

/// Distances below this are clamped in the repulsion denominator.
pub const MIN_REPULSION_DISTANCE: f64 = 1.0;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// The individual force terms acting on one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceBreakdown {
    /// Sum of pairwise repulsion.
    pub repulsion: Vec2,
    /// Sum of edge attraction.
    pub attraction: Vec2,
    /// Pull toward the group centroid.
    pub grouping: Vec2,
    /// Push back inside the board interior.
    pub boundary: Vec2,
}

impl ForceBreakdown {
    /// The net force.
    pub fn total(&self) -> Vec2 {
        self.repulsion + self.attraction + self.grouping + self.boundary
    }
}

/// Evaluates the force model for a fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct ForceCalculator<'a> {
    config: &'a PlacementConfig,
}

impl<'a> ForceCalculator<'a> {
    /// Creates a calculator over `config`'s constants.
    pub fn new(config: &'a PlacementConfig) -> Self {
        Self { config }
    }

    /// Computes all four terms for `id` under `phase`.
    ///
    /// Locked nodes get an all-zero breakdown; they only act as sources.
    pub fn node_forces(&self, graph: &PlacementGraph, id: NodeId, phase: &Phase) -> ForceBreakdown {
        let node = graph.node(id);
        if node.locked {
            return ForceBreakdown::default();
        }
        ForceBreakdown {
            repulsion: self.repulsion(graph, id),
            attraction: self.attraction(graph, id, phase),
            grouping: self.grouping(graph, id, phase),
            boundary: self.boundary(graph, id),
        }
    }

    /// Net force on every node, indexed by node.
    pub fn all_forces(&self, graph: &PlacementGraph, phase: &Phase) -> Vec<Vec2> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..graph.node_count())
                .into_par_iter()
                .map(|i| self.node_forces(graph, NodeId::from_index(i), phase).total())
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..graph.node_count())
                .map(|i| self.node_forces(graph, NodeId::from_index(i), phase).total())
                .collect()
        }
    }

    fn repulsion(&self, graph: &PlacementGraph, id: NodeId) -> Vec2 {
        let p = graph.node(id).position;
        let mut force = Vec2::ZERO;
        for other in graph.nodes() {
            if other.id == id {
                continue;
            }
            let d = distance(other.position, p);
            let dir = if d <= f64::EPSILON {
                coincident_direction(id, other.id)
            } else {
                direction(other.position, p)
            };
            let d_eff = d.max(MIN_REPULSION_DISTANCE);
            force += dir * (self.config.repulsion_constant / (d_eff * d_eff));
        }
        force
    }

    fn attraction(&self, graph: &PlacementGraph, id: NodeId, phase: &Phase) -> Vec2 {
        let p = graph.node(id).position;
        let k = self.config.spring_constant * phase.attraction_multiplier;
        let mut force = Vec2::ZERO;
        for &eid in graph.incident_edges(id) {
            let edge = graph.edge(eid);
            let q = graph.node(edge.other(id)).position;
            // Linear in distance: the offset vector already carries |d|.
            force += (q - p) * (k * edge.weight);
        }
        force
    }

    fn grouping(&self, graph: &PlacementGraph, id: NodeId, phase: &Phase) -> Vec2 {
        if !self.config.enable_grouping {
            return Vec2::ZERO;
        }
        let node = graph.node(id);
        match node.group {
            Some(gid) => {
                let centroid: Point = graph.group(gid).centroid;
                (centroid - node.position)
                    * (self.config.grouping_strength * phase.grouping_multiplier)
            }
            None => Vec2::ZERO,
        }
    }

    fn boundary(&self, graph: &PlacementGraph, id: NodeId) -> Vec2 {
        let pen = graph
            .node(id)
            .bounds()
            .penetration_outside(&graph.interior());
        pen.inward() * self.config.boundary_strength
    }
}

/// Separation direction for two nodes sharing a center.
///
/// Antisymmetric in its arguments so the pair is pushed apart rather than
/// dragged together in the same direction. [`direction`] falls back to the
/// same `(1, 0)` axis for both nodes of a pair, which would not separate them.
fn coincident_direction(node: NodeId, other: NodeId) -> Vec2 {
    let (lo, hi) = if node < other { (node, other) } else { (other, node) };
    let angle = (lo.as_raw() as f64 * 7.0 + hi.as_raw() as f64 * 13.0) * GOLDEN_ANGLE;
    let dir = Vec2::new(angle.cos(), angle.sin());
    if node < other {
        dir
    } else {
        -dir
    }
}
