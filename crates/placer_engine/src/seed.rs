//! Initial layout for unplaced components.
//!
//! Locked components and components with a caller-supplied starting point
//! are left alone. Everything else is spread over the usable interior either
//! by a seeded uniform scatter or on a regular grid. Both are deterministic:
//! nodes are visited in index order and the scatter draws from a
//! [`StdRng`] seeded explicitly.

use crate::graph::PlacementGraph;
use placer_common::{NodeId, Point};
use placer_config::{InitialLayout, PlacementConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used when the configuration does not name one.
pub const DEFAULT_SEED: u64 = 0x5EED_1E55;

/// Places every node in `pending` according to the configured layout.
pub(crate) fn seed_layout(
    graph: &mut PlacementGraph,
    pending: &[NodeId],
    config: &PlacementConfig,
) {
    if pending.is_empty() {
        return;
    }
    match config.initial_layout {
        InitialLayout::Scatter => {
            scatter(graph, pending, config.random_seed.unwrap_or(DEFAULT_SEED))
        }
        InitialLayout::Grid => grid(graph, pending),
    }
}

fn scatter(graph: &mut PlacementGraph, pending: &[NodeId], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let interior = graph.interior();
    for &id in pending {
        let node = graph.node(id);
        let (w, h) = (node.width, node.height);
        let x = sample(&mut rng, interior.min_x + w / 2.0, interior.max_x - w / 2.0);
        let y = sample(&mut rng, interior.min_y + h / 2.0, interior.max_y - h / 2.0);
        graph.move_node(id, Point::new(x, y));
    }
}

fn sample(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn grid(graph: &mut PlacementGraph, pending: &[NodeId]) {
    let interior = graph.interior();
    let count = pending.len();
    let cols = (count as f64).sqrt().ceil().max(1.0) as usize;
    let rows = count.div_ceil(cols);
    let cell_w = interior.width() / cols as f64;
    let cell_h = interior.height() / rows as f64;

    for (slot, &id) in pending.iter().enumerate() {
        let col = slot % cols;
        let row = slot / cols;
        let center = Point::new(
            interior.min_x + (col as f64 + 0.5) * cell_w,
            interior.min_y + (row as f64 + 0.5) * cell_h,
        );
        graph.move_node(id, center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardConstraints, ComponentSpec, PlacementInput};
    use placer_common::Rect;

    fn build(n: usize) -> PlacementGraph {
        let comps = (0..n)
            .map(|i| ComponentSpec::new(format!("U{i}"), 4.0, 2.0))
            .collect();
        let input = PlacementInput::new(BoardConstraints::new(100.0, 60.0, 5.0), comps);
        PlacementGraph::build(
            &input,
            &PlacementConfig::default(),
            Rect::new(5.0, 5.0, 95.0, 55.0),
        )
        .unwrap()
    }

    fn all(graph: &PlacementGraph) -> Vec<NodeId> {
        graph.nodes().iter().map(|n| n.id).collect()
    }

    #[test]
    fn scatter_is_deterministic_per_seed() {
        let config = PlacementConfig {
            random_seed: Some(11),
            ..Default::default()
        };
        let mut a = build(8);
        let mut b = build(8);
        let ids = all(&a);
        seed_layout(&mut a, &ids, &config);
        seed_layout(&mut b, &ids, &config);
        assert_eq!(a.positions(), b.positions());

        let other = PlacementConfig {
            random_seed: Some(12),
            ..Default::default()
        };
        let mut c = build(8);
        seed_layout(&mut c, &ids, &other);
        assert_ne!(a.positions(), c.positions());
    }

    #[test]
    fn scatter_stays_inside_interior() {
        let mut g = build(50);
        let ids = all(&g);
        seed_layout(&mut g, &ids, &PlacementConfig::default());
        let interior = g.interior();
        assert!(g.nodes().iter().all(|n| interior.contains_rect(&n.bounds())));
    }

    #[test]
    fn grid_spreads_row_major() {
        let config = PlacementConfig {
            initial_layout: InitialLayout::Grid,
            ..Default::default()
        };
        let mut g = build(4);
        let ids = all(&g);
        seed_layout(&mut g, &ids, &config);
        let p: Vec<Point> = g.nodes().iter().map(|n| n.position).collect();
        assert_eq!(p[0], Point::new(27.5, 17.5));
        assert_eq!(p[1], Point::new(72.5, 17.5));
        assert_eq!(p[2], Point::new(27.5, 42.5));
        assert_eq!(p[3], Point::new(72.5, 42.5));
    }

    #[test]
    fn only_pending_nodes_move() {
        let mut g = build(3);
        let before = g.nodes()[2].position;
        seed_layout(&mut g, &[NodeId::from_raw(0)], &PlacementConfig::default());
        assert_eq!(g.nodes()[2].position, before);
    }
}
