//! Placement graph model.
//!
//! Nodes live in a flat arena indexed by [`NodeId`]; edges and group
//! membership refer to nodes by index only. The graph is built once per run
//! from validated input and owns every piece of mutable simulation geometry
//! (positions, velocities, centroids).

use crate::error::PlacementError;
use crate::model::{NetInfo, PlacementInput};
use crate::weight::net_weight;
use placer_common::{EdgeId, GroupId, NodeId, Point, Rect, Vec2};
use placer_config::{NetDecomposition, PlacementConfig};
use std::collections::HashMap;

/// Area at which a component's mass reaches 2.
pub const MASS_REFERENCE_AREA: f64 = 100.0;

/// One component in the simulation.
#[derive(Debug, Clone)]
pub struct PlacementNode {
    /// Arena index.
    pub id: NodeId,
    /// Caller's component id.
    pub name: String,
    /// Bounding-box width.
    pub width: f64,
    /// Bounding-box height.
    pub height: f64,
    /// Current box center.
    pub position: Point,
    /// Current velocity.
    pub velocity: Vec2,
    /// Whether the node is pinned.
    pub locked: bool,
    /// Pinned center for locked nodes.
    pub fixed_position: Option<Point>,
    /// Hierarchical group, if any.
    pub group: Option<GroupId>,
    /// Inertia derived from bounding-box area.
    pub mass: f64,
}

impl PlacementNode {
    /// The node's current bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.width, self.height)
    }
}

/// A weighted pairwise connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementEdge {
    /// Arena index.
    pub id: EdgeId,
    /// First endpoint.
    pub a: NodeId,
    /// Second endpoint.
    pub b: NodeId,
    /// Attraction weight from the net weight policy.
    pub weight: f64,
}

impl PlacementEdge {
    /// Returns the endpoint opposite `node`.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.a == node {
            self.b
        } else {
            self.a
        }
    }
}

/// A cluster of nodes sharing a hierarchical path.
#[derive(Debug, Clone)]
pub struct Group {
    /// Arena index.
    pub id: GroupId,
    /// Normalized hierarchical path.
    pub name: String,
    /// Member nodes in ascending order.
    pub members: Vec<NodeId>,
    /// Mean member position, refreshed every iteration.
    pub centroid: Point,
}

/// The indexed collection of nodes, edges, and groups for one run.
#[derive(Debug, Clone)]
pub struct PlacementGraph {
    nodes: Vec<PlacementNode>,
    edges: Vec<PlacementEdge>,
    groups: Vec<Group>,
    incident: Vec<Vec<EdgeId>>,
    interior: Rect,
    node_by_name: HashMap<String, NodeId>,
}

impl PlacementGraph {
    /// Builds the graph from validated input.
    ///
    /// Locked nodes start at their fixed position, unlocked nodes at their
    /// initial position (clamped into `interior`) or at the interior center
    /// until the initial layout seeds them.
    pub fn build(
        input: &PlacementInput,
        config: &PlacementConfig,
        interior: Rect,
    ) -> Result<Self, PlacementError> {
        let paths: Vec<Option<String>> = input
            .components
            .iter()
            .map(|c| {
                c.hierarchical_path
                    .as_deref()
                    .and_then(|p| normalize_path(p, config.group_depth))
            })
            .collect();

        let mut groups: Vec<Group> = Vec::new();
        let mut group_by_name: HashMap<String, GroupId> = HashMap::new();
        let mut nodes = Vec::with_capacity(input.components.len());
        let mut node_by_name = HashMap::with_capacity(input.components.len());

        for (index, (spec, path)) in input.components.iter().zip(paths).enumerate() {
            let id = NodeId::from_index(index);
            let group = path.map(|name| {
                *group_by_name.entry(name.clone()).or_insert_with(|| {
                    let gid = GroupId::from_index(groups.len());
                    groups.push(Group {
                        id: gid,
                        name,
                        members: Vec::new(),
                        centroid: Point::default(),
                    });
                    gid
                })
            });
            if let Some(gid) = group {
                groups[gid.index()].members.push(id);
            }

            let position = match (spec.locked, spec.fixed_position, spec.initial_position) {
                (true, Some(fixed), _) => fixed,
                (true, None, _) => {
                    return Err(PlacementError::MissingFixedPosition(spec.id.clone()))
                }
                (false, _, Some(initial)) => {
                    interior.clamp_center(initial, spec.width, spec.height)
                }
                (false, _, None) => interior.center(),
            };

            nodes.push(PlacementNode {
                id,
                name: spec.id.clone(),
                width: spec.width,
                height: spec.height,
                position,
                velocity: Vec2::ZERO,
                locked: spec.locked,
                fixed_position: if spec.locked { spec.fixed_position } else { None },
                group,
                mass: 1.0 + spec.width * spec.height / MASS_REFERENCE_AREA,
            });
            node_by_name.insert(spec.id.clone(), id);
        }

        let mut graph = Self {
            incident: vec![Vec::new(); nodes.len()],
            nodes,
            edges: Vec::new(),
            groups,
            interior,
            node_by_name,
        };

        for (index, conn) in input.connections.iter().enumerate() {
            let context = || format!("connection {index}");
            let a = graph.lookup(&conn.component_a, context)?;
            let b = graph.lookup(&conn.component_b, context)?;
            graph.add_edge(a, b, net_weight(&conn.info, config));
        }

        for net in &input.nets {
            let context = || format!("net '{}'", net.name);
            let mut members: Vec<NodeId> = Vec::with_capacity(net.members.len());
            for name in &net.members {
                let id = graph.lookup(name, context)?;
                if !members.contains(&id) {
                    members.push(id);
                }
            }
            if members.len() < 2 {
                continue;
            }
            let info = NetInfo {
                pin_count: net.info.pin_count.or(Some(members.len() as u32)),
                ..net.info
            };
            let weight = net_weight(&info, config);
            match config.net_decomposition {
                NetDecomposition::Star => {
                    for &member in &members[1..] {
                        graph.add_edge(members[0], member, weight);
                    }
                }
                NetDecomposition::Clique => {
                    for (i, &a) in members.iter().enumerate() {
                        for &b in &members[i + 1..] {
                            graph.add_edge(a, b, weight);
                        }
                    }
                }
            }
        }

        graph.recompute_centroids();
        Ok(graph)
    }

    fn lookup(
        &self,
        name: &str,
        context: impl FnOnce() -> String,
    ) -> Result<NodeId, PlacementError> {
        self.node_by_name
            .get(name)
            .copied()
            .ok_or_else(|| PlacementError::UnknownComponent {
                context: context(),
                id: name.to_string(),
            })
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) {
        if a == b {
            return;
        }
        let id = EdgeId::from_index(self.edges.len());
        self.edges.push(PlacementEdge { id, a, b, weight });
        self.incident[a.index()].push(id);
        self.incident[b.index()].push(id);
    }

    /// All nodes in index order.
    pub fn nodes(&self) -> &[PlacementNode] {
        &self.nodes
    }

    /// All edges in index order.
    pub fn edges(&self) -> &[PlacementEdge] {
        &self.edges
    }

    /// All groups in index order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: NodeId) -> &PlacementNode {
        &self.nodes[id.index()]
    }

    /// Returns the edge with the given ID.
    pub fn edge(&self, id: EdgeId) -> &PlacementEdge {
        &self.edges[id.index()]
    }

    /// Returns the group with the given ID.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.index()]
    }

    /// Edges touching `node`, in insertion order.
    pub fn incident_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.incident[node.index()]
    }

    /// Looks a node up by the caller's component id.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_by_name.get(name).copied()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The usable board interior.
    pub fn interior(&self) -> Rect {
        self.interior
    }

    /// Recomputes every group centroid as the mean member position.
    pub fn recompute_centroids(&mut self) {
        let nodes = &self.nodes;
        for group in &mut self.groups {
            let mut sum = Vec2::ZERO;
            for &m in &group.members {
                let p = nodes[m.index()].position;
                sum += Vec2::new(p.x, p.y);
            }
            let n = group.members.len().max(1) as f64;
            group.centroid = Point::new(sum.x / n, sum.y / n);
        }
    }

    /// Moves an unlocked node to `position`, clamped into the interior.
    ///
    /// Locked nodes are left untouched.
    pub fn move_node(&mut self, id: NodeId, position: Point) {
        let interior = self.interior;
        let node = &mut self.nodes[id.index()];
        if node.locked {
            return;
        }
        node.position = interior.clamp_center(position, node.width, node.height);
    }

    /// Pulls every unlocked node fully back inside the interior.
    ///
    /// Integration lets boxes stray past the margin so the boundary force has
    /// something to push against; this restores the hard limit afterwards.
    pub fn clamp_to_interior(&mut self) {
        let interior = self.interior;
        for node in self.nodes.iter_mut().filter(|n| !n.locked) {
            node.position = interior.clamp_center(node.position, node.width, node.height);
        }
    }

    /// Mutable access to an unlocked node's position and velocity.
    ///
    /// Returns `None` for locked nodes so their position can never be written.
    pub(crate) fn unlocked_mut(&mut self, id: NodeId) -> Option<&mut PlacementNode> {
        let node = &mut self.nodes[id.index()];
        (!node.locked).then_some(node)
    }

    /// Final positions keyed by component id.
    pub fn positions(&self) -> std::collections::BTreeMap<String, Point> {
        self.nodes
            .iter()
            .map(|n| (n.name.clone(), n.position))
            .collect()
    }
}

/// Trims a `/`-separated path to `depth` segments, dropping empty segments.
///
/// Returns `None` when nothing remains.
pub fn normalize_path(path: &str, depth: Option<usize>) -> Option<String> {
    let limit = depth.unwrap_or(usize::MAX);
    let segments: Vec<&str> = path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(limit)
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
