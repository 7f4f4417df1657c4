//! Caller-facing input types for a placement run.
//!
//! These describe components, connections, nets and the board exactly as an
//! upstream collaborator hands them over. Net classification (power, clock,
//! pin count) arrives already decided; nothing here inspects names.

use placer_common::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One rectangular component to place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Caller-chosen unique identifier (typically the reference designator).
    pub id: String,
    /// Bounding-box width.
    pub width: f64,
    /// Bounding-box height.
    pub height: f64,
    /// Whether the engine must leave this component where it is.
    #[serde(default)]
    pub locked: bool,
    /// Required for locked components; the center the component is pinned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_position: Option<Point>,
    /// `/`-separated subcircuit path used for grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical_path: Option<String>,
    /// Starting center for an unlocked component, e.g. a previous run's output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_position: Option<Point>,
}

impl ComponentSpec {
    /// Creates an unlocked, ungrouped component.
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            locked: false,
            fixed_position: None,
            hierarchical_path: None,
            initial_position: None,
        }
    }

    /// Pins the component at `position`.
    pub fn locked_at(mut self, position: Point) -> Self {
        self.locked = true;
        self.fixed_position = Some(position);
        self
    }

    /// Assigns the component to a hierarchical path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.hierarchical_path = Some(path.into());
        self
    }

    /// Sets the starting center of an unlocked component.
    pub fn with_initial_position(mut self, position: Point) -> Self {
        self.initial_position = Some(position);
        self
    }
}

/// Already-classified metadata about a net.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetInfo {
    /// Number of pins on the net.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_count: Option<u32>,
    /// Net is a power rail.
    #[serde(default)]
    pub is_power: bool,
    /// Net carries a clock.
    #[serde(default)]
    pub is_clock: bool,
    /// Copper width of the net's traces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_width: Option<f64>,
}

impl NetInfo {
    /// Metadata for a power or ground rail.
    pub fn power() -> Self {
        Self {
            is_power: true,
            ..Self::default()
        }
    }

    /// Metadata for a clock net.
    pub fn clock() -> Self {
        Self {
            is_clock: true,
            ..Self::default()
        }
    }
}

/// A two-terminal connection between components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    /// First endpoint's component id.
    pub component_a: String,
    /// Second endpoint's component id.
    pub component_b: String,
    /// Net classification carried by this connection.
    #[serde(flatten)]
    pub info: NetInfo,
}

impl ConnectionSpec {
    /// Creates a connection with default metadata.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            component_a: a.into(),
            component_b: b.into(),
            info: NetInfo::default(),
        }
    }

    /// Replaces the connection's metadata.
    pub fn with_info(mut self, info: NetInfo) -> Self {
        self.info = info;
        self
    }
}

/// A named net joining any number of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetSpec {
    /// Net name, used in error messages.
    pub name: String,
    /// Component ids on the net; repeats are ignored.
    pub members: Vec<String>,
    /// Net classification.
    #[serde(flatten)]
    pub info: NetInfo,
}

impl NetSpec {
    /// Creates a net with default metadata.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
            info: NetInfo::default(),
        }
    }

    /// Replaces the net's metadata.
    pub fn with_info(mut self, info: NetInfo) -> Self {
        self.info = info;
        self
    }
}

/// Board outline and keep-out margin, in the caller's linear unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardConstraints {
    /// Board width.
    pub width: f64,
    /// Board height.
    pub height: f64,
    /// Keep-out band along every edge; falls back to the configured
    /// `board_margin` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
}

impl BoardConstraints {
    /// Creates board constraints with an explicit margin.
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin: Some(margin),
        }
    }

    /// The margin in effect, given the configured fallback.
    pub fn margin_or(&self, fallback: f64) -> f64 {
        self.margin.unwrap_or(fallback)
    }
}

/// Everything a placement run consumes besides its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementInput {
    /// Board outline.
    pub board: BoardConstraints,
    /// Components to place.
    pub components: Vec<ComponentSpec>,
    /// Two-terminal connections.
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
    /// Multi-member nets, decomposed into pairwise edges.
    #[serde(default)]
    pub nets: Vec<NetSpec>,
}

impl PlacementInput {
    /// Creates an input with no connections.
    pub fn new(board: BoardConstraints, components: Vec<ComponentSpec>) -> Self {
        Self {
            board,
            components,
            connections: Vec::new(),
            nets: Vec::new(),
        }
    }

    /// Adds a two-terminal connection.
    pub fn connect(mut self, connection: ConnectionSpec) -> Self {
        self.connections.push(connection);
        self
    }

    /// Adds a multi-member net.
    pub fn with_net(mut self, net: NetSpec) -> Self {
        self.nets.push(net);
        self
    }

    /// Returns a copy whose unlocked components start at `positions`.
    ///
    /// Components missing from the map keep their current starting point.
    pub fn with_initial_positions(&self, positions: &BTreeMap<String, Point>) -> Self {
        let mut next = self.clone();
        for component in next.components.iter_mut().filter(|c| !c.locked) {
            if let Some(&p) = positions.get(&component.id) {
                component.initial_position = Some(p);
            }
        }
        next
    }
}
