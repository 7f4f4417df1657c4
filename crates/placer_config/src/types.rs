//! Configuration types deserialized from `placer.toml`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Every tunable of a placement run.
///
/// All fields are optional in TOML; missing keys take the values from
/// [`PlacementConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Total simulation iterations across all phases.
    pub iterations: usize,
    /// Attraction strength per unit distance along a connection.
    pub spring_constant: f64,
    /// Numerator of the inverse-square repulsion between every node pair.
    pub repulsion_constant: f64,
    /// Pull toward a node's group centroid per unit distance.
    pub grouping_strength: f64,
    /// Inward push per unit of penetration past the board margin.
    pub boundary_strength: f64,
    /// Velocity bound at the first iteration.
    pub initial_temperature: f64,
    /// Per-iteration multiplier applied to the temperature.
    pub cooling_rate: f64,
    /// Per-iteration velocity retention.
    pub damping: f64,
    /// Minimum gap between component boxes after collision resolution.
    pub min_distance: f64,
    /// Additional clearance between component boxes; the larger of this and
    /// `min_distance` applies.
    pub component_spacing: f64,
    /// Margin used when a problem does not state one for its board.
    pub board_margin: f64,
    /// Whether hierarchical groups pull their members together.
    pub enable_grouping: bool,
    /// Whether the overlap clean-up pass runs after the simulation.
    pub enable_collision_resolution: bool,
    /// Whether connection metadata scales edge weights.
    pub enable_net_weighting: bool,
    /// Seed for the scattered initial layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
    /// Upper bound on collision relaxation passes.
    pub max_collision_passes: usize,
    /// Where unplaced components start.
    pub initial_layout: InitialLayout,
    /// How nets with more than two members become pairwise edges.
    pub net_decomposition: NetDecomposition,
    /// Number of leading hierarchical path segments that identify a group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_depth: Option<usize>,
    /// Custom annealing phases; empty means the standard three-phase schedule.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<PhaseConfig>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            iterations: 150,
            spring_constant: 0.15,
            repulsion_constant: 1500.0,
            grouping_strength: 0.3,
            boundary_strength: 15.0,
            initial_temperature: 50.0,
            cooling_rate: 0.96,
            damping: 0.85,
            min_distance: 2.0,
            component_spacing: 2.0,
            board_margin: 5.0,
            enable_grouping: true,
            enable_collision_resolution: true,
            enable_net_weighting: true,
            random_seed: None,
            max_collision_passes: 100,
            initial_layout: InitialLayout::Scatter,
            net_decomposition: NetDecomposition::Star,
            group_depth: None,
            phases: Vec::new(),
        }
    }
}

/// Strategy for seeding unplaced, unlocked components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialLayout {
    /// Uniform random positions inside the usable area, from `random_seed`.
    #[default]
    Scatter,
    /// Row-major grid across the usable area.
    Grid,
}

/// Strategy for turning a multi-member net into pairwise edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetDecomposition {
    /// The first member connects to every other member.
    #[default]
    Star,
    /// Every pair of members is connected.
    Clique,
}

/// One user-defined annealing phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseConfig {
    /// Display name used in progress reports and diagnostics.
    pub name: String,
    /// Share of `iterations` this phase runs for.
    pub fraction: f64,
    /// Temperature cap on entry, relative to `initial_temperature`.
    #[serde(default = "one")]
    pub temperature_scale: f64,
    /// Multiplier on the grouping force.
    #[serde(default = "one")]
    pub grouping_multiplier: f64,
    /// Multiplier on the attraction force.
    #[serde(default = "one")]
    pub attraction_multiplier: f64,
}

fn one() -> f64 {
    1.0
}

impl PlacementConfig {
    /// The gap enforced between component boxes.
    pub fn effective_spacing(&self) -> f64 {
        self.min_distance.max(self.component_spacing)
    }

    /// Checks every value that must be positive, bounded, or finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(invalid("`iterations` must be positive"));
        }
        unit_interval("damping", self.damping)?;
        unit_interval("cooling_rate", self.cooling_rate)?;
        non_negative("initial_temperature", self.initial_temperature)?;
        non_negative("spring_constant", self.spring_constant)?;
        non_negative("repulsion_constant", self.repulsion_constant)?;
        non_negative("grouping_strength", self.grouping_strength)?;
        non_negative("boundary_strength", self.boundary_strength)?;
        non_negative("min_distance", self.min_distance)?;
        non_negative("component_spacing", self.component_spacing)?;
        non_negative("board_margin", self.board_margin)?;
        if self.max_collision_passes == 0 {
            return Err(invalid("`max_collision_passes` must be positive"));
        }
        if self.group_depth == Some(0) {
            return Err(invalid("`group_depth` must be at least 1"));
        }
        for phase in &self.phases {
            if !(phase.fraction.is_finite() && phase.fraction > 0.0) {
                return Err(invalid(format!(
                    "phase '{}': `fraction` must be positive, got {}",
                    phase.name, phase.fraction
                )));
            }
            non_negative("temperature_scale", phase.temperature_scale)?;
            non_negative("grouping_multiplier", phase.grouping_multiplier)?;
            non_negative("attraction_multiplier", phase.attraction_multiplier)?;
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!(
            "`{field}` must be finite and non-negative, got {value}"
        )))
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(format!("`{field}` must be in (0, 1], got {value}")))
    }
}
