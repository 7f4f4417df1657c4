//! Force-directed component placement for boards and schematics.
//!
//! Components become nodes of a [`PlacementGraph`], connections and nets
//! become weighted edges, and a damped spring/charge simulation moves the
//! unlocked nodes through a multi-phase annealing schedule. A collision pass
//! then pushes apart whatever still overlaps.
//!
//! # Pipeline
//!
//! 1. **Validate**: reject inputs that cannot be placed at all
//! 2. **Build**: arena graph with net weights and hierarchical groups
//! 3. **Seed**: scatter or grid layout for components without a position
//! 4. **Simulate**: coarse, fine and final phases with a cooling temperature
//! 5. **Resolve**: bounded overlap removal
//! 6. **Measure**: connection lengths and residual violations
//!
//! # Usage
//!
//! ```
//! use placer_config::PlacementConfig;
//! use placer_engine::{place, BoardConstraints, ComponentSpec, ConnectionSpec, PlacementInput};
//!
//! let input = PlacementInput::new(
//!     BoardConstraints::new(50.0, 50.0, 5.0),
//!     vec![ComponentSpec::new("U1", 4.0, 4.0), ComponentSpec::new("U2", 4.0, 4.0)],
//! )
//! .connect(ConnectionSpec::new("U1", "U2"));
//!
//! let outcome = place(&input, PlacementConfig::default()).unwrap();
//! assert_eq!(outcome.positions.len(), 2);
//! ```

#![warn(missing_docs)]

pub mod codes;
pub mod collision;
pub mod engine;
pub mod error;
pub mod force;
pub mod graph;
pub mod metrics;
pub mod model;
pub mod schedule;
pub mod seed;
pub mod validate;
pub mod weight;

pub use collision::{resolve_collisions, CollisionReport};
pub use engine::{place, PlacementDiagnostics, PlacementEngine, PlacementOutcome};
pub use error::PlacementError;
pub use force::{ForceBreakdown, ForceCalculator};
pub use graph::{Group, PlacementEdge, PlacementGraph, PlacementNode};
pub use model::{
    BoardConstraints, ComponentSpec, ConnectionSpec, NetInfo, NetSpec, PlacementInput,
};
pub use schedule::{
    Phase, PhaseSchedule, PhaseScheduler, PhaseState, Progress, ScheduleReport, SimulationState,
};
pub use seed::DEFAULT_SEED;
pub use weight::net_weight;
