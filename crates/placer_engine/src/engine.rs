//! The placement engine: validation, seeding, simulation, clean-up.

use crate::codes;
use crate::collision::resolve_collisions;
use crate::error::PlacementError;
use crate::graph::PlacementGraph;
use crate::metrics;
use crate::model::PlacementInput;
use crate::schedule::{PhaseSchedule, PhaseScheduler, Progress};
use crate::seed::seed_layout;
use crate::validate::validate_input;
use placer_common::{NodeId, Point};
use placer_config::PlacementConfig;
use placer_diagnostics::{Diagnostic, DiagnosticSink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Quality figures reported with every outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDiagnostics {
    /// Iterations actually integrated.
    pub iterations_run: usize,
    /// Components whose box is outside the usable interior.
    pub boundary_violations: usize,
    /// Pairs closer than the required spacing, ignoring locked-locked pairs.
    pub residual_overlaps: usize,
    /// Whether the run stopped before its schedule finished.
    pub cancelled: bool,
    /// Mean length over all connection edges.
    pub average_connection_length: f64,
    /// Temperature after the last iteration.
    pub final_temperature: f64,
    /// Collision passes executed; zero when the resolver did not run.
    pub collision_passes: usize,
    /// Sum of edge length times edge weight.
    pub total_weighted_length: f64,
}

/// Final positions and quality figures of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Center of every component, keyed by id.
    pub positions: BTreeMap<String, Point>,
    /// Quality figures.
    pub diagnostics: PlacementDiagnostics,
}

impl PlacementOutcome {
    /// True when the run finished with no violations left.
    pub fn is_clean(&self) -> bool {
        let d = &self.diagnostics;
        !d.cancelled && d.boundary_violations == 0 && d.residual_overlaps == 0
    }
}

/// Runs force-directed placement for one configuration.
///
/// An engine can be reused for several runs; each run starts from a fresh
/// graph and clears the diagnostics of the previous one.
pub struct PlacementEngine {
    config: PlacementConfig,
    schedule: Option<PhaseSchedule>,
    cancel: Option<Arc<AtomicBool>>,
    sink: DiagnosticSink,
}

impl PlacementEngine {
    /// Creates an engine with `config`.
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            schedule: None,
            cancel: None,
            sink: DiagnosticSink::new(),
        }
    }

    /// Overrides the phase schedule derived from the configuration.
    pub fn with_schedule(mut self, schedule: PhaseSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Stops runs at the next iteration boundary once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Diagnostics emitted by the most recent run.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    /// Runs a placement to completion.
    pub fn run(&mut self, input: &PlacementInput) -> Result<PlacementOutcome, PlacementError> {
        self.run_with_progress(input, |_| ControlFlow::Continue(()))
    }

    /// Runs a placement, calling `progress` before every iteration.
    ///
    /// Returning [`ControlFlow::Break`] from `progress` cancels the run; the
    /// positions reached so far are returned and collision resolution is
    /// skipped.
    pub fn run_with_progress<F>(
        &mut self,
        input: &PlacementInput,
        progress: F,
    ) -> Result<PlacementOutcome, PlacementError>
    where
        F: FnMut(&Progress<'_>) -> ControlFlow<()>,
    {
        self.sink.clear();

        let interior = validate_input(input, &self.config)?;
        let mut graph = PlacementGraph::build(input, &self.config, interior)?;

        let pending: Vec<NodeId> = input
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.locked && c.initial_position.is_none())
            .map(|(i, _)| NodeId::from_index(i))
            .collect();
        seed_layout(&mut graph, &pending, &self.config);

        let derived;
        let schedule = match &self.schedule {
            Some(s) => s,
            None => {
                derived = PhaseSchedule::from_config(&self.config);
                &derived
            }
        };
        let mut scheduler = PhaseScheduler::new(&self.config, schedule, &self.sink);
        if let Some(flag) = &self.cancel {
            scheduler = scheduler.with_cancel_flag(flag);
        }
        let report = scheduler.run(&mut graph, progress);

        let spacing = self.config.effective_spacing();
        let mut collision_passes = 0;
        if report.cancelled {
            self.sink.emit(
                Diagnostic::warning(
                    codes::CANCELLED,
                    format!(
                        "placement cancelled after {} of {} iterations",
                        report.iterations_run,
                        schedule.total_iterations()
                    ),
                )
                .with_note("collision resolution was skipped"),
            );
        } else if self.config.enable_collision_resolution {
            collision_passes =
                resolve_collisions(&mut graph, spacing, self.config.max_collision_passes).passes;
        }

        let diagnostics = PlacementDiagnostics {
            iterations_run: report.iterations_run,
            boundary_violations: metrics::count_boundary_violations(&graph),
            residual_overlaps: metrics::count_overlaps(&graph, spacing),
            cancelled: report.cancelled,
            average_connection_length: metrics::average_connection_length(&graph),
            final_temperature: report.final_temperature,
            collision_passes,
            total_weighted_length: metrics::total_weighted_length(&graph),
        };
        self.report_violations(&graph, spacing);
        self.sink.emit(Diagnostic::note(
            codes::RUN_SUMMARY,
            format!(
                "placed {} components in {} iterations: {} boundary violations, {} overlaps, average connection length {:.3}",
                graph.node_count(),
                diagnostics.iterations_run,
                diagnostics.boundary_violations,
                diagnostics.residual_overlaps,
                diagnostics.average_connection_length,
            ),
        ));

        Ok(PlacementOutcome {
            positions: graph.positions(),
            diagnostics,
        })
    }

    fn report_violations(&self, graph: &PlacementGraph, spacing: f64) {
        let interior = graph.interior();
        for node in graph.nodes() {
            if !interior.contains_rect(&node.bounds()) {
                let mut d = Diagnostic::warning(
                    codes::BOUNDARY_VIOLATION,
                    format!("component '{}' extends past the usable board area", node.name),
                )
                .with_subject(node.name.clone());
                if node.locked {
                    d = d.with_help("move the fixed position inside the board margin");
                }
                self.sink.emit(d);
            }
        }
        for (a, b) in metrics::overlapping_pairs(graph, spacing) {
            self.sink.emit(
                Diagnostic::warning(
                    codes::RESIDUAL_OVERLAP,
                    format!("components '{a}' and '{b}' are closer than {spacing}"),
                )
                .with_subject(format!("{a}, {b}"))
                .with_help("enlarge the board or raise max_collision_passes"),
            );
        }
    }
}

/// Runs one placement with a throwaway engine.
pub fn place(
    input: &PlacementInput,
    config: PlacementConfig,
) -> Result<PlacementOutcome, PlacementError> {
    PlacementEngine::new(config).run(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardConstraints, ComponentSpec, ConnectionSpec};
    use placer_diagnostics::Severity;
    use std::sync::atomic::Ordering;

    fn small() -> PlacementInput {
        PlacementInput::new(
            BoardConstraints::new(60.0, 60.0, 5.0),
            vec![
                ComponentSpec::new("U1", 4.0, 4.0),
                ComponentSpec::new("U2", 4.0, 4.0),
                ComponentSpec::new("U3", 4.0, 4.0),
            ],
        )
        .connect(ConnectionSpec::new("U1", "U2"))
    }

    fn seeded() -> PlacementConfig {
        PlacementConfig {
            random_seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn run_reports_every_component() {
        let outcome = place(&small(), seeded()).unwrap();
        assert_eq!(outcome.positions.len(), 3);
        assert_eq!(outcome.diagnostics.iterations_run, 150);
        assert!(outcome.is_clean());
        assert!(outcome.diagnostics.collision_passes >= 1);
    }

    #[test]
    fn summary_and_phase_notes_are_emitted() {
        let mut engine = PlacementEngine::new(seeded());
        engine.run(&small()).unwrap();
        let diags = engine.sink().diagnostics();
        let phases = diags
            .iter()
            .filter(|d| d.code == codes::PHASE_TRANSITION)
            .count();
        assert_eq!(phases, 3);
        assert_eq!(diags.last().map(|d| d.code), Some(codes::RUN_SUMMARY));
        assert!(!engine.sink().has_errors());
    }

    #[test]
    fn sink_is_cleared_between_runs() {
        let mut engine = PlacementEngine::new(seeded());
        engine.run(&small()).unwrap();
        let first = engine.sink().diagnostics().len();
        engine.run(&small()).unwrap();
        assert_eq!(engine.sink().diagnostics().len(), first);
    }

    #[test]
    fn validation_error_is_returned() {
        let input = PlacementInput::new(BoardConstraints::new(60.0, 60.0, 5.0), vec![])
            .connect(ConnectionSpec::new("U1", "U2"));
        assert!(matches!(
            place(&input, seeded()),
            Err(PlacementError::EmptyComponents)
        ));
    }

    #[test]
    fn preset_cancel_flag_skips_everything() {
        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Relaxed);
        let mut engine = PlacementEngine::new(seeded()).with_cancel_flag(flag);
        let outcome = engine.run(&small()).unwrap();
        assert!(outcome.diagnostics.cancelled);
        assert_eq!(outcome.diagnostics.iterations_run, 0);
        assert_eq!(outcome.diagnostics.collision_passes, 0);
        assert!(!outcome.is_clean());
        assert!(engine
            .sink()
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::CANCELLED && d.severity == Severity::Warning));
    }

    #[test]
    fn collision_can_be_disabled() {
        let config = PlacementConfig {
            enable_collision_resolution: false,
            ..seeded()
        };
        let outcome = place(&small(), config).unwrap();
        assert_eq!(outcome.diagnostics.collision_passes, 0);
    }

    #[test]
    fn outcome_serializes() {
        let outcome = place(&small(), seeded()).unwrap();
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"positions\""));
        assert!(json.contains("\"residual_overlaps\""));
        let back: PlacementOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.positions.keys().collect::<Vec<_>>(),
            outcome.positions.keys().collect::<Vec<_>>()
        );
        assert_eq!(back.diagnostics.iterations_run, 150);
    }
}
