//! Multi-phase annealing schedule and the integration loop.
//!
//! A [`PhaseSchedule`] is plain data: an ordered list of [`Phase`]s, each
//! with an iteration budget and multipliers for the grouping and attraction
//! terms. The [`PhaseScheduler`] walks it as a state machine
//! (`Running(0) → Running(1) → … → Done`), integrating velocities and
//! positions once per iteration while the temperature decays.
//!
//! Steps move boxes without clamping, so a box driven past the margin feels
//! the boundary force on the next step. Whichever way the run ends, every
//! unlocked box is clamped back inside the interior before returning.

use crate::codes;
use crate::force::ForceCalculator;
use crate::graph::PlacementGraph;
use placer_common::NodeId;
use placer_config::PlacementConfig;
use placer_diagnostics::{Diagnostic, DiagnosticSink};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};

/// One stage of the annealing schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    /// Display name.
    pub name: String,
    /// Iterations spent in this phase.
    pub iterations: usize,
    /// Temperature cap on entry, relative to the initial temperature.
    pub temperature_scale: f64,
    /// Multiplier on the grouping force.
    pub grouping_multiplier: f64,
    /// Multiplier on the attraction force.
    pub attraction_multiplier: f64,
}

impl Phase {
    /// Creates a phase.
    pub fn new(
        name: impl Into<String>,
        iterations: usize,
        temperature_scale: f64,
        grouping_multiplier: f64,
        attraction_multiplier: f64,
    ) -> Self {
        Self {
            name: name.into(),
            iterations,
            temperature_scale,
            grouping_multiplier,
            attraction_multiplier,
        }
    }
}

/// An ordered list of phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSchedule {
    phases: Vec<Phase>,
}

impl PhaseSchedule {
    /// Creates a schedule from explicit phases.
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    /// The coarse/fine/final schedule over `iterations`, split in thirds.
    ///
    /// Any remainder goes to the final phase.
    pub fn standard(iterations: usize) -> Self {
        let third = iterations / 3;
        Self::new(vec![
            Phase::new("coarse", third, 1.0, 2.0, 0.5),
            Phase::new("fine", third, 0.5, 1.0, 1.5),
            Phase::new("final", iterations - 2 * third, 0.25, 0.5, 2.0),
        ])
    }

    /// The configured custom phases, or the standard schedule if none.
    ///
    /// Custom phase fractions are normalized and rounded cumulatively so the
    /// phase budgets always add up to `config.iterations`.
    pub fn from_config(config: &PlacementConfig) -> Self {
        if config.phases.is_empty() {
            return Self::standard(config.iterations);
        }
        let total: f64 = config.phases.iter().map(|p| p.fraction).sum();
        let mut cumulative = 0.0;
        let mut assigned = 0;
        let last = config.phases.len() - 1;
        let phases = config
            .phases
            .iter()
            .enumerate()
            .map(|(i, p)| {
                cumulative += p.fraction;
                let boundary = if i == last {
                    config.iterations
                } else {
                    ((cumulative / total) * config.iterations as f64).round() as usize
                };
                let iterations = boundary.saturating_sub(assigned);
                assigned += iterations;
                Phase::new(
                    p.name.clone(),
                    iterations,
                    p.temperature_scale,
                    p.grouping_multiplier,
                    p.attraction_multiplier,
                )
            })
            .collect();
        Self::new(phases)
    }

    /// The phases in order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Sum of all phase budgets.
    pub fn total_iterations(&self) -> usize {
        self.phases.iter().map(|p| p.iterations).sum()
    }

    /// The phase index and phase that `iteration` falls in.
    pub fn phase_at(&self, iteration: usize) -> Option<(usize, &Phase)> {
        let mut start = 0;
        for (index, phase) in self.phases.iter().enumerate() {
            if iteration < start + phase.iterations {
                return Some((index, phase));
            }
            start += phase.iterations;
        }
        None
    }
}

/// Where the scheduler is in its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    /// Iterating inside the phase at this index.
    Running(usize),
    /// All phases are exhausted or the run was stopped.
    Done,
}

/// Mutable loop state owned by one scheduler run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Iterations completed so far.
    pub iteration: usize,
    /// Current velocity bound.
    pub temperature: f64,
    /// Current phase.
    pub phase: PhaseState,
}

impl SimulationState {
    fn new(initial_temperature: f64) -> Self {
        Self {
            iteration: 0,
            temperature: initial_temperature,
            phase: PhaseState::Running(0),
        }
    }

    fn enter_phase(&mut self, index: usize, phase: &Phase, initial_temperature: f64) {
        self.phase = PhaseState::Running(index);
        self.temperature = self
            .temperature
            .min(initial_temperature * phase.temperature_scale);
    }
}

/// What the progress callback sees before each iteration.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Zero-based index of the iteration about to run.
    pub iteration: usize,
    /// Iterations in the whole schedule.
    pub total_iterations: usize,
    /// Name of the current phase.
    pub phase: &'a str,
    /// Current velocity bound.
    pub temperature: f64,
}

/// Outcome of driving the schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleReport {
    /// Iterations actually integrated.
    pub iterations_run: usize,
    /// Temperature after the last iteration.
    pub final_temperature: f64,
    /// Whether the run stopped before the schedule was exhausted.
    pub cancelled: bool,
}

/// Drives the iteration loop for one run.
pub struct PhaseScheduler<'a> {
    config: &'a PlacementConfig,
    schedule: &'a PhaseSchedule,
    sink: &'a DiagnosticSink,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> PhaseScheduler<'a> {
    /// Creates a scheduler over `schedule` using `config`'s constants.
    pub fn new(
        config: &'a PlacementConfig,
        schedule: &'a PhaseSchedule,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            config,
            schedule,
            sink,
            cancel: None,
        }
    }

    /// Stops the run at the next iteration boundary once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Runs every phase to completion or until cancelled.
    ///
    /// `progress` is called at the top of each iteration; returning
    /// [`ControlFlow::Break`] stops the run with the positions reached so far.
    pub fn run<F>(&self, graph: &mut PlacementGraph, mut progress: F) -> ScheduleReport
    where
        F: FnMut(&Progress<'_>) -> ControlFlow<()>,
    {
        let total_iterations = self.schedule.total_iterations();
        let mut state = SimulationState::new(self.config.initial_temperature);

        for (index, phase) in self.schedule.phases().iter().enumerate() {
            if phase.iterations == 0 {
                continue;
            }
            state.enter_phase(index, phase, self.config.initial_temperature);
            self.sink.emit(Diagnostic::note(
                codes::PHASE_TRANSITION,
                format!(
                    "entering phase '{}' at iteration {} (temperature {:.3})",
                    phase.name, state.iteration, state.temperature
                ),
            ));

            for _ in 0..phase.iterations {
                let report = Progress {
                    iteration: state.iteration,
                    total_iterations,
                    phase: &phase.name,
                    temperature: state.temperature,
                };
                if self.cancel_requested() || progress(&report).is_break() {
                    state.phase = PhaseState::Done;
                    graph.clamp_to_interior();
                    return ScheduleReport {
                        iterations_run: state.iteration,
                        final_temperature: state.temperature,
                        cancelled: true,
                    };
                }
                self.step(graph, phase, &mut state);
            }
        }

        state.phase = PhaseState::Done;
        graph.clamp_to_interior();
        ScheduleReport {
            iterations_run: state.iteration,
            final_temperature: state.temperature,
            cancelled: false,
        }
    }

    /// One integration step: centroids, forces, velocities, positions, cooling.
    ///
    /// Positions are not clamped here; a box may end the step partly outside
    /// the interior, where the boundary force takes over.
    pub fn step(&self, graph: &mut PlacementGraph, phase: &Phase, state: &mut SimulationState) {
        graph.recompute_centroids();
        let forces = ForceCalculator::new(self.config).all_forces(graph, phase);
        let damping = self.config.damping;

        for (i, force) in forces.into_iter().enumerate() {
            let Some(node) = graph.unlocked_mut(NodeId::from_index(i)) else {
                continue;
            };
            let velocity = ((node.velocity + force * (1.0 / node.mass)) * damping)
                .clamp_length(state.temperature);
            node.velocity = velocity;
            node.position += velocity;
        }

        state.temperature *= self.config.cooling_rate;
        state.iteration += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardConstraints, ComponentSpec, ConnectionSpec, PlacementInput};
    use crate::force::ForceCalculator;
    use placer_common::{distance, Point, Rect, Vec2};
    use placer_config::PhaseConfig;

    fn two_connected(x_a: f64, x_b: f64) -> PlacementGraph {
        let input = PlacementInput::new(
            BoardConstraints::new(100.0, 100.0, 5.0),
            vec![
                ComponentSpec::new("A", 2.0, 2.0).with_initial_position(Point::new(x_a, 50.0)),
                ComponentSpec::new("B", 2.0, 2.0).with_initial_position(Point::new(x_b, 50.0)),
            ],
        )
        .connect(ConnectionSpec::new("A", "B"));
        PlacementGraph::build(
            &input,
            &PlacementConfig::default(),
            Rect::new(5.0, 5.0, 95.0, 95.0),
        )
        .unwrap()
    }

    fn keep_going(_: &Progress<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    #[test]
    fn standard_schedule_shape() {
        let s = PhaseSchedule::standard(150);
        let p = s.phases();
        assert_eq!(p.len(), 3);
        assert_eq!(
            p.iter().map(|p| p.iterations).collect::<Vec<_>>(),
            vec![50, 50, 50]
        );
        assert_eq!((p[0].grouping_multiplier, p[0].attraction_multiplier), (2.0, 0.5));
        assert_eq!((p[1].grouping_multiplier, p[1].attraction_multiplier), (1.0, 1.5));
        assert_eq!((p[2].grouping_multiplier, p[2].attraction_multiplier), (0.5, 2.0));
    }

    #[test]
    fn standard_remainder_goes_to_final() {
        let s = PhaseSchedule::standard(10);
        assert_eq!(
            s.phases().iter().map(|p| p.iterations).collect::<Vec<_>>(),
            vec![3, 3, 4]
        );
        assert_eq!(s.total_iterations(), 10);
    }

    #[test]
    fn phase_at_thresholds() {
        let s = PhaseSchedule::standard(9);
        assert_eq!(s.phase_at(0).map(|(i, _)| i), Some(0));
        assert_eq!(s.phase_at(2).map(|(i, _)| i), Some(0));
        assert_eq!(s.phase_at(3).map(|(i, _)| i), Some(1));
        assert_eq!(s.phase_at(8).map(|(i, _)| i), Some(2));
        assert!(s.phase_at(9).is_none());
    }

    #[test]
    fn custom_phases_from_config() {
        let config = PlacementConfig {
            iterations: 100,
            phases: vec![
                PhaseConfig {
                    name: "spread".into(),
                    fraction: 1.0,
                    temperature_scale: 1.0,
                    grouping_multiplier: 3.0,
                    attraction_multiplier: 0.1,
                },
                PhaseConfig {
                    name: "settle".into(),
                    fraction: 2.0,
                    temperature_scale: 0.5,
                    grouping_multiplier: 1.0,
                    attraction_multiplier: 1.0,
                },
            ],
            ..Default::default()
        };
        let s = PhaseSchedule::from_config(&config);
        assert_eq!(s.phases().len(), 2);
        assert_eq!(s.phases()[0].iterations, 33);
        assert_eq!(s.phases()[1].iterations, 67);
        assert_eq!(s.phases()[0].grouping_multiplier, 3.0);
    }

    #[test]
    fn connected_pair_pulls_together() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(150);
        let sink = DiagnosticSink::new();
        let mut g = two_connected(10.0, 90.0);
        let before = distance(g.nodes()[0].position, g.nodes()[1].position);
        let report = PhaseScheduler::new(&config, &schedule, &sink).run(&mut g, keep_going);
        let after = distance(g.nodes()[0].position, g.nodes()[1].position);
        assert_eq!(report.iterations_run, 150);
        assert!(!report.cancelled);
        assert!(after < before);
        assert_eq!(sink.diagnostics().len(), 3);
    }

    #[test]
    fn temperature_never_increases() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(60);
        let sink = DiagnosticSink::new();
        let mut g = two_connected(20.0, 70.0);
        let mut temps = Vec::new();
        let report = PhaseScheduler::new(&config, &schedule, &sink).run(&mut g, |p| {
            temps.push(p.temperature);
            ControlFlow::Continue(())
        });
        assert_eq!(temps.len(), 60);
        assert!(temps.windows(2).all(|w| w[1] <= w[0]));
        assert!(report.final_temperature <= *temps.last().unwrap());
    }

    #[test]
    fn velocity_bounded_by_temperature() {
        let config = PlacementConfig {
            initial_temperature: 0.5,
            ..Default::default()
        };
        let schedule = PhaseSchedule::standard(3);
        let sink = DiagnosticSink::new();
        let mut g = two_connected(10.0, 12.0);
        let scheduler = PhaseScheduler::new(&config, &schedule, &sink);
        let mut state = SimulationState::new(config.initial_temperature);
        let before = g.nodes()[0].position;
        scheduler.step(&mut g, &schedule.phases()[0], &mut state);
        assert!(g.nodes()[0].velocity.length() <= 0.5 + 1e-12);
        assert!(distance(before, g.nodes()[0].position) <= 0.5 + 1e-12);
        assert_eq!(state.iteration, 1);
        assert!((state.temperature - 0.5 * 0.96).abs() < 1e-12);
    }

    #[test]
    fn locked_node_never_moves() {
        let input = PlacementInput::new(
            BoardConstraints::new(100.0, 100.0, 5.0),
            vec![
                ComponentSpec::new("J1", 2.0, 2.0).locked_at(Point::new(50.0, 50.0)),
                ComponentSpec::new("U1", 2.0, 2.0).with_initial_position(Point::new(52.0, 50.0)),
            ],
        )
        .connect(ConnectionSpec::new("J1", "U1"));
        let config = PlacementConfig::default();
        let mut g = PlacementGraph::build(&input, &config, Rect::new(5.0, 5.0, 95.0, 95.0))
            .unwrap();
        let schedule = PhaseSchedule::standard(30);
        let sink = DiagnosticSink::new();
        PhaseScheduler::new(&config, &schedule, &sink).run(&mut g, keep_going);
        assert_eq!(g.nodes()[0].position, Point::new(50.0, 50.0));
        assert_eq!(g.nodes()[0].velocity, Vec2::ZERO);
        assert_ne!(g.nodes()[1].position, Point::new(52.0, 50.0));
    }

    fn pushed_against_left_wall() -> PlacementGraph {
        let input = PlacementInput::new(
            BoardConstraints::new(100.0, 100.0, 5.0),
            vec![
                ComponentSpec::new("J1", 2.0, 2.0).locked_at(Point::new(9.0, 50.0)),
                ComponentSpec::new("U1", 2.0, 2.0).with_initial_position(Point::new(7.0, 50.0)),
            ],
        );
        PlacementGraph::build(
            &input,
            &PlacementConfig::default(),
            Rect::new(5.0, 5.0, 95.0, 95.0),
        )
        .unwrap()
    }

    /// 30 parts of 4x4 in a 6x5 grid filling a 60x60 board.
    fn crowded_board() -> PlacementGraph {
        let components = (0..30)
            .map(|i| {
                let (col, row) = ((i % 6) as f64, (i / 6) as f64);
                ComponentSpec::new(format!("U{i}"), 4.0, 4.0)
                    .with_initial_position(Point::new(10.0 + 8.0 * col, 12.0 + 9.0 * row))
            })
            .collect();
        let input = PlacementInput::new(BoardConstraints::new(60.0, 60.0, 5.0), components);
        PlacementGraph::build(
            &input,
            &PlacementConfig::default(),
            Rect::new(5.0, 5.0, 55.0, 55.0),
        )
        .unwrap()
    }

    #[test]
    fn step_lets_a_node_cross_the_wall_and_boundary_force_answers() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(30);
        let sink = DiagnosticSink::new();
        let mut g = pushed_against_left_wall();
        let scheduler = PhaseScheduler::new(&config, &schedule, &sink);
        let mut state = SimulationState::new(config.initial_temperature);
        let phase = &schedule.phases()[0];

        scheduler.step(&mut g, phase, &mut state);
        let u1 = NodeId::from_raw(1);
        assert!(g.node(u1).bounds().min_x < 5.0);

        let forces = ForceCalculator::new(&config).node_forces(&g, u1, phase);
        assert!(forces.boundary.x > 0.0);
        assert_eq!(forces.boundary.y, 0.0);
    }

    #[test]
    fn boundary_force_fires_during_a_crowded_run() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(150);
        let sink = DiagnosticSink::new();
        let mut g = crowded_board();
        let scheduler = PhaseScheduler::new(&config, &schedule, &sink);
        let calc = ForceCalculator::new(&config);
        let mut state = SimulationState::new(config.initial_temperature);

        let mut pushed = 0;
        for iteration in 0..schedule.total_iterations() {
            let Some((index, phase)) = schedule.phase_at(iteration) else {
                break;
            };
            if state.phase != PhaseState::Running(index) {
                state.enter_phase(index, phase, config.initial_temperature);
            }
            pushed += (0..g.node_count())
                .map(|i| calc.node_forces(&g, NodeId::from_index(i), phase).boundary)
                .filter(|b| *b != Vec2::ZERO)
                .count();
            scheduler.step(&mut g, phase, &mut state);
        }
        assert!(pushed > 0);
    }

    #[test]
    fn run_ends_with_every_box_inside() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(150);
        let sink = DiagnosticSink::new();
        let mut g = crowded_board();
        PhaseScheduler::new(&config, &schedule, &sink).run(&mut g, keep_going);
        let interior = g.interior();
        assert!(g.nodes().iter().all(|n| interior.contains_rect(&n.bounds())));
    }

    #[test]
    fn cancelled_run_is_clamped_too() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(30);
        let sink = DiagnosticSink::new();
        let mut g = pushed_against_left_wall();
        let report = PhaseScheduler::new(&config, &schedule, &sink).run(&mut g, |p| {
            if p.iteration == 1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(report.cancelled);
        assert_eq!(report.iterations_run, 1);
        assert_eq!(g.nodes()[0].position, Point::new(9.0, 50.0));
        assert_eq!(g.nodes()[1].position, Point::new(6.0, 50.0));
    }

    #[test]
    fn callback_break_cancels() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(90);
        let sink = DiagnosticSink::new();
        let mut g = two_connected(20.0, 70.0);
        let report = PhaseScheduler::new(&config, &schedule, &sink).run(&mut g, |p| {
            if p.iteration == 10 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(report.cancelled);
        assert_eq!(report.iterations_run, 10);
    }

    #[test]
    fn cancel_flag_stops_before_first_iteration() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::standard(30);
        let sink = DiagnosticSink::new();
        let flag = AtomicBool::new(true);
        let mut g = two_connected(20.0, 70.0);
        let before = g.positions();
        let report = PhaseScheduler::new(&config, &schedule, &sink)
            .with_cancel_flag(&flag)
            .run(&mut g, keep_going);
        assert!(report.cancelled);
        assert_eq!(report.iterations_run, 0);
        assert_eq!(g.positions(), before);
    }

    #[test]
    fn empty_phases_are_skipped() {
        let config = PlacementConfig::default();
        let schedule = PhaseSchedule::new(vec![
            Phase::new("nothing", 0, 1.0, 1.0, 1.0),
            Phase::new("work", 5, 1.0, 1.0, 1.0),
        ]);
        let sink = DiagnosticSink::new();
        let mut g = two_connected(20.0, 70.0);
        let report = PhaseScheduler::new(&config, &schedule, &sink).run(&mut g, keep_going);
        assert_eq!(report.iterations_run, 5);
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
