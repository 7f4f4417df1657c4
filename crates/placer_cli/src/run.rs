//! `placer run`: load, place, report.
//!
//! 1. Load the problem file and resolve the configuration
//! 2. Apply command-line overrides
//! 3. Run the engine
//! 4. Render diagnostics and write the outcome
//!
//! Exit code 0 means a clean layout, 2 means the run finished but left
//! violations (or was cancelled), 1 is reserved for errors.

use std::fs;
use std::ops::ControlFlow;
use std::path::Path;

use placer_config::PlacementConfig;
use placer_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TerminalRenderer};
use placer_engine::{PlacementEngine, PlacementOutcome};
use serde_json::json;

use crate::problem::{load_outcome, load_problem, resolve_config};
use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Exit code for a finished run that left violations behind.
pub const EXIT_VIOLATIONS: i32 = 2;

/// Runs the `placer run` command.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut input = load_problem(Path::new(&args.problem))?;
    if let Some(previous) = &args.initial {
        let outcome = load_outcome(Path::new(previous))?;
        input = input.with_initial_positions(&outcome.positions);
    }

    let config = apply_overrides(
        resolve_config(args.config.as_deref(), &std::env::current_dir()?)?,
        args,
    );

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "     Placing {} components ({} iterations)",
            input.components.len(),
            config.iterations
        );
    }

    let mut engine = PlacementEngine::new(config);
    let mut last_phase = String::new();
    let outcome = engine.run_with_progress(&input, |p| {
        if global.verbose && p.phase != last_phase {
            eprintln!(
                "       Phase {} at iteration {}/{}",
                p.phase, p.iteration, p.total_iterations
            );
            last_phase = p.phase.to_string();
        }
        ControlFlow::Continue(())
    })?;
    let diagnostics = engine.sink().diagnostics();

    match args.format {
        ReportFormat::Text => {
            render_text(&diagnostics, global);
            match &args.output {
                Some(path) => write_outcome(&outcome, Path::new(path))?,
                None => print!("{}", positions_table(&outcome)),
            }
            if !global.quiet {
                let d = &outcome.diagnostics;
                eprintln!(
                    "   Result: {} overlap(s), {} boundary violation(s), average connection length {:.3}",
                    d.residual_overlaps, d.boundary_violations, d.average_connection_length
                );
            }
        }
        ReportFormat::Json => {
            if let Some(path) = &args.output {
                write_outcome(&outcome, Path::new(path))?;
            }
            let report = json!({
                "outcome": outcome,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(exit_code(&outcome))
}

/// Folds command-line flags into the loaded configuration.
pub fn apply_overrides(mut config: PlacementConfig, args: &RunArgs) -> PlacementConfig {
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if args.no_collision {
        config.enable_collision_resolution = false;
    }
    config
}

/// Exit status for a finished run.
pub fn exit_code(outcome: &PlacementOutcome) -> i32 {
    if outcome.is_clean() {
        0
    } else {
        EXIT_VIOLATIONS
    }
}

fn render_text(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    let renderer = TerminalRenderer::new(global.color);
    for diag in diagnostics {
        if diag.severity == Severity::Note && !global.verbose {
            continue;
        }
        eprint!("{}", renderer.render(diag));
    }
}

/// One `id x y` line per component, ids aligned.
fn positions_table(outcome: &PlacementOutcome) -> String {
    let width = outcome.positions.keys().map(String::len).max().unwrap_or(0);
    outcome
        .positions
        .iter()
        .map(|(id, p)| format!("{id:<width$}  {:>10.3}  {:>10.3}\n", p.x, p.y))
        .collect()
}

fn write_outcome(
    outcome: &PlacementOutcome,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(outcome)?;
    fs::write(path, json + "\n")
        .map_err(|e| format!("cannot write '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use placer_engine::{BoardConstraints, ComponentSpec, PlacementInput};
    use tempfile::TempDir;

    fn args(problem: &str) -> RunArgs {
        RunArgs {
            problem: problem.to_string(),
            config: None,
            seed: None,
            iterations: None,
            initial: None,
            output: None,
            format: ReportFormat::Json,
            no_collision: false,
        }
    }

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
        }
    }

    fn write_problem(dir: &Path) -> String {
        let input = PlacementInput::new(
            BoardConstraints::new(40.0, 40.0, 2.0),
            vec![
                ComponentSpec::new("U1", 4.0, 4.0),
                ComponentSpec::new("U2", 4.0, 4.0),
            ],
        );
        let path = dir.join("board.json");
        fs::write(&path, serde_json::to_string(&input).unwrap()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut a = args("p.json");
        a.seed = Some(3);
        a.iterations = Some(9);
        a.no_collision = true;
        let config = apply_overrides(PlacementConfig::default(), &a);
        assert_eq!(config.random_seed, Some(3));
        assert_eq!(config.iterations, 9);
        assert!(!config.enable_collision_resolution);
    }

    #[test]
    fn no_overrides_keep_config() {
        let config = apply_overrides(PlacementConfig::default(), &args("p.json"));
        assert_eq!(config, PlacementConfig::default());
    }

    #[test]
    fn run_writes_outcome_file() {
        let tmp = TempDir::new().unwrap();
        let problem = write_problem(tmp.path());
        let out = tmp.path().join("out.json");
        let mut a = args(&problem);
        a.seed = Some(1);
        a.output = Some(out.to_string_lossy().into_owned());
        let code = run(&a, &quiet()).unwrap();
        assert_eq!(code, 0);

        let outcome: PlacementOutcome =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(outcome.positions.len(), 2);
        assert_eq!(outcome.diagnostics.iterations_run, 150);
    }

    #[test]
    fn rerun_from_previous_outcome() {
        let tmp = TempDir::new().unwrap();
        let problem = write_problem(tmp.path());
        let first = tmp.path().join("first.json");
        let mut a = args(&problem);
        a.seed = Some(1);
        a.output = Some(first.to_string_lossy().into_owned());
        run(&a, &quiet()).unwrap();

        let mut b = args(&problem);
        b.initial = Some(first.to_string_lossy().into_owned());
        b.iterations = Some(3);
        assert_eq!(run(&b, &quiet()).unwrap(), 0);
    }

    #[test]
    fn invalid_problem_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let input = PlacementInput::new(
            BoardConstraints::new(10.0, 10.0, 2.0),
            vec![ComponentSpec::new("BIG", 20.0, 2.0)],
        );
        let path = tmp.path().join("board.json");
        fs::write(&path, serde_json::to_string(&input).unwrap()).unwrap();
        let err = run(&args(&path.to_string_lossy()), &quiet()).unwrap_err();
        assert!(err.to_string().contains("BIG"));
    }

    #[test]
    fn table_aligns_ids() {
        let tmp = TempDir::new().unwrap();
        let problem = write_problem(tmp.path());
        let input = load_problem(Path::new(&problem)).unwrap();
        let outcome = placer_engine::place(&input, PlacementConfig::default()).unwrap();
        let table = positions_table(&outcome);
        assert_eq!(table.lines().count(), 2);
        assert!(table.starts_with("U1  "));
    }
}
