//! `placer check`: validate a problem without placing it.
//!
//! Problems are reported through a [`DiagnosticSink`] like a run's results:
//! an input the engine would reject becomes an `E001` error, and a locked
//! component whose fixed box already reaches into the margin becomes a
//! `W101` warning, since the engine will never move it.

use std::path::Path;

use placer_common::Rect;
use placer_config::PlacementConfig;
use placer_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use placer_engine::codes;
use placer_engine::validate::validate_input;
use placer_engine::PlacementInput;

use crate::problem::{load_problem, resolve_config};
use crate::{CheckArgs, GlobalArgs};

/// Runs the `placer check` command.
///
/// Returns exit code 1 when the problem cannot be placed, 0 otherwise.
/// Files that cannot be read or parsed come back as errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let input = load_problem(Path::new(&args.problem))?;
    let config = resolve_config(args.config.as_deref(), &std::env::current_dir()?)?;

    let sink = DiagnosticSink::new();
    let interior = check_problem(&input, &config, &sink);

    if !global.quiet {
        let renderer = TerminalRenderer::new(global.color);
        for diag in &sink.diagnostics() {
            eprint!("{}", renderer.render(diag));
        }
        if let Some(interior) = interior {
            let locked = input.components.iter().filter(|c| c.locked).count();
            eprintln!(
                "       Valid {} components ({} locked), {} connections, {} nets",
                input.components.len(),
                locked,
                input.connections.len(),
                input.nets.len()
            );
            eprintln!(
                "             usable area {} x {} at ({}, {})",
                interior.width(),
                interior.height(),
                interior.min_x,
                interior.min_y
            );
        }
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            sink.error_count(),
            sink.warning_count()
        );
    }

    if sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Validates `input` against `config`, emitting findings into `sink`.
///
/// Returns the usable interior when the problem can be placed.
pub fn check_problem(
    input: &PlacementInput,
    config: &PlacementConfig,
    sink: &DiagnosticSink,
) -> Option<Rect> {
    let interior = match validate_input(input, config) {
        Ok(interior) => interior,
        Err(e) => {
            sink.emit(Diagnostic::error(codes::INVALID_PROBLEM, e.to_string()));
            return None;
        }
    };

    for c in input.components.iter().filter(|c| c.locked) {
        let Some(fixed) = c.fixed_position else {
            continue;
        };
        if !interior.contains_rect(&Rect::from_center(fixed, c.width, c.height)) {
            sink.emit(
                Diagnostic::warning(
                    codes::BOUNDARY_VIOLATION,
                    format!("locked component '{}' extends past the usable board area", c.id),
                )
                .with_subject(c.id.clone())
                .with_help("move the fixed position inside the board margin"),
            );
        }
    }
    Some(interior)
}
