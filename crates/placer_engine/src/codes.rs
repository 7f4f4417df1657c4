//! Diagnostic codes emitted by the engine.

use placer_diagnostics::{Category, DiagnosticCode};

/// The problem or configuration cannot be placed.
pub const INVALID_PROBLEM: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);

/// The scheduler entered a new annealing phase.
pub const PHASE_TRANSITION: DiagnosticCode = DiagnosticCode::new(Category::Note, 1);

/// Summary of a completed run.
pub const RUN_SUMMARY: DiagnosticCode = DiagnosticCode::new(Category::Note, 2);

/// A component still extends past the usable board area.
pub const BOUNDARY_VIOLATION: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);

/// Two components are still closer than the required spacing.
pub const RESIDUAL_OVERLAP: DiagnosticCode = DiagnosticCode::new(Category::Warning, 102);

/// The run was stopped before the schedule finished.
pub const CANCELLED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 103);
