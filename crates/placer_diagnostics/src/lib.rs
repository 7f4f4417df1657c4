//! Structured, non-fatal reporting for placement runs.
//!
//! Every condition that does not abort a run (residual overlaps, boundary
//! violations, cancellation, phase transitions) is reported as a
//! [`Diagnostic`] with a severity and a short code. The thread-safe
//! [`DiagnosticSink`] accumulates them, and [`TerminalRenderer`] formats them
//! for humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
