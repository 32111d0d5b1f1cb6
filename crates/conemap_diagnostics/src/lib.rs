//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Diagnostics report conditions in a mapped network that a user should look
//! at. Warnings leave the result usable, such as conflicting output
//! constraints or inputs whose required time cannot be met; errors mean the
//! run produced no trustworthy result. Each [`Diagnostic`]
//! carries a severity, a categorized code, and optionally the network node it
//! is about. The thread-safe [`DiagnosticSink`] accumulates them and
//! [`TerminalRenderer`] formats them for the CLI.

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
