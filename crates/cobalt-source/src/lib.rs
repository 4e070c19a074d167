//! Source locations, diagnostics and configuration for the Cobalt compiler.
//!
//! This crate is responsible for:
//! - Describing where a declaration lives (`Location`)
//! - Carrying compiler diagnostics from the resolution passes to whoever
//!   renders them (`CompilerDiagnostic`, `DiagnosticSink`, `DiagnosticBag`)
//! - Loading the compiler configuration from TOML (`CompilerConfig`)
//!
//! ## Diagnostics
//!
//! Diagnostics are plain values pushed into a sink. The sink never aborts the
//! caller; deciding whether to continue after an error is the caller's job.
//! `CompilerDiagnostic` implements miette's `Diagnostic` so the command line
//! driver can render it with source context.

mod config;
mod diagnostic;
mod error;
mod location;

pub use config::{CompilerConfig, CompilerSection, DiagnosticsSection};
pub use diagnostic::{CompilerDiagnostic, DiagnosticBag, DiagnosticSink, Severity};
pub use error::ConfigError;
pub use location::Location;
