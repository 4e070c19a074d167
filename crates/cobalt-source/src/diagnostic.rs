//! Diagnostic values and the sink they are reported through.
//!
//! The resolution passes report every problem as a `CompilerDiagnostic`
//! carrying a stable numeric code. Reporting never aborts anything; the
//! caller that reported decides whether to keep going.

use std::fmt;

use fxhash::FxHashSet;
use miette::{Diagnostic, LabeledSpan};

use crate::config::CompilerConfig;
use crate::location::Location;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl From<Severity> for miette::Severity {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    pub severity: Severity,
    /// Stable diagnostic number. Negative numbers are compiler-specific
    /// checks with no standard equivalent.
    pub code: i32,
    /// Warning level (1-4). Always 0 for errors.
    pub level: u8,
    pub location: Location,
    pub message: String,
}

impl CompilerDiagnostic {
    pub fn error(code: i32, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            level: 0,
            location,
            message: message.into(),
        }
    }

    pub fn warning(code: i32, level: u8, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            level,
            location,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The code as printed, e.g. `CS0111`, or the bare number for
    /// negative codes.
    pub fn code_string(&self) -> String {
        if self.code < 0 {
            self.code.to_string()
        } else {
            format!("CS{:04}", self.code)
        }
    }
}

impl fmt::Display for CompilerDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.location,
            self.severity,
            self.code_string(),
            self.message
        )
    }
}

impl std::error::Error for CompilerDiagnostic {}

impl Diagnostic for CompilerDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_string()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity.into())
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.location.length == 0 {
            return None;
        }
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            None,
            self.location,
        ))))
    }
}

/// Receives diagnostics as they are produced.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: CompilerDiagnostic);
}

/// A sink that keeps every diagnostic, after applying the warning filters
/// from the configuration.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<CompilerDiagnostic>,
    warning_level: u8,
    warnings_as_errors: bool,
    suppressed: FxHashSet<i32>,
}

impl DiagnosticBag {
    /// A bag that keeps everything.
    pub fn new() -> Self {
        Self {
            warning_level: crate::config::MAX_WARNING_LEVEL,
            ..Default::default()
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            diagnostics: Vec::new(),
            warning_level: config.diagnostics.warning_level,
            warnings_as_errors: config.diagnostics.warnings_as_errors,
            suppressed: config.suppressed_codes(),
        }
    }

    pub fn diagnostics(&self) -> &[CompilerDiagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<CompilerDiagnostic> {
        self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(CompilerDiagnostic::is_error)
    }

    /// Codes of every kept diagnostic, in report order.
    pub fn codes(&self) -> Vec<i32> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    pub fn with_code(&self, code: i32) -> impl Iterator<Item = &CompilerDiagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn report(&mut self, mut diagnostic: CompilerDiagnostic) {
        if diagnostic.severity == Severity::Warning {
            if diagnostic.level > self.warning_level || self.suppressed.contains(&diagnostic.code) {
                log::trace!("Dropping warning {}: {}", diagnostic.code, diagnostic.message);
                return;
            }
            if self.warnings_as_errors {
                diagnostic.severity = Severity::Error;
            }
        }
        log::debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
