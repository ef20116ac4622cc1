//! Reporting of recovered per-method failures.

use std::fmt;

use crate::error::ValidationError;

/// A method that failed validation, identified by its `Lcls;->name(P)R`
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub method: String,
    pub error: ValidationError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.method, self.error)
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `log::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::error!(
            "Error while disassembling method {}. Continuing. ({})",
            diagnostic.method,
            diagnostic.error
        );
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
