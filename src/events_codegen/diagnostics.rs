//! Structured diagnostics collected during one generation pass.
//!
//! Every record is mirrored to the `log` facade so `RUST_LOG` shows the same
//! information the caller receives in `GenerationOutput::diagnostics`.

use std::fmt;

use crate::events_codegen::event::InstructionPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Instruction being generated when the diagnostic was raised, if any
    pub location: Option<InstructionPath>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {}: {}", self.severity, location, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>, location: Option<InstructionPath>) {
        self.push(Severity::Warning, message.into(), location);
    }

    pub fn error(&mut self, message: impl Into<String>, location: Option<InstructionPath>) {
        self.push(Severity::Error, message.into(), location);
    }

    fn push(&mut self, severity: Severity, message: String, location: Option<InstructionPath>) {
        let diagnostic = Diagnostic {
            severity,
            message,
            location,
        };
        match severity {
            Severity::Warning => log::warn!("{}", diagnostic),
            Severity::Error => log::error!("{}", diagnostic),
        }
        self.records.push(diagnostic);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
