//! Structured diagnostics.
//!
//! Errors and warnings are typed records rather than raw strings, each
//! carrying a [`Span`] and a stable [`DiagnosticCode`] so tests can match on
//! the code instead of the rendered message. The first [`Level::Error`]
//! diagnostic halts a compilation; [`Level::Warning`] diagnostics accumulate
//! in a [`Handler`] and are drained once, at the end.

use crate::span::Span;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticCode(pub &'static str);

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const E_EOF: DiagnosticCode = DiagnosticCode("E0001");
pub const E_SYNTAX: DiagnosticCode = DiagnosticCode("E0002");
pub const E_MULTIPLE_DECLARATION: DiagnosticCode = DiagnosticCode("E0003");
pub const E_UNDECLARED: DiagnosticCode = DiagnosticCode("E0004");
pub const E_INVALID_TYPE: DiagnosticCode = DiagnosticCode("E0005");
pub const E_INVALID_OPERANDS: DiagnosticCode = DiagnosticCode("E0006");
pub const E_RETURN_OUT_OF_FUNCTION: DiagnosticCode = DiagnosticCode("E0007");
pub const E_UNEXPECTED_PARAMETER: DiagnosticCode = DiagnosticCode("E0008");
pub const W_IMPLICIT_CONVERSION: DiagnosticCode = DiagnosticCode("W0001");

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub code: DiagnosticCode,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            span,
            code,
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
            span,
            code,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} [{}L - {}C]",
            self.level, self.message, self.span.line, self.span.column
        )
    }
}

/// Collects warnings for one compilation.
///
/// There is no error-collection side: a fatal diagnostic is returned as an
/// `Err` from the point it was raised and unwinds the call stack directly,
/// matching the "first error wins, no recovery" policy.
#[derive(Default)]
pub struct Handler {
    warnings: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_warning(&mut self, diagnostic: Diagnostic) {
        debug_assert_eq!(diagnostic.level, Level::Warning);
        self.warnings.push(diagnostic);
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_reference_format() {
        let d = Diagnostic::error(E_UNDECLARED, "\"y\" undeclared.", Span::new(1, 5));
        assert_eq!(d.to_string(), "error - \"y\" undeclared. [1L - 5C]");
    }

    #[test]
    fn handler_accumulates_warnings_in_order() {
        let mut h = Handler::new();
        h.push_warning(Diagnostic::warning(W_IMPLICIT_CONVERSION, "a", Span::DUMMY));
        h.push_warning(Diagnostic::warning(W_IMPLICIT_CONVERSION, "b", Span::DUMMY));
        assert_eq!(h.warnings().len(), 2);
        assert_eq!(h.warnings()[0].message, "a");
        assert_eq!(h.warnings()[1].message, "b");
    }
}
