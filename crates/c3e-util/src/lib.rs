//! Foundation types shared across the compiler: source spans and
//! structured diagnostics.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticCode, Handler, Level};
pub use span::{FileId, Span};
