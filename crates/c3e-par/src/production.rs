//! The attribute record synthesized by every grammar production: a place,
//! an optional assignment operator, a coarse type, and a code fragment,
//! gathered into one struct with explicit optional fields rather than a
//! free-form dynamic-attribute bag.

use c3e_ir::Code;
use c3e_sem::NumericType;
use c3e_util::Diagnostic;

/// A single compilation's one fatal diagnostic, propagated as an ordinary
/// `Err` up through the recursive-descent call stack rather than a panic
/// or a process exit — the library stays embeddable and testable.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{0}")]
pub struct FatalError(pub Diagnostic);

/// `place` and `production_type` are absent for pure statement productions
/// (loops, ifs, declarations) which contribute only `code`.
#[derive(Debug, Default)]
pub struct Production {
    pub place: Option<String>,
    pub operator: Option<String>,
    pub production_type: Option<NumericType>,
    pub code: Code,
}
