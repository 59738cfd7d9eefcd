//! Fuses parsing, scope/type resolution, and C3E code generation into one
//! recursive-descent traversal over a token stream, producing a populated
//! symbol table, the lowered instruction stream, and any accumulated
//! implicit-conversion warnings.
//!
//! This dialect's grammar is restricted enough (no forward references, no
//! nested scopes, no multi-pass type inference) that threading synthesized
//! and inherited attributes through a single traversal is the more direct
//! design — there is no intermediate tree to build or walk twice.

mod analyzer;
mod cursor;
mod expr;
mod items;
mod production;
mod stmt;

pub use analyzer::{analyze, Analyzer, CompiledProgram};
pub use production::{FatalError, Production};
