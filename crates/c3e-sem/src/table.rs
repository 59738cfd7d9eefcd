//! The two-level symbol table: one global scope plus exactly one inner
//! scope per function, no block-level sub-scoping.
//!
//! Enforces same-scope-only duplicate rejection and a
//! locals -> parameters -> global lookup order, behind a narrow,
//! intention-revealing API rather than an arbitrarily-deep scope tree —
//! this table's scoping is fixed at exactly two levels, never nested.

use crate::error::{SemError, SemResult};
use crate::parameters::{Parameter, ParameterSet};
use indexmap::IndexMap;

pub const GLOBAL_SCOPE: &str = "_global_";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub identifier: String,
    pub defined_type: String,
}

#[derive(Clone, Debug)]
pub struct FunctionSymbol {
    pub identifier: String,
    pub defined_type: String,
    pub parameters: ParameterSet,
    locals: IndexMap<String, Variable>,
}

impl FunctionSymbol {
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

#[derive(Clone, Debug)]
pub enum Entry {
    Function(FunctionSymbol),
    Variable(Variable),
}

impl Entry {
    pub fn defined_type(&self) -> &str {
        match self {
            Entry::Function(f) => &f.defined_type,
            Entry::Variable(v) => &v.defined_type,
        }
    }
}

#[derive(Default, Debug)]
pub struct SymbolTable {
    globals: IndexMap<String, Entry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a name in `_global_` scope: either a variable or a function
    /// (with an empty parameter list and no locals yet — callers fill those
    /// in via [`add_parameter`](Self::add_parameter) and
    /// [`add_local`](Self::add_local) as the declaration is parsed).
    pub fn add_global(&mut self, identifier: &str, defined_type: &str, is_function: bool) -> SemResult<()> {
        if self.globals.contains_key(identifier) {
            return Err(SemError::AlreadyDeclared(identifier.to_string()));
        }
        let entry = if is_function {
            Entry::Function(FunctionSymbol {
                identifier: identifier.to_string(),
                defined_type: defined_type.to_string(),
                parameters: ParameterSet::new(),
                locals: IndexMap::new(),
            })
        } else {
            Entry::Variable(Variable {
                identifier: identifier.to_string(),
                defined_type: defined_type.to_string(),
            })
        };
        self.globals.insert(identifier.to_string(), entry);
        Ok(())
    }

    fn function_mut(&mut self, scope: &str) -> SemResult<&mut FunctionSymbol> {
        match self.globals.get_mut(scope) {
            Some(Entry::Function(f)) => Ok(f),
            _ => Err(SemError::UnknownFunctionScope(scope.to_string())),
        }
    }

    fn function(&self, scope: &str) -> Option<&FunctionSymbol> {
        match self.globals.get(scope) {
            Some(Entry::Function(f)) => Some(f),
            _ => None,
        }
    }

    pub fn add_parameter(&mut self, scope: &str, identifier: &str, defined_type: &str) -> SemResult<()> {
        let f = self.function_mut(scope)?;
        if f.parameters.add(identifier, defined_type) {
            Ok(())
        } else {
            Err(SemError::AlreadyDeclared(identifier.to_string()))
        }
    }

    /// Rejects if `identifier` already names a local *or* a parameter of
    /// `scope` — a local may not shadow its own function's parameter, only
    /// a global.
    pub fn add_local(&mut self, scope: &str, identifier: &str, defined_type: &str) -> SemResult<()> {
        let f = self.function_mut(scope)?;
        if f.locals.contains_key(identifier) || f.parameters.exists(identifier) {
            return Err(SemError::AlreadyDeclared(identifier.to_string()));
        }
        f.locals.insert(
            identifier.to_string(),
            Variable {
                identifier: identifier.to_string(),
                defined_type: defined_type.to_string(),
            },
        );
        Ok(())
    }

    /// Scope-local membership test, optionally falling back to global.
    pub fn exists(&self, identifier: &str, scope: &str, try_global: bool) -> bool {
        if scope != GLOBAL_SCOPE {
            if let Some(f) = self.function(scope) {
                if f.locals.contains_key(identifier) || f.parameters.exists(identifier) {
                    return true;
                }
            }
        }
        if try_global || scope == GLOBAL_SCOPE {
            self.globals.contains_key(identifier)
        } else {
            false
        }
    }

    /// locals(scope) -> parameters(scope) -> globals.
    pub fn get(&self, identifier: &str, scope: &str) -> Option<&str> {
        if scope != GLOBAL_SCOPE {
            if let Some(f) = self.function(scope) {
                if let Some(v) = f.locals.get(identifier) {
                    return Some(&v.defined_type);
                }
                if let Some(p) = f.parameters.get(identifier) {
                    return Some(&p.defined_type);
                }
            }
        }
        self.globals.get(identifier).map(Entry::defined_type)
    }

    /// Renames a local or parameter reference to `"<scope>_<identifier>"`;
    /// leaves globals bare and leaves anything already containing `#`
    /// (a temporary or label) untouched.
    pub fn get_localized_identifier(&self, identifier: &str, scope: &str) -> String {
        if identifier.contains('#') {
            return identifier.to_string();
        }
        if scope != GLOBAL_SCOPE {
            if let Some(f) = self.function(scope) {
                if f.locals.contains_key(identifier) || f.parameters.exists(identifier) {
                    return format!("{scope}_{identifier}");
                }
            }
        }
        identifier.to_string()
    }

    pub fn function_entry(&self, name: &str) -> Option<&FunctionSymbol> {
        self.function(name)
    }

    pub fn parameter_count(&self, function: &str) -> usize {
        self.function(function).map_or(0, FunctionSymbol::parameter_count)
    }

    pub fn parameter_at(&self, function: &str, index: usize) -> Option<&Parameter> {
        self.function(function).and_then(|f| f.parameters.get_by_index(index))
    }

    pub fn is_function(&self, name: &str) -> bool {
        matches!(self.globals.get(name), Some(Entry::Function(_)))
    }

    /// Functions first, then variables, in declaration order within each
    /// group — matching `SymbolsTable.print_all`'s two-pass filter.
    pub fn print_all(&self) -> String {
        let mut lines = Vec::new();
        for entry in self.globals.values() {
            if let Entry::Function(f) = entry {
                lines.push(format!(
                    "{} {} ({}) {{{}}}",
                    f.defined_type,
                    f.identifier,
                    f.parameters,
                    f.locals
                        .values()
                        .map(|v| format!("{} {}", v.defined_type, v.identifier))
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }
        for entry in self.globals.values() {
            if let Entry::Variable(v) = entry {
                lines.push(format!("{} {}", v.defined_type, v.identifier));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_in_same_scope_only() {
        let mut t = SymbolTable::new();
        t.add_global("x", "int", false).unwrap();
        assert!(t.add_global("x", "float", false).is_err());
        t.add_global("f", "void", true).unwrap();
        // shadowing a global with a local of the same name is fine
        assert!(t.add_local("f", "x", "int").is_ok());
    }

    #[test]
    fn local_may_not_collide_with_its_own_parameter() {
        let mut t = SymbolTable::new();
        t.add_global("f", "void", true).unwrap();
        t.add_parameter("f", "a", "int").unwrap();
        assert!(t.add_local("f", "a", "float").is_err());
    }

    #[test]
    fn lookup_order_is_locals_then_parameters_then_global() {
        let mut t = SymbolTable::new();
        t.add_global("x", "int", false).unwrap();
        t.add_global("f", "void", true).unwrap();
        t.add_parameter("f", "x", "float").unwrap();
        // parameter shadows the global from inside f
        assert_eq!(t.get("x", "f"), Some("float"));
        // but not outside it
        assert_eq!(t.get("x", GLOBAL_SCOPE), Some("int"));

        t.add_local("f", "x", "double").unwrap_err(); // collides with parameter
    }

    #[test]
    fn localized_identifier_prefixes_locals_and_parameters_only() {
        let mut t = SymbolTable::new();
        t.add_global("g", "int", false).unwrap();
        t.add_global("f", "void", true).unwrap();
        t.add_parameter("f", "a", "int").unwrap();
        t.add_local("f", "b", "int").unwrap();

        assert_eq!(t.get_localized_identifier("g", "f"), "g");
        assert_eq!(t.get_localized_identifier("a", "f"), "f_a");
        assert_eq!(t.get_localized_identifier("b", "f"), "f_b");
        assert_eq!(t.get_localized_identifier("#T3", "f"), "#T3");
    }

    #[test]
    fn exists_respects_try_global_flag() {
        let mut t = SymbolTable::new();
        t.add_global("g", "int", false).unwrap();
        t.add_global("f", "void", true).unwrap();
        assert!(t.exists("g", "f", true));
        assert!(!t.exists("g", "f", false));
    }
}
