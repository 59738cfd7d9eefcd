//! A function's ordered parameter list.
//!
//! Declaration order matters: call sites check arity and types by
//! positional index, so an `IndexMap` — not a plain `HashMap` — is the
//! right structure for order-preserving lookups.

use indexmap::IndexMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub identifier: String,
    pub defined_type: String,
}

#[derive(Clone, Debug, Default)]
pub struct ParameterSet {
    elements: IndexMap<String, Parameter>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, identifier: &str) -> bool {
        self.elements.contains_key(identifier)
    }

    /// Returns `false` if `identifier` was already present (a duplicate
    /// parameter name), leaving the set unchanged.
    pub fn add(&mut self, identifier: &str, defined_type: &str) -> bool {
        if self.exists(identifier) {
            return false;
        }
        self.elements.insert(
            identifier.to_string(),
            Parameter {
                identifier: identifier.to_string(),
                defined_type: defined_type.to_string(),
            },
        );
        true
    }

    pub fn get(&self, identifier: &str) -> Option<&Parameter> {
        self.elements.get(identifier)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Parameter> {
        self.elements.get_index(index).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl std::fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .elements
            .values()
            .map(|p| format!("{} {}", p.defined_type, p.identifier))
            .collect();
        write!(f, "{}", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_duplicate_names() {
        let mut set = ParameterSet::new();
        assert!(set.add("a", "int"));
        assert!(!set.add("a", "float"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn preserves_declaration_order_for_by_index_lookup() {
        let mut set = ParameterSet::new();
        set.add("a", "int");
        set.add("b", "float");
        assert_eq!(set.get_by_index(0).unwrap().identifier, "a");
        assert_eq!(set.get_by_index(1).unwrap().identifier, "b");
    }
}
