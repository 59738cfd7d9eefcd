//! The coarse numeric type lattice used for the handful of type rules this
//! dialect enforces: no structs, arrays, or real coercion rules, just
//! {int, float, double, void, other}.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumericType {
    Int,
    Float,
    Double,
    Void,
    /// Anything outside the lattice (e.g. a type string the declaration
    /// carried verbatim). Participates in no arithmetic type rule and is
    /// always passed through unchanged.
    Other(String),
}

impl NumericType {
    /// Classifies a declared-type string such as `"int"`, `"unsigned int"`,
    /// or `"static long double"`. A modifier/specifier prefix does not
    /// change the base numeric classification — only the last type-bearing
    /// word does, mirroring `check_expression_element`'s
    /// `'int' in identifier.defined_type` style substring checks.
    pub fn classify(defined_type: &str) -> NumericType {
        if defined_type.contains("double") {
            NumericType::Double
        } else if defined_type.contains("float") {
            NumericType::Float
        } else if defined_type.contains("int") {
            NumericType::Int
        } else if defined_type == "void" {
            NumericType::Void
        } else {
            NumericType::Other(defined_type.to_string())
        }
    }

    pub fn is_in_lattice(&self) -> bool {
        matches!(self, NumericType::Int | NumericType::Float | NumericType::Double)
    }

    pub fn as_str(&self) -> &str {
        match self {
            NumericType::Int => "int",
            NumericType::Float => "float",
            NumericType::Double => "double",
            NumericType::Void => "void",
            NumericType::Other(s) => s,
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The binary-operator result-type rule: when both operands are in
/// `{int, float, double}`, equal types pass through, and a mismatch
/// resolves to `double` if either side is `double`, else `float`.
/// Outside the lattice, the left operand's type passes through unchanged
/// (the unary-operator / single-operand case).
pub fn resulting_type(left: &NumericType, right: &NumericType) -> NumericType {
    if left.is_in_lattice() && right.is_in_lattice() {
        if left == right {
            left.clone()
        } else if *left == NumericType::Double || *right == NumericType::Double {
            NumericType::Double
        } else {
            NumericType::Float
        }
    } else {
        left.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_reads_the_base_type_word() {
        assert_eq!(NumericType::classify("int"), NumericType::Int);
        assert_eq!(NumericType::classify("unsigned int"), NumericType::Int);
        assert_eq!(NumericType::classify("float"), NumericType::Float);
        assert_eq!(NumericType::classify("double"), NumericType::Double);
        assert_eq!(NumericType::classify("void"), NumericType::Void);
        assert_eq!(
            NumericType::classify("boolean"),
            NumericType::Other("boolean".into())
        );
    }

    #[test]
    fn resulting_type_prefers_double_then_float_then_equal() {
        assert_eq!(resulting_type(&NumericType::Int, &NumericType::Int), NumericType::Int);
        assert_eq!(
            resulting_type(&NumericType::Int, &NumericType::Double),
            NumericType::Double
        );
        assert_eq!(
            resulting_type(&NumericType::Float, &NumericType::Int),
            NumericType::Float
        );
    }

    #[test]
    fn resulting_type_passes_through_outside_the_lattice() {
        let other = NumericType::Other("boolean".into());
        assert_eq!(resulting_type(&other, &NumericType::Int), other);
    }
}
