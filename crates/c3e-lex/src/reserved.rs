//! The closed reserved-word set for this dialect.
//!
//! Deliberately narrower than a typical Arduino-flavored C++ dialect: board
//! constants (`HIGH`, `LOW`, ...) and keyword-operators (`and`, `bitand`,
//! ...) have no place in this reserved-word table.

pub const MODIFIERS: &[&str] = &["auto", "extern", "register", "static"];
pub const SPECIFIERS: &[&str] = &["long", "short", "signed", "unsigned"];
pub const TYPES: &[&str] = &["boolean", "char", "double", "float", "int", "word"];
pub const CONTROL: &[&str] = &[
    "if", "else", "while", "do", "for", "break", "continue", "return", "true", "false",
];

pub fn is_reserved_word(lexeme: &str) -> bool {
    MODIFIERS.contains(&lexeme)
        || SPECIFIERS.contains(&lexeme)
        || TYPES.contains(&lexeme)
        || lexeme == "void"
        || CONTROL.contains(&lexeme)
}

pub fn is_type_word(lexeme: &str) -> bool {
    TYPES.contains(&lexeme)
}

pub fn is_return_type_word(lexeme: &str) -> bool {
    TYPES.contains(&lexeme) || lexeme == "void"
}

pub fn is_modifier(lexeme: &str) -> bool {
    MODIFIERS.contains(&lexeme)
}

pub fn is_specifier(lexeme: &str) -> bool {
    SPECIFIERS.contains(&lexeme)
}
