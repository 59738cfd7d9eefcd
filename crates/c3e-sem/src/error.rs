use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemError {
    #[error("\"{0}\" already declared in this scope")]
    AlreadyDeclared(String),

    #[error("scope \"{0}\" is not a declared function")]
    UnknownFunctionScope(String),
}

pub type SemResult<T> = std::result::Result<T, SemError>;
