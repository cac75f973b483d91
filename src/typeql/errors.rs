use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeQlError {
    #[error("Invalid variable name `{0}` (allowed: letters, digits, '_' and '-', not starting with a digit or '-')")]
    InvalidVariable(String),
    #[error("Invalid datetime literal `{0}` (expected ISO 8601, e.g. 2024-05-01T12:30:00)")]
    InvalidDateTime(String),
}
