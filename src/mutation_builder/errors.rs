use thiserror::Error;

use crate::schema_model::SchemaError;
use crate::typeql::TypeQlError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MutationError {
    #[error("Missing required field `{field}` for `{kind}`")]
    MissingRequiredField { kind: String, field: String },
    #[error("Invalid value for `{attribute}`: expected {expected}, found {found}")]
    InvalidValue {
        attribute: String,
        expected: String,
        found: String,
    },
    #[error("Schema mismatch: {0}")]
    Schema(#[from] SchemaError),
    #[error("Statement construction failed: {0}")]
    TypeQl(#[from] TypeQlError),
}

impl MutationError {
    pub fn invalid_value(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        MutationError::InvalidValue {
            attribute: attribute.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
