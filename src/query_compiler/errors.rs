use thiserror::Error;

use crate::schema_model::SchemaError;
use crate::typeql::TypeQlError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Schema mismatch: {0}")]
    Schema(#[from] SchemaError),
    #[error("Statement construction failed: {0}")]
    TypeQl(#[from] TypeQlError),
    #[error("`{kind}` has no concrete variants to discriminate between")]
    NoVariants { kind: String },
}

/// Why a walk up the place hierarchy could not reach a root.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HierarchyError {
    #[error("Place `{0}` is not part of the hierarchy")]
    UnknownPlace(String),
    #[error("Place hierarchy contains a cycle through `{place_id}`")]
    Cycle { place_id: String },
    #[error("Place hierarchy is deeper than the configured limit of {max_depth} levels")]
    DepthExceeded { max_depth: usize },
}
