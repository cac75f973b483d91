//! # Schema Model Error Types
//!
//! Every variant here is a programmer error: the compiled-in registry does not
//! know a kind, attribute, relation or role that some caller asked for. These
//! surface as `SchemaMismatch` at the HTTP boundary and never reach a caller in
//! normal operation.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("No entity kind found for label `{label}`")]
    UnknownKind { label: String },
    #[error("Attribute `{attribute}` is not owned by `{kind}`")]
    UnknownAttribute { kind: String, attribute: String },
    #[error("No relation schema found for `{relation}`")]
    UnknownRelation { relation: String },
    #[error("`{kind}` does not play `{relation}:{role}`")]
    RoleNotPlayed {
        kind: String,
        relation: String,
        role: String,
    },
    #[error("`{kind}` is abstract and has no instances of its own")]
    AbstractKind { kind: String },
}

impl SchemaError {
    pub fn unknown_attribute(kind: impl Into<String>, attribute: impl Into<String>) -> Self {
        SchemaError::UnknownAttribute {
            kind: kind.into(),
            attribute: attribute.into(),
        }
    }

    pub fn role_not_played(
        kind: impl Into<String>,
        relation: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        SchemaError::RoleNotPlayed {
            kind: kind.into(),
            relation: relation.into(),
            role: role.into(),
        }
    }
}
