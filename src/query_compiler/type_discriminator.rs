//! Resolves the concrete variant of a polymorphic page.
//!
//! Variants are tried in schema order (person, organization, group). The
//! compiled form binds a string label per branch and returns the first one;
//! the resolved form picks the first candidate among an instance's types.
//! Neither form fails on inconsistent data: no match yields [`PageVariant::Unknown`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::CompileError;
use super::projection::{FetchField, FetchObject, ProjectionSpec};
use crate::schema_model::{EntityKind, SchemaModel};
use crate::typeql::{Constraint, Literal, Pattern, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageVariant {
    Person,
    Organization,
    Group,
    Unknown,
}

impl PageVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageVariant::Person => "person",
            PageVariant::Organization => "organization",
            PageVariant::Group => "group",
            PageVariant::Unknown => "unknown",
        }
    }

    pub fn from_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Person => PageVariant::Person,
            EntityKind::Organization => PageVariant::Organization,
            EntityKind::Group => PageVariant::Group,
            _ => PageVariant::Unknown,
        }
    }

    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            PageVariant::Person => Some(EntityKind::Person),
            PageVariant::Organization => Some(EntityKind::Organization),
            PageVariant::Group => Some(EntityKind::Group),
            PageVariant::Unknown => None,
        }
    }

    /// Read a discriminator field from a fetched document.
    pub fn from_document_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some(label) => label
                .parse::<EntityKind>()
                .map(PageVariant::from_kind)
                .unwrap_or(PageVariant::Unknown),
            None => PageVariant::Unknown,
        }
    }
}

impl fmt::Display for PageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct TypeDiscriminator<'a> {
    schema: &'a SchemaModel,
}

impl<'a> TypeDiscriminator<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        TypeDiscriminator { schema }
    }

    /// Ordered candidate variants for an abstract kind.
    pub fn candidates(&self, kind: EntityKind) -> Result<Vec<EntityKind>, CompileError> {
        let variants = self.schema.variants_of(kind);
        if variants.is_empty() {
            return Err(CompileError::NoVariants {
                kind: kind.label().to_string(),
            });
        }
        Ok(variants)
    }

    /// Sub-query binding the label of the first candidate `var` is an instance of.
    pub fn compile(&self, var: &Var, candidates: &[EntityKind]) -> Result<FetchField, CompileError> {
        let label = var.suffixed("type")?;
        let branches = candidates
            .iter()
            .map(|kind| {
                Pattern::new()
                    .with(Constraint::isa(var, kind.label()))
                    .with(Constraint::LetValue {
                        var: label.clone(),
                        value: Literal::String(kind.label().to_string()),
                    })
            })
            .collect();
        Ok(FetchField::FirstValue {
            pattern: Pattern::new().with(Constraint::Or(branches)),
            value: label,
        })
    }

    /// Standalone lookup of the variant of the `kind` instance keyed by `id`:
    /// one document with a single `type` field.
    pub fn compile_for_id(&self, kind: EntityKind, id: &str) -> Result<ProjectionSpec, CompileError> {
        let var = Var::new(kind.label())?;
        let key = self.schema.key_attribute(kind)?;
        let candidates = self.candidates(kind)?;
        let mut fields = FetchObject::new();
        fields.insert("type", self.compile(&var, &candidates)?);
        Ok(ProjectionSpec {
            root: Pattern::new()
                .with(Constraint::isa(&var, kind.label()))
                .with(Constraint::has_literal(&var, key.name, Literal::from(id))),
            root_var: var,
            fields,
        })
    }

    /// Pick the first candidate whose label is among the instance's types
    /// (which include supertypes, e.g. `["person", "profile", "page"]`).
    pub fn resolve(candidates: &[EntityKind], instance_types: &[&str]) -> PageVariant {
        candidates
            .iter()
            .find(|kind| instance_types.contains(&kind.label()))
            .map(|kind| PageVariant::from_kind(*kind))
            .unwrap_or(PageVariant::Unknown)
    }
}
