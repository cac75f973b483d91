//! Insert statement construction for creation payloads.

use super::errors::MutationError;
use super::payload::{CreationPayload, PayloadValue};
use crate::schema_model::{AttributeDef, EntityKind, SchemaError, SchemaModel, ValueType};
use crate::typeql::{Literal, Var};

pub struct MutationBuilder<'a> {
    schema: &'a SchemaModel,
}

impl<'a> MutationBuilder<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        MutationBuilder { schema }
    }

    /// `insert $kind isa kind, has a "x", has b true;` with attributes in
    /// schema order. Required attributes must be present; optional ones are
    /// emitted only when non-empty; lists emit one clause per element in
    /// payload order.
    pub fn build(&self, payload: &CreationPayload) -> Result<String, MutationError> {
        let kind = payload.kind;
        self.validate(payload)?;

        let var = Var::new(kind.label())?;
        let mut clauses = vec![format!("{} isa {}", var, kind.label())];
        for attribute in self.insertable(kind) {
            let Some(value) = payload.get(attribute.name) else {
                continue;
            };
            for literal in to_literals(&attribute, value)? {
                clauses.push(format!("has {} {}", attribute.name, literal));
            }
        }

        let statement = format!("insert {};", clauses.join(", "));
        log::debug!("Built insert for {}: {}", kind, statement);
        Ok(statement)
    }

    /// Reject payloads that would produce an incomplete or foreign insert.
    pub fn validate(&self, payload: &CreationPayload) -> Result<(), MutationError> {
        let kind = payload.kind;
        if kind.is_abstract() {
            return Err(SchemaError::AbstractKind {
                kind: kind.label().to_string(),
            }
            .into());
        }

        let insertable = self.insertable(kind);
        for name in payload.attributes() {
            if !insertable.iter().any(|a| a.name == name) {
                return Err(SchemaError::unknown_attribute(kind.label(), name).into());
            }
        }

        for attribute in insertable.iter().filter(|a| a.required) {
            let present = payload
                .get(attribute.name)
                .is_some_and(|v| !matches!(v, PayloadValue::Null));
            if !present {
                return Err(MutationError::MissingRequiredField {
                    kind: kind.label().to_string(),
                    field: attribute.field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn insertable(&self, kind: EntityKind) -> Vec<AttributeDef> {
        self.schema
            .attributes_of(kind)
            .into_iter()
            .filter(|a| !a.is_abstract)
            .collect()
    }
}

fn to_literals(attribute: &AttributeDef, value: &PayloadValue) -> Result<Vec<Literal>, MutationError> {
    match value {
        // One clause per element, empty strings included.
        PayloadValue::List(items) if attribute.is_multi() => items
            .iter()
            .map(|item| to_literal(attribute, item))
            .collect(),
        PayloadValue::List(_) => Err(MutationError::invalid_value(
            attribute.name,
            attribute.value_type.to_string(),
            value.type_name(),
        )),
        // Required strings are emitted even when empty.
        PayloadValue::String(s) if s.is_empty() && attribute.required => {
            Ok(vec![Literal::String(String::new())])
        }
        v if v.is_empty() => Ok(Vec::new()),
        v => Ok(vec![to_literal(attribute, v)?]),
    }
}

fn to_literal(attribute: &AttributeDef, value: &PayloadValue) -> Result<Literal, MutationError> {
    let mismatch = || {
        MutationError::invalid_value(
            attribute.name,
            attribute.value_type.to_string(),
            value.type_name(),
        )
    };
    match (attribute.value_type, value) {
        (ValueType::String, PayloadValue::String(s)) => Ok(Literal::String(s.clone())),
        (ValueType::Boolean, PayloadValue::Boolean(b)) => Ok(Literal::Boolean(*b)),
        (ValueType::Boolean, PayloadValue::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(Literal::Boolean(true)),
            "false" => Ok(Literal::Boolean(false)),
            _ => Err(mismatch()),
        },
        (ValueType::Long, PayloadValue::Long(n)) => Ok(Literal::Long(*n)),
        (ValueType::DateTime, PayloadValue::String(s)) => Ok(Literal::parse_datetime(s)?),
        _ => Err(mismatch()),
    }
}
