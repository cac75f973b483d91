//! Creation payloads: attribute values keyed by schema attribute label.

use serde_json::{Map, Value};

use super::errors::MutationError;
use crate::schema_model::{schema, AttributeDef, EntityKind, SchemaError};

#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Null,
    String(String),
    Boolean(bool),
    Long(i64),
    List(Vec<PayloadValue>),
}

impl PayloadValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PayloadValue::Null => "null",
            PayloadValue::String(_) => "string",
            PayloadValue::Boolean(_) => "boolean",
            PayloadValue::Long(_) => "long",
            PayloadValue::List(_) => "list",
        }
    }

    /// Absent for the purpose of emission: null, empty string or empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            PayloadValue::Null => true,
            PayloadValue::String(s) => s.is_empty(),
            PayloadValue::List(items) => items.is_empty(),
            PayloadValue::Boolean(_) | PayloadValue::Long(_) => false,
        }
    }

    fn from_json(attribute: &str, value: &Value) -> Result<Self, MutationError> {
        match value {
            Value::Null => Ok(PayloadValue::Null),
            Value::Bool(b) => Ok(PayloadValue::Boolean(*b)),
            Value::String(s) => Ok(PayloadValue::String(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(PayloadValue::Long)
                .ok_or_else(|| MutationError::invalid_value(attribute, "long", n.to_string())),
            Value::Array(items) => items
                .iter()
                .map(|item| PayloadValue::from_json(attribute, item))
                .collect::<Result<Vec<_>, _>>()
                .map(PayloadValue::List),
            Value::Object(_) => Err(MutationError::invalid_value(attribute, "scalar or list", "object")),
        }
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::String(value)
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::String(value.to_string())
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Boolean(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Long(value)
    }
}

impl<T: Into<PayloadValue>> From<Option<T>> for PayloadValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PayloadValue::Null)
    }
}

impl<T: Into<PayloadValue>> From<Vec<T>> for PayloadValue {
    fn from(values: Vec<T>) -> Self {
        PayloadValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Values for a new entity of `kind`, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationPayload {
    pub kind: EntityKind,
    values: Vec<(&'static str, PayloadValue)>,
}

impl CreationPayload {
    pub fn new(kind: EntityKind) -> Self {
        CreationPayload {
            kind,
            values: Vec::new(),
        }
    }

    /// Set the value of the attribute labelled `attribute`; a later value
    /// replaces an earlier one.
    pub fn set(&mut self, attribute: &'static str, value: impl Into<PayloadValue>) {
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == attribute) {
            Some(entry) => entry.1 = value,
            None => self.values.push((attribute, value)),
        }
    }

    pub fn with(mut self, attribute: &'static str, value: impl Into<PayloadValue>) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&PayloadValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == attribute)
            .map(|(_, v)| v)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(name, _)| *name)
    }

    /// Build a payload from a JSON object whose keys are field names
    /// (`profilePicture`), their snake_case form (`profile_picture`) or the
    /// attribute label itself (`profile-picture`). Abstract attributes cannot
    /// be set.
    pub fn from_json_object(kind: EntityKind, object: &Map<String, Value>) -> Result<Self, MutationError> {
        let attributes = schema().attributes_of(kind);
        let mut payload = CreationPayload::new(kind);
        for (key, value) in object {
            let attribute = resolve_key(&attributes, key)
                .ok_or_else(|| SchemaError::unknown_attribute(kind.label(), key.as_str()))?;
            payload.set(attribute.name, PayloadValue::from_json(attribute.name, value)?);
        }
        Ok(payload)
    }
}

fn resolve_key<'a>(attributes: &'a [AttributeDef], key: &str) -> Option<&'a AttributeDef> {
    attributes
        .iter()
        .filter(|a| !a.is_abstract)
        .find(|a| a.field == key || a.name == key || to_snake_case(a.field) == key)
}

fn to_snake_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for ch in field.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
