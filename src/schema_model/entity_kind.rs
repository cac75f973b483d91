use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::SchemaError;

/// Every node kind the social network knows about.
///
/// `Page` and `Profile` are abstract: an instance is always also exactly one
/// of their concrete sub-kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Page,
    Profile,
    Person,
    Organization,
    Group,
    Post,
    ImagePost,
    Comment,
    Place,
    Reaction,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Page,
        EntityKind::Profile,
        EntityKind::Person,
        EntityKind::Organization,
        EntityKind::Group,
        EntityKind::Post,
        EntityKind::ImagePost,
        EntityKind::Comment,
        EntityKind::Place,
        EntityKind::Reaction,
    ];

    /// Type label in the knowledge base.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Page => "page",
            EntityKind::Profile => "profile",
            EntityKind::Person => "person",
            EntityKind::Organization => "organization",
            EntityKind::Group => "group",
            EntityKind::Post => "post",
            EntityKind::ImagePost => "image-post",
            EntityKind::Comment => "comment",
            EntityKind::Place => "place",
            EntityKind::Reaction => "reaction",
        }
    }

    /// Direct super-kind, if any.
    pub fn parent(&self) -> Option<EntityKind> {
        match self {
            EntityKind::Profile | EntityKind::Group => Some(EntityKind::Page),
            EntityKind::Person | EntityKind::Organization => Some(EntityKind::Profile),
            EntityKind::ImagePost => Some(EntityKind::Post),
            _ => None,
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, EntityKind::Page | EntityKind::Profile)
    }

    /// Ancestors from the root down to (and including) `self`.
    pub fn lineage(&self) -> Vec<EntityKind> {
        let mut chain = vec![*self];
        let mut current = *self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// True when `self` is `other` or one of its sub-kinds.
    pub fn is_a(&self, other: EntityKind) -> bool {
        self.lineage().contains(&other)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = SchemaError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.label() == label)
            .ok_or_else(|| SchemaError::UnknownKind {
                label: label.to_string(),
            })
    }
}

/// Value type of an attribute, which decides how its literals are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Boolean,
    Long,
    DateTime,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Long => "long",
            ValueType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeDef {
    /// Attribute type label, e.g. `profile-picture`
    pub name: &'static str,
    /// Key used for this attribute in fetched documents and creation payloads
    pub field: &'static str,
    pub value_type: ValueType,
    pub required: bool,
    pub cardinality: Cardinality,
    /// Abstract attributes are only ever read; sub-kinds insert a concrete subtype.
    pub is_abstract: bool,
}

impl AttributeDef {
    pub const fn required(name: &'static str, field: &'static str, value_type: ValueType) -> Self {
        AttributeDef {
            name,
            field,
            value_type,
            required: true,
            cardinality: Cardinality::Single,
            is_abstract: false,
        }
    }

    pub const fn optional(name: &'static str, field: &'static str, value_type: ValueType) -> Self {
        AttributeDef {
            name,
            field,
            value_type,
            required: false,
            cardinality: Cardinality::Single,
            is_abstract: false,
        }
    }

    pub const fn multi(name: &'static str, field: &'static str, value_type: ValueType) -> Self {
        AttributeDef {
            name,
            field,
            value_type,
            required: false,
            cardinality: Cardinality::Multi,
            is_abstract: false,
        }
    }

    pub const fn abstract_key(name: &'static str, field: &'static str) -> Self {
        AttributeDef {
            name,
            field,
            value_type: ValueType::String,
            required: false,
            cardinality: Cardinality::Single,
            is_abstract: true,
        }
    }

    pub fn is_multi(&self) -> bool {
        self.cardinality == Cardinality::Multi
    }
}
