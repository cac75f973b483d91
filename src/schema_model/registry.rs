//! Static registry of the social network schema.
//!
//! Attribute declarations live on the kind that owns them; sub-kinds inherit
//! them. Variant order follows [`EntityKind::ALL`], so `variants_of(Page)` is
//! person, organization, group.

use std::collections::HashMap;

use serde::Serialize;

use super::entity_kind::{AttributeDef, EntityKind, ValueType};
use super::errors::SchemaError;

#[derive(Debug, Clone, Serialize)]
pub struct RoleDef {
    pub name: &'static str,
    /// Most general kinds allowed to play this role
    pub players: Vec<EntityKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationDef {
    pub name: &'static str,
    pub roles: Vec<RoleDef>,
}

impl RelationDef {
    pub fn role(&self, role: &str) -> Option<&RoleDef> {
        self.roles.iter().find(|r| r.name == role)
    }
}

/// One `(relation, role)` pair a kind can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Participation {
    pub relation: &'static str,
    pub role: &'static str,
}

/// An attribute that only exists on narrower kinds than the one being projected.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantAttribute {
    pub attribute: AttributeDef,
    /// Kinds that declare the attribute, in variant order
    pub declared_on: Vec<EntityKind>,
}

#[derive(Debug)]
pub struct SchemaModel {
    declared: HashMap<EntityKind, Vec<AttributeDef>>,
    keys: HashMap<EntityKind, &'static str>,
    relations: Vec<RelationDef>,
}

lazy_static::lazy_static! {
    static ref SOCIAL_NETWORK_SCHEMA: SchemaModel = SchemaModel::social_network();
}

/// The process-wide schema.
pub fn schema() -> &'static SchemaModel {
    &SOCIAL_NETWORK_SCHEMA
}

impl SchemaModel {
    fn social_network() -> Self {
        use EntityKind::*;
        use ValueType::*;

        let mut declared = HashMap::new();
        declared.insert(
            Page,
            vec![
                AttributeDef::abstract_key("page-id", "id"),
                AttributeDef::required("name", "name", String),
                AttributeDef::required("bio", "bio", String),
                AttributeDef::optional("profile-picture", "profilePicture", String),
                AttributeDef::optional("badge", "badge", String),
                AttributeDef::required("is-active", "isActive", Boolean),
            ],
        );
        declared.insert(
            Profile,
            vec![
                AttributeDef::required("username", "username", String),
                AttributeDef::required("can-publish", "canPublish", Boolean),
            ],
        );
        declared.insert(
            Person,
            vec![
                AttributeDef::required("gender", "gender", String),
                AttributeDef::optional("language", "language", String),
                AttributeDef::required("email", "email", String),
                AttributeDef::optional("phone", "phone", String),
                AttributeDef::optional("relationship-status", "relationshipStatus", String),
                AttributeDef::required("page-visibility", "pageVisibility", String),
                AttributeDef::required("post-visibility", "postVisibility", String),
            ],
        );
        declared.insert(
            Organization,
            vec![AttributeDef::multi("tag", "tags", String)],
        );
        declared.insert(
            Group,
            vec![
                AttributeDef::required("group-id", "groupId", String),
                AttributeDef::required("page-visibility", "pageVisibility", String),
                AttributeDef::required("post-visibility", "postVisibility", String),
                AttributeDef::multi("tag", "tags", String),
            ],
        );
        declared.insert(
            Post,
            vec![
                AttributeDef::required("post-id", "postId", String),
                AttributeDef::required("post-text", "postText", String),
                AttributeDef::required("post-visibility", "postVisibility", String),
                AttributeDef::optional("language", "language", String),
                AttributeDef::multi("tag", "tags", String),
                AttributeDef::required("is-visible", "isVisible", Boolean),
                AttributeDef::required("creation-timestamp", "creationTimestamp", DateTime),
            ],
        );
        declared.insert(
            ImagePost,
            vec![AttributeDef::required("post-image", "postImage", String)],
        );
        declared.insert(
            Comment,
            vec![
                AttributeDef::required("comment-id", "commentId", String),
                AttributeDef::required("comment-text", "commentText", String),
                AttributeDef::required("is-visible", "isVisible", Boolean),
                AttributeDef::required("creation-timestamp", "creationTimestamp", DateTime),
            ],
        );
        declared.insert(
            Place,
            vec![
                AttributeDef::required("place-id", "placeId", String),
                AttributeDef::required("name", "name", String),
            ],
        );
        declared.insert(
            Reaction,
            vec![
                AttributeDef::required("emoji", "emoji", String),
                AttributeDef::optional("creation-timestamp", "creationTimestamp", DateTime),
            ],
        );

        let keys = HashMap::from([
            (Page, "page-id"),
            (Profile, "username"),
            (Group, "group-id"),
            (Post, "post-id"),
            (Comment, "comment-id"),
            (Place, "place-id"),
        ]);

        let role = |name, players: &[EntityKind]| RoleDef {
            name,
            players: players.to_vec(),
        };
        let relations = vec![
            RelationDef {
                name: "friendship",
                roles: vec![role("friend", &[Page])],
            },
            RelationDef {
                name: "following",
                roles: vec![role("page", &[Page]), role("follower", &[Page])],
            },
            RelationDef {
                name: "posting",
                roles: vec![role("page", &[Page]), role("post", &[Post])],
            },
            RelationDef {
                name: "commenting",
                roles: vec![
                    role("post", &[Post]),
                    role("comment", &[Comment]),
                    role("author", &[Profile]),
                ],
            },
            RelationDef {
                name: "location",
                roles: vec![role("place", &[Place]), role("located", &[Profile, Place])],
            },
            RelationDef {
                name: "reaction",
                roles: vec![role("parent", &[Post, Comment]), role("author", &[Page])],
            },
        ];

        SchemaModel {
            declared,
            keys,
            relations,
        }
    }

    /// Attributes declared directly on `kind`, without inherited ones.
    pub fn declared_attributes(&self, kind: EntityKind) -> &[AttributeDef] {
        self.declared.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All attributes of `kind`: ancestors' declarations first, then its own.
    pub fn attributes_of(&self, kind: EntityKind) -> Vec<AttributeDef> {
        kind.lineage()
            .into_iter()
            .flat_map(|k| self.declared_attributes(k).iter().copied())
            .collect()
    }

    pub fn attribute(&self, kind: EntityKind, name: &str) -> Result<AttributeDef, SchemaError> {
        self.attributes_of(kind)
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| SchemaError::unknown_attribute(kind.label(), name))
    }

    /// The attribute identifying instances of `kind`, inherited when the kind
    /// declares none itself. Abstract kinds may have an abstract key.
    pub fn key_attribute(&self, kind: EntityKind) -> Result<AttributeDef, SchemaError> {
        let key = kind
            .lineage()
            .into_iter()
            .rev()
            .find_map(|k| self.keys.get(&k).copied())
            .ok_or_else(|| SchemaError::unknown_attribute(kind.label(), "<key>"))?;
        self.attribute(kind, key)
    }

    /// Direct sub-kinds, in registry order.
    pub fn children_of(&self, kind: EntityKind) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|k| k.parent() == Some(kind))
            .collect()
    }

    /// Sub-kinds in pre-order (a parent before its own children).
    pub fn descendants_of(&self, kind: EntityKind) -> Vec<EntityKind> {
        let mut out = Vec::new();
        for child in self.children_of(kind) {
            out.push(child);
            out.extend(self.descendants_of(child));
        }
        out
    }

    /// Concrete variants of a polymorphic kind, in discrimination priority order.
    pub fn variants_of(&self, kind: EntityKind) -> Vec<EntityKind> {
        self.descendants_of(kind)
            .into_iter()
            .filter(|k| !k.is_abstract())
            .collect()
    }

    /// Attributes that exist only on sub-kinds of `kind`, grouped by name.
    pub fn variant_only_attributes(&self, kind: EntityKind) -> Vec<VariantAttribute> {
        let inherited = self.attributes_of(kind);
        let mut out: Vec<VariantAttribute> = Vec::new();
        for descendant in self.descendants_of(kind) {
            for attribute in self.declared_attributes(descendant) {
                if inherited.iter().any(|a| a.name == attribute.name) {
                    continue;
                }
                match out.iter_mut().find(|v| v.attribute.name == attribute.name) {
                    Some(existing) => existing.declared_on.push(descendant),
                    None => out.push(VariantAttribute {
                        attribute: *attribute,
                        declared_on: vec![descendant],
                    }),
                }
            }
        }
        out
    }

    pub fn relation(&self, name: &str) -> Result<&RelationDef, SchemaError> {
        self.relations
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| SchemaError::UnknownRelation {
                relation: name.to_string(),
            })
    }

    /// Every `(relation, role)` that `kind` can play, including inherited ones.
    pub fn relations_of(&self, kind: EntityKind) -> Vec<Participation> {
        self.relations
            .iter()
            .flat_map(|relation| {
                relation
                    .roles
                    .iter()
                    .filter(move |role| role.players.iter().any(|p| kind.is_a(*p)))
                    .map(move |role| Participation {
                        relation: relation.name,
                        role: role.name,
                    })
            })
            .collect()
    }

    /// Fails unless `kind` (or one of its ancestors) plays `relation:role`.
    pub fn check_plays(
        &self,
        kind: EntityKind,
        relation: &str,
        role: &str,
    ) -> Result<(), SchemaError> {
        let def = self.relation(relation)?;
        let plays = def
            .role(role)
            .map(|r| r.players.iter().any(|p| kind.is_a(*p)))
            .unwrap_or(false);
        if plays {
            Ok(())
        } else {
            Err(SchemaError::role_not_played(kind.label(), relation, role))
        }
    }

    /// The most general kind allowed to play `relation:role`.
    pub fn role_player(&self, relation: &str, role: &str) -> Result<EntityKind, SchemaError> {
        let def = self.relation(relation)?;
        def.role(role)
            .and_then(|r| r.players.first().copied())
            .ok_or_else(|| SchemaError::role_not_played("<any>", relation, role))
    }
}
