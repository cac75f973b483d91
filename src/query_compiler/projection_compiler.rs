//! Compiles read requests into projection trees.
//!
//! Every schema attribute resolves to one of four forms:
//!
//! - **direct**: declared on the projected kind (`$page.name`)
//! - **cross-kind lookup**: declared only on narrower kinds; first value over a
//!   disjunction of the declaring kinds, `null` when none matches
//! - **count**: size of a relation's role-bound matches, never truncated
//! - **bounded list**: multi-valued attributes and related entities, sorted
//!   ascending and truncated at [`BOUNDED_LIST_LIMIT`]
//!
//! Endpoint roots reuse the same rules and differ only in the attributes and
//! relations they include.

use crate::schema_model::{AttributeDef, EntityKind, SchemaModel, VariantAttribute};
use crate::typeql::{Constraint, Literal, Pattern, RolePlayer, Var};

use super::errors::CompileError;
use super::location_hierarchy::{
    LocationHierarchyResolver, LOCATION_RELATION,
};
use super::projection::{FetchField, FetchObject, ProjectionSpec, BOUNDED_LIST_LIMIT};
use super::type_discriminator::TypeDiscriminator;

/// Page attributes shown wherever a page appears as a summary card.
const PAGE_SUMMARY_ATTRIBUTES: [&str; 4] = ["page-id", "name", "bio", "profile-picture"];
/// Page attributes attached to posts and comments under an `author` prefix.
const AUTHOR_ATTRIBUTES: [&str; 3] = ["name", "profile-picture", "page-id"];

const POSTING_RELATION: &str = "posting";
const COMMENTING_RELATION: &str = "commenting";
const REACTION_RELATION: &str = "reaction";

/// A related-entity list and its matching count on a page.
struct RelatedList {
    field: &'static str,
    count_field: &'static str,
    relation: &'static str,
    self_role: &'static str,
    other_role: &'static str,
    other_var: &'static str,
}

const PAGE_RELATED_LISTS: [RelatedList; 2] = [
    RelatedList {
        field: "friends",
        count_field: "numberOfFriends",
        relation: "friendship",
        self_role: "friend",
        other_role: "friend",
        other_var: "friend",
    },
    RelatedList {
        field: "followers",
        count_field: "numberOfFollowers",
        relation: "following",
        self_role: "page",
        other_role: "follower",
        other_var: "follower",
    },
];

/// The read endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionRoot {
    PageList,
    Page { id: String },
    PostsByPage { page_id: String },
    CommentsByPost { post_id: String },
    PagesInPlace { place_id: String },
}

pub struct ProjectionCompiler<'a> {
    schema: &'a SchemaModel,
}

impl<'a> ProjectionCompiler<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        ProjectionCompiler { schema }
    }

    pub fn compile_root(&self, root: &ProjectionRoot) -> Result<ProjectionSpec, CompileError> {
        log::debug!("Compiling projection for {:?}", root);
        match root {
            ProjectionRoot::PageList => self.page_list(),
            ProjectionRoot::Page { id } => self.page(id),
            ProjectionRoot::PostsByPage { page_id } => self.posts_by_page(page_id),
            ProjectionRoot::CommentsByPost { post_id } => self.comments_by_post(post_id),
            ProjectionRoot::PagesInPlace { place_id } => self.pages_in_place(place_id),
        }
    }

    /// Projection of a single entity of `kind` identified by its key attribute,
    /// with every attribute of the kind and of its variants.
    pub fn compile(&self, kind: EntityKind, id: &str) -> Result<ProjectionSpec, CompileError> {
        let var = Var::new(kind.label())?;
        Ok(ProjectionSpec {
            root: self.lookup_by_key(kind, &var, id)?,
            fields: self.attribute_fields(kind, &var)?,
            root_var: var,
        })
    }

    /// Every page as a summary card.
    pub fn page_list(&self) -> Result<ProjectionSpec, CompileError> {
        let page = Var::new(EntityKind::Page.label())?;
        let mut fields = FetchObject::new();
        self.summary_fields(&mut fields, EntityKind::Page, &page, "")?;
        self.discriminator_field(&mut fields, "type", &page, EntityKind::Page)?;
        Ok(ProjectionSpec {
            root: Pattern::new().with(Constraint::isa(&page, EntityKind::Page.label())),
            root_var: page,
            fields,
        })
    }

    /// Full page profile: attributes, resolved variant, friends and followers
    /// with their totals, and the containment chain of its location.
    pub fn page(&self, id: &str) -> Result<ProjectionSpec, CompileError> {
        let mut spec = self.compile(EntityKind::Page, id)?;
        let page = spec.root_var.clone();

        self.discriminator_field(&mut spec.fields, "type", &page, EntityKind::Page)?;
        for list in &PAGE_RELATED_LISTS {
            self.related_list_fields(&mut spec.fields, EntityKind::Page, &page, list)?;
        }

        let located_kind = self
            .schema
            .role_player(LOCATION_RELATION, "located")?;
        let hierarchy = LocationHierarchyResolver::new(self.schema);
        spec.fields
            .insert("location", hierarchy.chain_field(&page, located_kind)?);
        Ok(spec)
    }

    /// Posts published by a page, each with its author card and reactions.
    pub fn posts_by_page(&self, page_id: &str) -> Result<ProjectionSpec, CompileError> {
        self.schema
            .check_plays(EntityKind::Page, POSTING_RELATION, "page")?;
        self.schema
            .check_plays(EntityKind::Post, POSTING_RELATION, "post")?;

        let page = Var::new(EntityKind::Page.label())?;
        let post = Var::new(EntityKind::Post.label())?;
        let root = self.lookup_by_key(EntityKind::Page, &page, page_id)?.with(
            Constraint::links(
                POSTING_RELATION,
                vec![
                    RolePlayer::new("page", page.clone()),
                    RolePlayer::new("post", post.clone()),
                ],
            ),
        );

        let mut fields = self.attribute_fields(EntityKind::Post, &post)?;
        self.summary_fields(&mut fields, EntityKind::Page, &page, "author")?;
        let author_kind = self.schema.role_player(POSTING_RELATION, "page")?;
        self.discriminator_field(&mut fields, "authorType", &page, author_kind)?;
        self.reaction_fields(&mut fields, EntityKind::Post, &post)?;

        Ok(ProjectionSpec {
            root,
            root_var: post,
            fields,
        })
    }

    /// Comments on a post, each with its author card and reactions.
    pub fn comments_by_post(&self, post_id: &str) -> Result<ProjectionSpec, CompileError> {
        for (kind, role) in [
            (EntityKind::Post, "post"),
            (EntityKind::Comment, "comment"),
            (EntityKind::Profile, "author"),
        ] {
            self.schema.check_plays(kind, COMMENTING_RELATION, role)?;
        }

        let post = Var::new(EntityKind::Post.label())?;
        let comment = Var::new(EntityKind::Comment.label())?;
        let author = Var::new("author")?;
        let root = self.lookup_by_key(EntityKind::Post, &post, post_id)?.with(
            Constraint::links(
                COMMENTING_RELATION,
                vec![
                    RolePlayer::new("post", post.clone()),
                    RolePlayer::new("comment", comment.clone()),
                    RolePlayer::new("author", author.clone()),
                ],
            ),
        );

        let author_kind = self.schema.role_player(COMMENTING_RELATION, "author")?;
        let mut fields = self.attribute_fields(EntityKind::Comment, &comment)?;
        self.summary_fields(&mut fields, author_kind, &author, "author")?;
        self.discriminator_field(&mut fields, "authorType", &author, author_kind)?;
        self.reaction_fields(&mut fields, EntityKind::Comment, &comment)?;

        Ok(ProjectionSpec {
            root,
            root_var: comment,
            fields,
        })
    }

    /// A place with a bounded list of the pages located anywhere within it.
    pub fn pages_in_place(&self, place_id: &str) -> Result<ProjectionSpec, CompileError> {
        let place = Var::new(EntityKind::Place.label())?;
        let page = Var::new(EntityKind::Page.label())?;
        let page_key = page.suffixed("id")?;
        let located_kind = self
            .schema
            .role_player(LOCATION_RELATION, "located")?;
        let page_id = self.schema.key_attribute(EntityKind::Page)?;

        let hierarchy = LocationHierarchyResolver::new(self.schema);
        let pattern = hierarchy
            .located_within(&page, located_kind, &place)?
            .with(Constraint::has_var(&page, page_id.name, &page_key));

        let mut page_fields = FetchObject::new();
        self.summary_fields(&mut page_fields, EntityKind::Page, &page, "")?;
        self.discriminator_field(&mut page_fields, "type", &page, located_kind)?;

        let mut fields = FetchObject::new();
        let place_name = self.schema.attribute(EntityKind::Place, "name")?;
        let place_key = self.schema.key_attribute(EntityKind::Place)?;
        fields.insert("placeName", FetchField::attribute(&place, place_name.name));
        fields.insert("placeId", FetchField::attribute(&place, place_key.name));
        fields.insert(
            "pages",
            FetchField::SubFetch {
                pattern,
                sort: Some(page_key),
                limit: Some(BOUNDED_LIST_LIMIT),
                fields: page_fields,
            },
        );

        Ok(ProjectionSpec {
            root: self.lookup_by_key(EntityKind::Place, &place, place_id)?,
            root_var: place,
            fields,
        })
    }

    /// `$var isa kind; $var has <key> "<id>";`
    fn lookup_by_key(&self, kind: EntityKind, var: &Var, id: &str) -> Result<Pattern, CompileError> {
        let key = self.schema.key_attribute(kind)?;
        Ok(Pattern::new()
            .with(Constraint::isa(var, kind.label()))
            .with(Constraint::has_literal(var, key.name, Literal::from(id))))
    }

    /// Direct and cross-kind attribute fields for `kind`, keyed by field name.
    fn attribute_fields(&self, kind: EntityKind, var: &Var) -> Result<FetchObject, CompileError> {
        let mut fields = FetchObject::new();
        for attribute in self.schema.attributes_of(kind) {
            fields.insert(attribute.field, self.direct_field(var, &attribute)?);
        }
        for variant_attribute in self.schema.variant_only_attributes(kind) {
            fields.insert(
                variant_attribute.attribute.field,
                self.cross_kind_field(var, &variant_attribute)?,
            );
        }
        Ok(fields)
    }

    fn direct_field(&self, var: &Var, attribute: &AttributeDef) -> Result<FetchField, CompileError> {
        if !attribute.is_multi() {
            return Ok(FetchField::attribute(var, attribute.name));
        }
        let value = var.suffixed(attribute.name)?;
        let pattern = Pattern::new().with(Constraint::has_var(var, attribute.name, &value));
        Ok(FetchField::bounded_list(pattern, value))
    }

    fn cross_kind_field(&self, var: &Var, variant_attribute: &VariantAttribute) -> Result<FetchField, CompileError> {
        let attribute = &variant_attribute.attribute;
        let value = var.suffixed(attribute.name)?;
        let branch = |kind: &EntityKind| {
            Pattern::new()
                .with(Constraint::isa(var, kind.label()))
                .with(Constraint::has_var(var, attribute.name, &value))
        };
        let pattern = match variant_attribute.declared_on.as_slice() {
            [only] => branch(only),
            many => Pattern::new().with(Constraint::Or(many.iter().map(branch).collect())),
        };
        if attribute.is_multi() {
            Ok(FetchField::bounded_list(pattern, value))
        } else {
            Ok(FetchField::FirstValue { pattern, value })
        }
    }

    /// Summary attributes of a page-like entity. With a prefix, keys become
    /// `prefix` + capitalised field (`authorName`); the page key becomes `<prefix>Id`.
    fn summary_fields(
        &self,
        fields: &mut FetchObject,
        kind: EntityKind,
        var: &Var,
        prefix: &str,
    ) -> Result<(), CompileError> {
        let names: &[&str] = if prefix.is_empty() {
            &PAGE_SUMMARY_ATTRIBUTES
        } else {
            &AUTHOR_ATTRIBUTES
        };
        for name in names {
            let attribute = self.schema.attribute(kind, name)?;
            fields.insert(
                prefixed_field(prefix, attribute.field),
                FetchField::attribute(var, attribute.name),
            );
        }
        Ok(())
    }

    fn discriminator_field(
        &self,
        fields: &mut FetchObject,
        key: &str,
        var: &Var,
        kind: EntityKind,
    ) -> Result<(), CompileError> {
        let discriminator = TypeDiscriminator::new(self.schema);
        let candidates = discriminator.candidates(kind)?;
        fields.insert(key, discriminator.compile(var, &candidates)?);
        Ok(())
    }

    fn related_list_fields(
        &self,
        fields: &mut FetchObject,
        kind: EntityKind,
        var: &Var,
        list: &RelatedList,
    ) -> Result<(), CompileError> {
        self.schema.check_plays(kind, list.relation, list.self_role)?;
        self.schema.check_plays(kind, list.relation, list.other_role)?;
        let key = self.schema.key_attribute(kind)?;

        let other = var.suffixed(list.other_var)?;
        let other_key = other.suffixed("id")?;
        let related = Pattern::new().with(Constraint::links(
            list.relation,
            vec![
                RolePlayer::new(list.self_role, var.clone()),
                RolePlayer::new(list.other_role, other.clone()),
            ],
        ));

        let listed = related
            .clone()
            .with(Constraint::has_var(&other, key.name, &other_key));
        fields.insert(list.field, FetchField::bounded_list(listed, other_key));
        fields.insert(list.count_field, FetchField::Count { pattern: related });
        Ok(())
    }

    /// Emoji of the reactions on `var` and their total.
    fn reaction_fields(&self, fields: &mut FetchObject, kind: EntityKind, var: &Var) -> Result<(), CompileError> {
        self.schema.check_plays(kind, REACTION_RELATION, "parent")?;
        let emoji = self.schema.attribute(EntityKind::Reaction, "emoji")?;

        let reaction = var.suffixed(EntityKind::Reaction.label())?;
        let value = reaction.suffixed(emoji.name)?;
        let reacted = Pattern::new().with(Constraint::Links {
            relation_var: Some(reaction.clone()),
            relation: REACTION_RELATION,
            players: vec![RolePlayer::new("parent", var.clone())],
        });

        let listed = reacted
            .clone()
            .with(Constraint::has_var(&reaction, emoji.name, &value));
        fields.insert("reactions", FetchField::bounded_list(listed, value));
        fields.insert("numberOfReactions", FetchField::Count { pattern: reacted });
        Ok(())
    }
}

fn prefixed_field(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        return field.to_string();
    }
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", prefix, first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}
