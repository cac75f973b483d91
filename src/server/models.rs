use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mutation_builder::CreationPayload;
use crate::schema_model::EntityKind;

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    #[serde(rename = "pageId", alias = "page_id")]
    pub page_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    #[serde(rename = "postId", alias = "post_id")]
    pub post_id: Option<String>,
}

/// Fields are optional at the wire level so that a missing required field is
/// reported by name instead of failing deserialisation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "profile_picture")]
    pub profile_picture: Option<String>,
    pub badge: Option<String>,
    #[serde(alias = "is_active")]
    pub is_active: Option<bool>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "relationship_status")]
    pub relationship_status: Option<String>,
    #[serde(alias = "can_publish")]
    pub can_publish: Option<bool>,
    #[serde(alias = "page_visibility")]
    pub page_visibility: Option<String>,
    #[serde(alias = "post_visibility")]
    pub post_visibility: Option<String>,
    pub bio: Option<String>,
}

impl From<CreateUserRequest> for CreationPayload {
    fn from(request: CreateUserRequest) -> Self {
        CreationPayload::new(EntityKind::Person)
            .with("username", request.username)
            .with("name", request.name)
            .with("profile-picture", request.profile_picture)
            .with("badge", request.badge)
            .with("is-active", request.is_active)
            .with("gender", request.gender)
            .with("language", request.language)
            .with("email", request.email)
            .with("phone", request.phone)
            .with("relationship-status", request.relationship_status)
            .with("can-publish", request.can_publish)
            .with("page-visibility", request.page_visibility)
            .with("post-visibility", request.post_visibility)
            .with("bio", request.bio)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "profile_picture")]
    pub profile_picture: Option<String>,
    pub badge: Option<String>,
    #[serde(alias = "is_active")]
    pub is_active: Option<bool>,
    #[serde(alias = "can_publish")]
    pub can_publish: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub bio: Option<String>,
}

impl From<CreateOrganizationRequest> for CreationPayload {
    fn from(request: CreateOrganizationRequest) -> Self {
        CreationPayload::new(EntityKind::Organization)
            .with("username", request.username)
            .with("name", request.name)
            .with("profile-picture", request.profile_picture)
            .with("badge", request.badge)
            .with("is-active", request.is_active)
            .with("can-publish", request.can_publish)
            .with("tag", request.tags)
            .with("bio", request.bio)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[serde(alias = "group_id")]
    pub group_id: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "profile_picture")]
    pub profile_picture: Option<String>,
    pub badge: Option<String>,
    #[serde(alias = "is_active")]
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
    #[serde(alias = "page_visibility")]
    pub page_visibility: Option<String>,
    #[serde(alias = "post_visibility")]
    pub post_visibility: Option<String>,
    pub bio: Option<String>,
}

impl From<CreateGroupRequest> for CreationPayload {
    fn from(request: CreateGroupRequest) -> Self {
        CreationPayload::new(EntityKind::Group)
            .with("group-id", request.group_id)
            .with("name", request.name)
            .with("profile-picture", request.profile_picture)
            .with("badge", request.badge)
            .with("is-active", request.is_active)
            .with("tag", request.tags)
            .with("page-visibility", request.page_visibility)
            .with("post-visibility", request.post_visibility)
            .with("bio", request.bio)
    }
}

/// Statement compilation without execution, one variant per endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum CompileRequest {
    Pages,
    Page {
        id: String,
    },
    Posts {
        #[serde(rename = "pageId", alias = "page_id")]
        page_id: String,
    },
    Comments {
        #[serde(rename = "postId", alias = "post_id")]
        post_id: String,
    },
    Location {
        #[serde(rename = "placeId", alias = "place_id")]
        place_id: String,
    },
    Create {
        kind: EntityKind,
        payload: Map<String, Value>,
    },
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CompileResponse {
    pub statement: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
