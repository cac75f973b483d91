//! Insert statements built from creation requests

use serde_json::json;
use socialgraph::{
    mutation_builder::{build_insert, CreationPayload, MutationError},
    schema_model::EntityKind,
    server::models::{CreateGroupRequest, CreateOrganizationRequest, CreateUserRequest},
};

fn group_request(extra: serde_json::Value) -> CreateGroupRequest {
    let mut body = json!({
        "groupId": "g-42",
        "name": "Graph Readers",
        "bio": "We read graphs",
        "isActive": true,
        "pageVisibility": "public",
        "postVisibility": "members"
    });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
    }
    serde_json::from_value(body).unwrap()
}

#[test]
fn test_group_with_empty_tags_and_null_picture() {
    let request = group_request(json!({ "tags": [], "profile_picture": null }));
    let statement = build_insert(&request.into()).unwrap();

    assert!(!statement.contains("has tag"));
    assert!(!statement.contains("profile-picture"));
    for clause in [
        "has name \"Graph Readers\"",
        "has group-id \"g-42\"",
        "has bio \"We read graphs\"",
        "has is-active true",
        "has page-visibility \"public\"",
        "has post-visibility \"members\"",
    ] {
        assert!(statement.contains(clause), "missing `{}` in {}", clause, statement);
    }
}

#[test]
fn test_tags_are_emitted_once_each_in_input_order() {
    let tags = ["rust", "typedb", "graphs", "rust-lang", "zzz"];
    let request = group_request(json!({ "tags": tags }));
    let statement = build_insert(&request.into()).unwrap();

    let positions: Vec<usize> = tags
        .iter()
        .map(|tag| statement.find(&format!("has tag \"{}\"", tag)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(statement.matches("has tag ").count(), tags.len());
}

#[test]
fn test_absent_optionals_are_never_emitted() {
    let request: CreateUserRequest = serde_json::from_value(json!({
        "username": "ada",
        "name": "Ada",
        "bio": "",
        "isActive": true,
        "gender": "female",
        "email": "ada@example.com",
        "canPublish": false,
        "pageVisibility": "public",
        "postVisibility": "public",
        "phone": ""
    }))
    .unwrap();
    let statement = build_insert(&request.into()).unwrap();

    assert!(statement.starts_with("insert $person isa person, "));
    for absent in ["phone", "language", "badge", "relationship-status", "profile-picture"] {
        assert!(!statement.contains(absent), "unexpected `{}` in {}", absent, statement);
    }
    // Required strings stay even when empty.
    assert!(statement.contains("has bio \"\""));
    assert!(statement.contains("has can-publish false"));
}

#[test]
fn test_missing_required_field_names_the_field() {
    let request: CreateOrganizationRequest = serde_json::from_value(json!({
        "username": "acme",
        "name": "Acme",
        "isActive": true,
        "bio": "Anvils"
    }))
    .unwrap();
    let error = build_insert(&request.into()).unwrap_err();
    assert_eq!(
        error,
        MutationError::MissingRequiredField {
            kind: "organization".to_string(),
            field: "canPublish".to_string(),
        }
    );
}

#[test]
fn test_caller_strings_cannot_break_out_of_literals() {
    let request = group_request(json!({ "name": "x\"; match $p isa page; delete $p;" }));
    let statement = build_insert(&request.into()).unwrap();
    assert!(statement.contains(r#"has name "x\"; match $p isa page; delete $p;""#));
    assert_eq!(statement.matches("insert").count(), 1);
}

#[test]
fn test_building_is_deterministic() {
    let payload: CreationPayload = group_request(json!({ "tags": ["a", "b"] })).into();
    assert_eq!(build_insert(&payload), build_insert(&payload));
    assert_eq!(payload.kind, EntityKind::Group);
}
