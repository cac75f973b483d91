//! Variant resolution for polymorphic pages

use serde_json::json;
use socialgraph::{
    query_compiler::{FetchField, PageVariant, ProjectionCompiler, TypeDiscriminator},
    schema_model::{schema, EntityKind},
};
use test_case::test_case;

/// Type labels an instance of `kind` carries: its own and its ancestors'.
fn instance_types(kind: EntityKind) -> Vec<&'static str> {
    kind.lineage().into_iter().map(|k| k.label()).collect()
}

#[test_case(EntityKind::Person, PageVariant::Person ; "person")]
#[test_case(EntityKind::Organization, PageVariant::Organization ; "organization")]
#[test_case(EntityKind::Group, PageVariant::Group ; "group")]
fn test_each_variant_resolves_to_itself(kind: EntityKind, expected: PageVariant) {
    let discriminator = TypeDiscriminator::new(schema());
    let candidates = discriminator.candidates(EntityKind::Page).unwrap();
    assert_eq!(
        TypeDiscriminator::resolve(&candidates, &instance_types(kind)),
        expected
    );
}

#[test_case(&["page"] ; "abstract only")]
#[test_case(&["page", "profile"] ; "abstract profile only")]
#[test_case(&[] ; "no types")]
fn test_no_variant_is_unknown(types: &[&str]) {
    let discriminator = TypeDiscriminator::new(schema());
    let candidates = discriminator.candidates(EntityKind::Page).unwrap();
    assert_eq!(
        TypeDiscriminator::resolve(&candidates, types),
        PageVariant::Unknown
    );
}

#[test]
fn test_group_is_not_a_comment_author_candidate() {
    let discriminator = TypeDiscriminator::new(schema());
    let candidates = discriminator.candidates(EntityKind::Profile).unwrap();
    assert_eq!(
        TypeDiscriminator::resolve(&candidates, &instance_types(EntityKind::Group)),
        PageVariant::Unknown
    );
}

#[test]
fn test_compiled_page_type_binds_every_variant_label() {
    let spec = ProjectionCompiler::new(schema()).page("p1").unwrap();
    let Some(FetchField::FirstValue { pattern, value }) = spec.fields.get("type") else {
        panic!("type must be a first-value lookup");
    };
    assert_eq!(value.to_string(), "$page-type");
    let rendered = pattern.render_inline();
    for label in ["person", "organization", "group"] {
        assert!(
            rendered.contains(&format!("let $page-type = \"{}\";", label)),
            "missing branch for {}: {}",
            label,
            rendered
        );
    }
}

#[test]
fn test_document_values() {
    assert_eq!(
        PageVariant::from_document_value(Some(&json!("organization"))),
        PageVariant::Organization
    );
    assert_eq!(
        PageVariant::from_document_value(Some(&json!(null))),
        PageVariant::Unknown
    );
    assert_eq!(PageVariant::from_document_value(None), PageVariant::Unknown);
    assert_eq!(
        PageVariant::from_document_value(Some(&json!("post"))),
        PageVariant::Unknown
    );
}
