//! Projection compilation for the read endpoints

use socialgraph::{
    query_compiler::{compile_read, FetchField, ProjectionCompiler, ProjectionRoot},
    schema_model::{schema, EntityKind},
    typeql::ToTypeQl,
};

fn compiler() -> ProjectionCompiler<'static> {
    ProjectionCompiler::new(schema())
}

/// Lines of the block that follows `"key": [` up to its closing `],`.
fn list_block<'a>(text: &'a str, key: &str) -> Vec<&'a str> {
    let opener = format!("\"{}\": [", key);
    text.lines()
        .skip_while(|line| line.trim() != opener)
        .skip(1)
        .take_while(|line| line.trim() != "],")
        .collect()
}

#[test]
fn test_page_lists_are_capped_and_sorted_counts_are_not() {
    let text = compiler().page("p1").unwrap().to_typeql();

    for key in ["friends", "followers", "tags"] {
        let block = list_block(&text, key);
        assert!(block.iter().any(|l| l.trim() == "limit 9;"), "{} not capped", key);
        assert!(block.iter().any(|l| l.trim().starts_with("sort ")), "{} not sorted", key);
    }
    let friends_count = text
        .split("\"numberOfFriends\": (")
        .nth(1)
        .and_then(|rest| rest.split("),").next())
        .unwrap();
    assert!(friends_count.contains("return count;"));
    assert!(!friends_count.contains("limit"));
}

#[test]
fn test_friends_and_count_match_the_same_relation() {
    let spec = compiler().page("p1").unwrap();
    let (
        Some(FetchField::BoundedList { pattern: listed, .. }),
        Some(FetchField::Count { pattern: counted }),
    ) = (spec.fields.get("friends"), spec.fields.get("numberOfFriends"))
    else {
        panic!("friends must be a bounded list with a count");
    };
    assert_eq!(listed.constraints()[0], counted.constraints()[0]);
    assert_eq!(
        counted.render_inline(),
        "(friend: $page, friend: $page-friend) isa friendship;"
    );
}

#[test]
fn test_posts_carry_author_and_reactions() {
    let spec = compiler().posts_by_page("p1").unwrap();
    let keys: Vec<&str> = spec.fields.keys().collect();
    for key in [
        "postId",
        "postText",
        "tags",
        "postImage",
        "authorName",
        "authorProfilePicture",
        "authorId",
        "authorType",
        "reactions",
        "numberOfReactions",
    ] {
        assert!(keys.contains(&key), "missing {} in {:?}", key, keys);
    }
    assert_eq!(
        spec.root.render_inline(),
        "$page isa page; $page has page-id \"p1\"; (page: $page, post: $post) isa posting;"
    );
}

#[test]
fn test_comments_bind_the_comment_author() {
    let spec = compiler().comments_by_post("post-9").unwrap();
    assert_eq!(
        spec.root.render_inline(),
        "$post isa post; $post has post-id \"post-9\"; \
         (post: $post, comment: $comment, author: $author) isa commenting;"
    );
    let Some(FetchField::Attribute { var, attribute, .. }) = spec.fields.get("authorName") else {
        panic!("authorName must be a direct attribute");
    };
    assert_eq!(var.to_string(), "$author");
    assert_eq!(*attribute, "name");
}

#[test]
fn test_page_list_summary_fields() {
    let spec = compiler().page_list().unwrap();
    assert_eq!(
        spec.fields.keys().collect::<Vec<_>>(),
        vec!["id", "name", "bio", "profilePicture", "type"]
    );
}

#[test]
fn test_every_concrete_keyed_kind_compiles() {
    for kind in [
        EntityKind::Person,
        EntityKind::Organization,
        EntityKind::Group,
        EntityKind::Post,
        EntityKind::Comment,
        EntityKind::Place,
    ] {
        let spec = compiler().compile(kind, "x").unwrap();
        assert!(!spec.fields.is_empty(), "{} has no fields", kind);
    }
}

#[test]
fn test_compile_read_renders_statement() {
    let text = compile_read(&ProjectionRoot::PagesInPlace { place_id: "fr".into() }).unwrap();
    assert!(text.starts_with("match\n    $place isa place;"));
    assert!(text.trim_end().ends_with("};"));
}
