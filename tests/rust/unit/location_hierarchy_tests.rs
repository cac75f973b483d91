//! Place containment walks and the statements that ask for them

use socialgraph::{
    query_compiler::{
        order_location_chain, FetchField, HierarchyError, PlaceGraph, PlacePair,
        ProjectionCompiler,
    },
    schema_model::schema,
};

fn pair(place: &str, parent: &str) -> PlacePair {
    PlacePair {
        place_name: place.to_uppercase(),
        place_id: place.to_string(),
        parent_name: parent.to_uppercase(),
        parent_id: parent.to_string(),
    }
}

fn ids(pairs: &[PlacePair]) -> Vec<(&str, &str)> {
    pairs
        .iter()
        .map(|p| (p.place_id.as_str(), p.parent_id.as_str()))
        .collect()
}

#[test]
fn test_chain_from_leaf_and_from_root() {
    let graph = PlaceGraph::from_pairs(&[pair("a", "root"), pair("b", "a"), pair("leaf", "b")]);

    let chain = graph.parent_chain("leaf", 32).unwrap();
    assert_eq!(ids(&chain), vec![("leaf", "b"), ("b", "a"), ("a", "root")]);
    assert!(graph.parent_chain("root", 32).unwrap().is_empty());
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let graph = PlaceGraph::from_pairs(&[pair("x", "y"), pair("y", "z"), pair("z", "x")]);
    assert!(matches!(
        graph.parent_chain("x", 100),
        Err(HierarchyError::Cycle { .. })
    ));
    // No leaf exists, so fetched order is kept, bounded by depth.
    let ordered = order_location_chain(&[pair("x", "y"), pair("y", "z"), pair("z", "x")], 2);
    assert_eq!(ordered.len(), 2);
}

#[test]
fn test_pages_two_levels_below_are_within_ancestor() {
    let graph = PlaceGraph::from_pairs(&[pair("city", "region"), pair("region", "country")]);
    let pages = graph.pages_within(
        "country",
        [("alice", "city"), ("bob", "city"), ("eve", "elsewhere")],
        32,
    );
    assert_eq!(pages, vec!["alice", "bob"]);
}

#[test]
fn test_fetched_pairs_are_reordered_leaf_to_root() {
    let fetched = [pair("a", "root"), pair("leaf", "b"), pair("b", "a")];
    let ordered = order_location_chain(&fetched, 32);
    assert_eq!(ids(&ordered), vec![("leaf", "b"), ("b", "a"), ("a", "root")]);
}

#[test]
fn test_place_projection_lists_pages_transitively() {
    let spec = ProjectionCompiler::new(schema()).pages_in_place("fr").unwrap();
    assert_eq!(
        spec.root.render_inline(),
        "$place isa place; $place has place-id \"fr\";"
    );
    let Some(FetchField::SubFetch { pattern, limit, .. }) = spec.fields.get("pages") else {
        panic!("pages must be a nested fetch");
    };
    assert_eq!(*limit, Some(9));
    let rendered = pattern.render_inline();
    assert!(rendered.contains("located_in_transitive($page-place, $place)"));
    assert!(rendered.contains("(place: $place, located: $page) isa location;"));
}
