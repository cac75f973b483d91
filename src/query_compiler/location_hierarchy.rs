//! Place containment: a page is located in one immediate place, and places are
//! located in parent places through the same `location` relation.
//!
//! Two halves live here. The compiled half emits the sub-queries that ask the
//! database to walk the hierarchy (`parent_places_linked_list` upwards,
//! `located_in_transitive` for the inverse closure). The in-memory half,
//! [`PlaceGraph`], walks already-fetched `(child, parent)` pairs with a depth
//! bound and cycle detection, so a consumer can rebuild the chain leaf → root.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::errors::{CompileError, HierarchyError};
use super::projection::{FetchField, FetchObject};
use crate::schema_model::{EntityKind, SchemaModel};
use crate::typeql::{Constraint, Pattern, RolePlayer, Var};

pub const LOCATION_RELATION: &str = "location";
/// Database function yielding one `(child, parent)` pair per containment level
/// above the given place.
pub const PARENT_CHAIN_FUNCTION: &str = "parent_places_linked_list";
/// Database function holding when the first place is contained, through one
/// or more levels, in the second.
pub const TRANSITIVE_LOCATION_FUNCTION: &str = "located_in_transitive";

pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 32;

/// One level of a containment chain, in the shape fetched documents use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePair {
    pub place_name: String,
    pub place_id: String,
    pub parent_name: String,
    pub parent_id: String,
}

pub struct LocationHierarchyResolver<'a> {
    schema: &'a SchemaModel,
}

impl<'a> LocationHierarchyResolver<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        LocationHierarchyResolver { schema }
    }

    /// `location` field for an entity: every `(child, parent)` pair above its
    /// immediate place. The chain is fetched whole; a row limit here would
    /// keep an arbitrary subset of levels. [`order_location_chain`] applies
    /// the depth bound from the leaf once the pairs are back.
    pub fn chain_field(&self, located: &Var, located_kind: EntityKind) -> Result<FetchField, CompileError> {
        self.schema
            .check_plays(located_kind, LOCATION_RELATION, "located")?;
        let place_id = self.schema.attribute(EntityKind::Place, "place-id")?;
        let place_name = self.schema.attribute(EntityKind::Place, "name")?;

        let place = located.suffixed("place")?;
        let child = located.suffixed("child")?;
        let parent = located.suffixed("parent")?;

        let pattern = Pattern::new()
            .with(Constraint::links(
                LOCATION_RELATION,
                vec![
                    RolePlayer::new("place", place.clone()),
                    RolePlayer::new("located", located.clone()),
                ],
            ))
            .with(Constraint::FunctionCall {
                outputs: vec![child.clone(), parent.clone()],
                function: PARENT_CHAIN_FUNCTION,
                args: vec![place],
            });

        let mut fields = FetchObject::new();
        fields.insert("placeName", FetchField::attribute(&child, place_name.name));
        fields.insert("placeId", FetchField::attribute(&child, place_id.name));
        fields.insert("parentName", FetchField::attribute(&parent, place_name.name));
        fields.insert("parentId", FetchField::attribute(&parent, place_id.name));

        Ok(FetchField::SubFetch {
            pattern,
            sort: None,
            limit: None,
            fields,
        })
    }

    /// Constraints matching every `page` whose immediate place is `place` or
    /// lies anywhere below it.
    pub fn located_within(&self, page: &Var, page_kind: EntityKind, place: &Var) -> Result<Pattern, CompileError> {
        self.schema.check_plays(page_kind, LOCATION_RELATION, "located")?;
        self.schema
            .check_plays(EntityKind::Place, LOCATION_RELATION, "place")?;

        let page_place = page.suffixed("place")?;
        let directly = Pattern::new().with(Constraint::links(
            LOCATION_RELATION,
            vec![
                RolePlayer::new("place", place.clone()),
                RolePlayer::new("located", page.clone()),
            ],
        ));
        let transitively = Pattern::new()
            .with(Constraint::links(
                LOCATION_RELATION,
                vec![
                    RolePlayer::new("place", page_place.clone()),
                    RolePlayer::new("located", page.clone()),
                ],
            ))
            .with(Constraint::FunctionCall {
                outputs: vec![Var::new("_")?],
                function: TRANSITIVE_LOCATION_FUNCTION,
                args: vec![page_place, place.clone()],
            });

        Ok(Pattern::new()
            .with(Constraint::isa(page, page_kind.label()))
            .with(Constraint::Or(vec![directly, transitively])))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlaceNode {
    name: String,
    parent: Option<String>,
}

/// How a walk up the hierarchy ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEnd {
    /// Reached a place with no parent
    Root,
    Cycle { place_id: String },
    DepthLimit,
    UnknownPlace { place_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainWalk {
    pub pairs: Vec<PlacePair>,
    pub end: WalkEnd,
}

/// In-memory containment forest keyed by place id.
#[derive(Debug, Clone, Default)]
pub struct PlaceGraph {
    places: HashMap<String, PlaceNode>,
    /// Insertion order, so leaves come out in the order places were seen
    order: Vec<String>,
}

impl PlaceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_place(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();
        match self.places.get_mut(&id) {
            Some(node) => node.name = name,
            None => {
                self.order.push(id.clone());
                self.places.insert(id, PlaceNode { name, parent: None });
            }
        }
    }

    /// Record that `child` is contained in `parent`. A place has at most one
    /// parent; a later edge replaces an earlier one.
    pub fn set_parent(&mut self, child: &str, parent: &str) -> Result<(), HierarchyError> {
        if !self.places.contains_key(parent) {
            return Err(HierarchyError::UnknownPlace(parent.to_string()));
        }
        let node = self
            .places
            .get_mut(child)
            .ok_or_else(|| HierarchyError::UnknownPlace(child.to_string()))?;
        node.parent = Some(parent.to_string());
        Ok(())
    }

    pub fn from_pairs(pairs: &[PlacePair]) -> Self {
        let mut graph = PlaceGraph::new();
        for pair in pairs {
            graph.add_place(&pair.place_id, &pair.place_name);
            graph.add_place(&pair.parent_id, &pair.parent_name);
            if let Some(node) = graph.places.get_mut(&pair.place_id) {
                node.parent = Some(pair.parent_id.clone());
            }
        }
        graph
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.places.contains_key(place_id)
    }

    /// Places that are nobody's parent, in insertion order.
    pub fn leaves(&self) -> Vec<&str> {
        let parents: HashSet<&str> = self
            .places
            .values()
            .filter_map(|n| n.parent.as_deref())
            .collect();
        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| !parents.contains(id))
            .collect()
    }

    /// Follow parent edges from `place_id`, emitting one `(child, parent)` pair
    /// per level. Stops at a root, on revisiting a place, or after `max_depth` pairs.
    pub fn walk_chain(&self, place_id: &str, max_depth: usize) -> ChainWalk {
        let mut pairs = Vec::new();
        let Some(mut current) = self.places.get(place_id).map(|n| (place_id, n)) else {
            return ChainWalk {
                pairs,
                end: WalkEnd::UnknownPlace {
                    place_id: place_id.to_string(),
                },
            };
        };
        let mut visited = HashSet::from([place_id]);

        loop {
            let (id, node) = current;
            let Some(parent_id) = node.parent.as_deref() else {
                return ChainWalk {
                    pairs,
                    end: WalkEnd::Root,
                };
            };
            if pairs.len() == max_depth {
                return ChainWalk {
                    pairs,
                    end: WalkEnd::DepthLimit,
                };
            }
            let Some(parent) = self.places.get(parent_id) else {
                return ChainWalk {
                    pairs,
                    end: WalkEnd::UnknownPlace {
                        place_id: parent_id.to_string(),
                    },
                };
            };
            pairs.push(PlacePair {
                place_name: node.name.clone(),
                place_id: id.to_string(),
                parent_name: parent.name.clone(),
                parent_id: parent_id.to_string(),
            });
            if !visited.insert(parent_id) {
                return ChainWalk {
                    pairs,
                    end: WalkEnd::Cycle {
                        place_id: parent_id.to_string(),
                    },
                };
            }
            current = (parent_id, parent);
        }
    }

    /// Strict form of [`PlaceGraph::walk_chain`]: only a walk that reaches a root succeeds.
    pub fn parent_chain(&self, place_id: &str, max_depth: usize) -> Result<Vec<PlacePair>, HierarchyError> {
        let walk = self.walk_chain(place_id, max_depth);
        match walk.end {
            WalkEnd::Root => Ok(walk.pairs),
            WalkEnd::Cycle { place_id } => Err(HierarchyError::Cycle { place_id }),
            WalkEnd::DepthLimit => Err(HierarchyError::DepthExceeded { max_depth }),
            WalkEnd::UnknownPlace { place_id } => Err(HierarchyError::UnknownPlace(place_id)),
        }
    }

    /// True when `place_id` is `ancestor_id` or reachable from it by following
    /// containment downwards (zero or more hops).
    pub fn is_within(&self, place_id: &str, ancestor_id: &str, max_depth: usize) -> bool {
        if place_id == ancestor_id {
            return self.contains(place_id);
        }
        self.walk_chain(place_id, max_depth)
            .pairs
            .iter()
            .any(|pair| pair.parent_id == ancestor_id)
    }

    /// Pages whose immediate place lies within `ancestor_id`, in input order.
    pub fn pages_within<'p, I>(&self, ancestor_id: &str, page_locations: I, max_depth: usize) -> Vec<&'p str>
    where
        I: IntoIterator<Item = (&'p str, &'p str)>,
    {
        page_locations
            .into_iter()
            .filter(|(_, place)| self.is_within(place, ancestor_id, max_depth))
            .map(|(page, _)| page)
            .collect()
    }
}

/// Reorder fetched location pairs into chains running from each immediate
/// place up to its root. Pairs that do not belong to any chain are dropped.
pub fn order_location_chain(pairs: &[PlacePair], max_depth: usize) -> Vec<PlacePair> {
    let graph = PlaceGraph::from_pairs(pairs);
    let mut ordered = Vec::with_capacity(pairs.len());
    for leaf in graph.leaves() {
        let walk = graph.walk_chain(leaf, max_depth);
        match &walk.end {
            WalkEnd::Root => {}
            other => log::warn!(
                "Location chain from place `{}` ended early: {:?}",
                leaf,
                other
            ),
        }
        ordered.extend(walk.pairs);
    }
    if ordered.is_empty() && !pairs.is_empty() {
        // Every place is some place's parent: the whole set is cyclic.
        log::warn!("Location chain has no leaf; keeping fetched order");
        return pairs.iter().take(max_depth).cloned().collect();
    }
    ordered
}
