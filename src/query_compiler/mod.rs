pub mod errors;
pub mod location_hierarchy;
pub mod projection;
pub mod projection_compiler;
pub mod type_discriminator;

pub use errors::{CompileError, HierarchyError};
pub use location_hierarchy::{
    order_location_chain, LocationHierarchyResolver, PlaceGraph, PlacePair,
    DEFAULT_MAX_HIERARCHY_DEPTH,
};
pub use projection::{FetchField, FetchObject, ProjectionSpec, BOUNDED_LIST_LIMIT};
pub use projection_compiler::{ProjectionCompiler, ProjectionRoot};
pub use type_discriminator::{PageVariant, TypeDiscriminator};

use crate::schema_model::schema;
use crate::typeql::ToTypeQl;

/// Compile a read endpoint against the process-wide schema into statement text.
pub fn compile_read(root: &ProjectionRoot) -> Result<String, CompileError> {
    let spec = ProjectionCompiler::new(schema()).compile_root(root)?;
    Ok(spec.to_typeql())
}
