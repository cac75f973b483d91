pub mod entity_kind;
pub mod errors;
pub mod registry;

pub use entity_kind::{AttributeDef, Cardinality, EntityKind, ValueType};
pub use errors::SchemaError;
pub use registry::{schema, Participation, RelationDef, RoleDef, SchemaModel, VariantAttribute};
