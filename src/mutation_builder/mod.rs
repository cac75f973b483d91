pub mod errors;
pub mod insert_statement;
pub mod payload;

pub use errors::MutationError;
pub use insert_statement::MutationBuilder;
pub use payload::{CreationPayload, PayloadValue};

use crate::schema_model::schema;

/// Build the insert for `payload` against the process-wide schema.
pub fn build_insert(payload: &CreationPayload) -> Result<String, MutationError> {
    MutationBuilder::new(schema()).build(payload)
}
