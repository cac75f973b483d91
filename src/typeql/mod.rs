//! TypeQL statement construction shared by the read and write compilers.

pub mod common;
pub mod errors;
pub mod pattern;
pub mod writer;

pub use common::{escape_string, Literal, Var};
pub use errors::TypeQlError;
pub use pattern::{Constraint, HasValue, Pattern, RolePlayer};
pub use writer::{ToTypeQl, TypeQlWriter};
