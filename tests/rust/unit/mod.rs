//! Unit tests - compile-only behaviour, no database required

mod location_hierarchy_tests;
mod mutation_builder_tests;
mod projection_tests;
mod type_discriminator_tests;
