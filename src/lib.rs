//! SocialGraph - social network backend over TypeDB
//!
//! This crate turns HTTP requests into TypeQL statements and runs them:
//! - A compiled-in schema model of pages, posts, comments and places
//! - Fetch projections with variant discrimination and bounded lists
//! - Place hierarchy traversal
//! - Validated insert statements for new pages

pub mod config;
pub mod mutation_builder;
pub mod query_compiler;
pub mod schema_model;
pub mod server;
pub mod typeql;
