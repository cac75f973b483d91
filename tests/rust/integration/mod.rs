//! Integration tests - the HTTP router wired to a recording executor
//!
//! These tests drive full requests through routing, compilation, execution
//! and response normalisation without a TypeDB server.

mod router_tests;
