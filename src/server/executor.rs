//! Execution collaborator: submits compiled statements to the database.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure reported by the database or the driver. The message is kept
/// verbatim so it can be surfaced to the caller unmodified.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecutionError {
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Transaction(String),
    #[error("{0}")]
    Query(String),
    #[error("{0}")]
    Commit(String),
    #[error("Malformed document from database: {0}")]
    Document(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Run a read statement and collect every fetched document.
    async fn fetch(&self, statement: &str) -> Result<Vec<Value>, ExecutionError>;

    /// Run a read statement and return its first document, if any.
    async fn fetch_one(&self, statement: &str) -> Result<Option<Value>, ExecutionError>;

    /// Run a write statement in its own transaction and commit it. Nothing is
    /// committed when any step fails.
    async fn write(&self, statement: &str) -> Result<(), ExecutionError>;
}
