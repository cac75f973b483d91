use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use serde_json::Value;
use typedb_driver::{Credentials, DriverOptions, TransactionType, TypeDBDriver};

use super::executor::{ExecutionError, StatementExecutor};
use crate::config::TypeDbConfig;

/// [`StatementExecutor`] backed by one TypeDB database.
pub struct TypeDbExecutor {
    driver: TypeDBDriver,
    database: String,
}

impl TypeDbExecutor {
    pub async fn connect(config: &TypeDbConfig) -> Result<Self, ExecutionError> {
        log::info!(
            "Connecting to TypeDB at {} (database `{}`, tls={})",
            config.address,
            config.database,
            config.tls_enabled
        );
        let options = DriverOptions::new(config.tls_enabled, None)
            .map_err(|e| ExecutionError::Connection(e.to_string()))?;
        let driver = TypeDBDriver::new(
            &config.address,
            Credentials::new(&config.username, &config.password),
            options,
        )
        .await
        .map_err(|e| ExecutionError::Connection(e.to_string()))?;

        Ok(TypeDbExecutor {
            driver,
            database: config.database.clone(),
        })
    }

    async fn read_documents(
        &self,
        statement: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, ExecutionError> {
        let transaction = self
            .driver
            .transaction(&self.database, TransactionType::Read)
            .await
            .map_err(|e| ExecutionError::Transaction(e.to_string()))?;
        let answer = transaction
            .query(statement)
            .await
            .map_err(|e| ExecutionError::Query(e.to_string()))?;

        let documents = answer.into_documents();
        let documents = match limit {
            Some(n) => documents.take(n).boxed(),
            None => documents,
        };
        documents
            .map_err(|e| ExecutionError::Query(e.to_string()))
            .and_then(|document| async move {
                serde_json::from_str::<Value>(&document.into_json().to_string())
                    .map_err(|e| ExecutionError::Document(e.to_string()))
            })
            .try_collect()
            .await
    }
}

#[async_trait]
impl StatementExecutor for TypeDbExecutor {
    async fn fetch(&self, statement: &str) -> Result<Vec<Value>, ExecutionError> {
        log::debug!("Executing read:\n{}", statement);
        self.read_documents(statement, None).await
    }

    async fn fetch_one(&self, statement: &str) -> Result<Option<Value>, ExecutionError> {
        log::debug!("Executing single-document read:\n{}", statement);
        Ok(self.read_documents(statement, Some(1)).await?.into_iter().next())
    }

    async fn write(&self, statement: &str) -> Result<(), ExecutionError> {
        log::debug!("Executing write:\n{}", statement);
        let transaction = self
            .driver
            .transaction(&self.database, TransactionType::Write)
            .await
            .map_err(|e| ExecutionError::Transaction(e.to_string()))?;
        let answer = transaction
            .query(statement)
            .await
            .map_err(|e| ExecutionError::Query(e.to_string()))?;
        answer
            .into_rows()
            .map_ok(drop)
            .try_collect::<()>()
            .await
            .map_err(|e| ExecutionError::Query(e.to_string()))?;
        // Dropping an uncommitted transaction closes it without applying the insert.
        transaction
            .commit()
            .await
            .map_err(|e| ExecutionError::Commit(e.to_string()))
    }
}
