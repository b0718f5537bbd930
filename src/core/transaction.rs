use tracing::{info, warn};

use super::connection::{Connection, single_row};
use super::transport::Statement;
use crate::errors::ConnectorError;
use crate::helpers::{BatchResult, Params, ResultSet, Row};

/// An open Data API transaction.
///
/// Consumed by [`Transaction::commit`] or [`Transaction::rollback`]. If it is
/// dropped while still open, the service rolls it back once it times out.
#[derive(Debug)]
pub struct Transaction {
    connection: Connection,
    id: String,
    finished: bool,
}

impl Transaction {
    pub(crate) fn new(connection: Connection, id: String) -> Self {
        Self {
            connection,
            id,
            finished: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub async fn execute(&self, sql: &str, params: Params) -> Result<ResultSet, ConnectorError> {
        self.connection
            .run(Statement::new(sql, params).in_transaction(&self.id))
            .await
    }

    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub async fn query(&self, sql: &str, params: Params) -> Result<Vec<Row>, ConnectorError> {
        Ok(self.execute(sql, params).await?.rows)
    }

    /// # Errors
    ///
    /// Returns [`ConnectorError::UnexpectedRows`] if more than one row comes back.
    pub async fn query_one(&self, sql: &str, params: Params) -> Result<Option<Row>, ConnectorError> {
        single_row(self.query(sql, params).await?)
    }

    /// # Errors
    ///
    /// See [`Connection::batch_execute`].
    pub async fn batch_execute(
        &self,
        sql: &str,
        parameter_sets: Vec<Params>,
    ) -> Result<BatchResult, ConnectorError> {
        self.connection
            .run_batch(sql, parameter_sets, Some(&self.id))
            .await
    }

    /// Commits and returns the status reported by the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit call fails; the transaction is then left
    /// for the service to roll back.
    pub async fn commit(mut self) -> Result<String, ConnectorError> {
        self.finished = true;
        let status = self
            .connection
            .transport()
            .commit_transaction(self.connection.config(), &self.id)
            .await?;
        info!(transaction_id = %self.id, status = %status, "Transaction committed");
        Ok(status)
    }

    /// Rolls back and returns the status reported by the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback call fails.
    pub async fn rollback(mut self) -> Result<String, ConnectorError> {
        self.finished = true;
        let status = self
            .connection
            .transport()
            .rollback_transaction(self.connection.config(), &self.id)
            .await?;
        info!(transaction_id = %self.id, status = %status, "Transaction rolled back");
        Ok(status)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                transaction_id = %self.id,
                "Transaction dropped without commit or rollback"
            );
        }
    }
}
