//! Connection handle for an Aurora Serverless cluster.
//!
//! There is no socket behind a `Connection`: every call is a stateless Data API
//! request carrying the cluster and secret ARNs from [`ConnectorConfig`].

use std::sync::Arc;

use tracing::{info, warn};

use super::config::ConnectorConfig;
use super::transaction::Transaction;
use super::transport::{BatchStatement, DataApi, RdsDataApi, Statement};
use crate::errors::ConnectorError;
use crate::helpers::{BatchResult, Params, ResultSet, Row};

#[derive(Clone)]
pub struct Connection {
    config: Arc<ConnectorConfig>,
    transport: Arc<dyn DataApi>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Connects using the default AWS provider chain for credentials and region.
    pub async fn connect(config: ConnectorConfig) -> Self {
        info!(
            resource_arn = %config.resource_arn,
            database = ?config.database,
            "Creating Aurora Data API connection"
        );
        Self::with_transport(config, RdsDataApi::from_env().await)
    }

    pub fn with_transport(config: ConnectorConfig, transport: impl DataApi + 'static) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns an error if parameters cannot be encoded, the Data API call fails,
    /// or the returned records cannot be converted.
    pub async fn execute(&self, sql: &str, params: Params) -> Result<ResultSet, ConnectorError> {
        self.run(Statement::new(sql, params)).await
    }

    /// Runs a statement and returns its rows.
    ///
    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub async fn query(&self, sql: &str, params: Params) -> Result<Vec<Row>, ConnectorError> {
        Ok(self.execute(sql, params).await?.rows)
    }

    /// Runs a statement expected to return zero or one row.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::UnexpectedRows`] if more than one row comes back.
    pub async fn query_one(&self, sql: &str, params: Params) -> Result<Option<Row>, ConnectorError> {
        single_row(self.query(sql, params).await?)
    }

    /// Runs `sql` once for each parameter set in a single Data API call.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Parameter`] if `parameter_sets` is empty.
    pub async fn batch_execute(
        &self,
        sql: &str,
        parameter_sets: Vec<Params>,
    ) -> Result<BatchResult, ConnectorError> {
        self.run_batch(sql, parameter_sets, None).await
    }

    /// # Errors
    ///
    /// Returns an error if the Data API refuses to open a transaction.
    pub async fn begin(&self) -> Result<Transaction, ConnectorError> {
        let id = self.transport.begin_transaction(&self.config).await?;
        info!(transaction_id = %id, "Transaction started");
        Ok(Transaction::new(self.clone(), id))
    }

    pub(crate) async fn run(&self, statement: Statement) -> Result<ResultSet, ConnectorError> {
        self.transport
            .execute_statement(&self.config, &statement)
            .await
            .inspect_err(|e| warn!(sql = %statement.sql, "Statement failed: {}", e))
    }

    pub(crate) async fn run_batch(
        &self,
        sql: &str,
        parameter_sets: Vec<Params>,
        transaction_id: Option<&str>,
    ) -> Result<BatchResult, ConnectorError> {
        if parameter_sets.is_empty() {
            return Err(ConnectorError::Parameter(
                "batch requires at least one parameter set".into(),
            ));
        }
        let statement = BatchStatement {
            sql: sql.to_string(),
            parameter_sets,
            transaction_id: transaction_id.map(str::to_string),
        };
        self.transport
            .batch_execute_statement(&self.config, &statement)
            .await
            .inspect_err(|e| warn!(sql = %statement.sql, "Batch statement failed: {}", e))
    }

    pub(crate) fn transport(&self) -> &dyn DataApi {
        self.transport.as_ref()
    }
}

pub(crate) fn single_row(mut rows: Vec<Row>) -> Result<Option<Row>, ConnectorError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(ConnectorError::UnexpectedRows(n)),
    }
}
