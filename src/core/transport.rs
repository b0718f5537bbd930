//! The seam between the connector and the Data API.

use async_trait::async_trait;
use aws_sdk_rdsdata::Client as RdsDataClient;
use aws_sdk_rdsdata::types::RecordsFormatType;
use tracing::debug;

use super::config::ConnectorConfig;
use crate::errors::ConnectorError;
use crate::helpers::{BatchResult, Params, ResultSet};

/// A single SQL statement with its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
    pub transaction_id: Option<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params,
            transaction_id: None,
        }
    }

    #[must_use]
    pub fn in_transaction(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}

/// One SQL statement run once per parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatement {
    pub sql: String,
    pub parameter_sets: Vec<Params>,
    pub transaction_id: Option<String>,
}

#[async_trait]
pub trait DataApi: Send + Sync {
    async fn execute_statement(
        &self,
        config: &ConnectorConfig,
        statement: &Statement,
    ) -> Result<ResultSet, ConnectorError>;

    async fn batch_execute_statement(
        &self,
        config: &ConnectorConfig,
        statement: &BatchStatement,
    ) -> Result<BatchResult, ConnectorError>;

    /// Returns the new transaction id.
    async fn begin_transaction(&self, config: &ConnectorConfig) -> Result<String, ConnectorError>;

    /// Returns the transaction status reported by the service.
    async fn commit_transaction(
        &self,
        config: &ConnectorConfig,
        transaction_id: &str,
    ) -> Result<String, ConnectorError>;

    /// Returns the transaction status reported by the service.
    async fn rollback_transaction(
        &self,
        config: &ConnectorConfig,
        transaction_id: &str,
    ) -> Result<String, ConnectorError>;
}

/// [`DataApi`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct RdsDataApi {
    client: RdsDataClient,
}

impl RdsDataApi {
    pub fn new(client: RdsDataClient) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS provider chain.
    pub async fn from_env() -> Self {
        let shared = aws_config::from_env().load().await;
        Self::new(RdsDataClient::new(&shared))
    }
}

#[async_trait]
impl DataApi for RdsDataApi {
    async fn execute_statement(
        &self,
        config: &ConnectorConfig,
        statement: &Statement,
    ) -> Result<ResultSet, ConnectorError> {
        let parameters = statement.params.to_sql_parameters()?;
        debug!(
            sql = %statement.sql,
            parameters = parameters.len(),
            transaction_id = ?statement.transaction_id,
            "execute_statement"
        );

        let output = self
            .client
            .execute_statement()
            .resource_arn(&config.resource_arn)
            .secret_arn(&config.secret_arn)
            .set_database(config.database.clone())
            .set_schema(config.schema.clone())
            .sql(&statement.sql)
            .set_parameters(Some(parameters))
            .set_transaction_id(statement.transaction_id.clone())
            .include_result_metadata(true)
            .continue_after_timeout(config.continue_after_timeout)
            .format_records_as(RecordsFormatType::None)
            .send()
            .await?;

        ResultSet::from_output(&output)
    }

    async fn batch_execute_statement(
        &self,
        config: &ConnectorConfig,
        statement: &BatchStatement,
    ) -> Result<BatchResult, ConnectorError> {
        let parameter_sets = statement
            .parameter_sets
            .iter()
            .map(Params::to_sql_parameters)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            sql = %statement.sql,
            parameter_sets = parameter_sets.len(),
            transaction_id = ?statement.transaction_id,
            "batch_execute_statement"
        );

        let output = self
            .client
            .batch_execute_statement()
            .resource_arn(&config.resource_arn)
            .secret_arn(&config.secret_arn)
            .set_database(config.database.clone())
            .set_schema(config.schema.clone())
            .sql(&statement.sql)
            .set_parameter_sets(Some(parameter_sets))
            .set_transaction_id(statement.transaction_id.clone())
            .send()
            .await?;

        BatchResult::from_output(&output)
    }

    async fn begin_transaction(&self, config: &ConnectorConfig) -> Result<String, ConnectorError> {
        let output = self
            .client
            .begin_transaction()
            .resource_arn(&config.resource_arn)
            .secret_arn(&config.secret_arn)
            .set_database(config.database.clone())
            .set_schema(config.schema.clone())
            .send()
            .await?;

        output
            .transaction_id()
            .map(str::to_string)
            .ok_or_else(|| ConnectorError::Transaction("no transaction id returned".into()))
    }

    async fn commit_transaction(
        &self,
        config: &ConnectorConfig,
        transaction_id: &str,
    ) -> Result<String, ConnectorError> {
        let output = self
            .client
            .commit_transaction()
            .resource_arn(&config.resource_arn)
            .secret_arn(&config.secret_arn)
            .transaction_id(transaction_id)
            .send()
            .await?;

        Ok(output.transaction_status().unwrap_or_default().to_string())
    }

    async fn rollback_transaction(
        &self,
        config: &ConnectorConfig,
        transaction_id: &str,
    ) -> Result<String, ConnectorError> {
        let output = self
            .client
            .rollback_transaction()
            .resource_arn(&config.resource_arn)
            .secret_arn(&config.secret_arn)
            .transaction_id(transaction_id)
            .send()
            .await?;

        Ok(output.transaction_status().unwrap_or_default().to_string())
    }
}
