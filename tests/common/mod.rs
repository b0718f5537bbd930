//! In-memory `DataApi` shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aurora_connector::{
    BatchResult, BatchStatement, Column, Connection, ConnectorConfig, ConnectorError, DataApi,
    ResultSet, Row, Statement, Value,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Execute(Statement),
    Batch(BatchStatement),
    Begin,
    Commit(String),
    Rollback(String),
}

/// In-memory transport that records every call and answers with canned rows.
#[derive(Clone, Default)]
pub struct FakeDataApi {
    began: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<Call>>>,
    rows: Arc<Mutex<Vec<Vec<Value>>>>,
}

impl FakeDataApi {
    pub fn with_rows(rows: Vec<Vec<Value>>) -> Self {
        let fake = Self::default();
        *fake.rows.lock().unwrap() = rows;
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataApi for FakeDataApi {
    async fn execute_statement(
        &self,
        _config: &ConnectorConfig,
        statement: &Statement,
    ) -> Result<ResultSet, ConnectorError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Execute(statement.clone()));

        let columns = vec![Column::new("id", Some("int8"))];
        let shared: Arc<[Column]> = columns.clone().into();
        let rows = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|values| Row::new(Arc::clone(&shared), values))
            .collect();
        Ok(ResultSet {
            columns,
            rows,
            records_updated: 0,
            generated_fields: Vec::new(),
        })
    }

    async fn batch_execute_statement(
        &self,
        _config: &ConnectorConfig,
        statement: &BatchStatement,
    ) -> Result<BatchResult, ConnectorError> {
        self.calls.lock().unwrap().push(Call::Batch(statement.clone()));
        Ok(BatchResult {
            generated_fields: vec![Vec::new(); statement.parameter_sets.len()],
        })
    }

    async fn begin_transaction(&self, _config: &ConnectorConfig) -> Result<String, ConnectorError> {
        self.calls.lock().unwrap().push(Call::Begin);
        let n = self.began.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("tx-{n}"))
    }

    async fn commit_transaction(
        &self,
        _config: &ConnectorConfig,
        transaction_id: &str,
    ) -> Result<String, ConnectorError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Commit(transaction_id.to_string()));
        Ok("Transaction Committed".to_string())
    }

    async fn rollback_transaction(
        &self,
        _config: &ConnectorConfig,
        transaction_id: &str,
    ) -> Result<String, ConnectorError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Rollback(transaction_id.to_string()));
        Ok("Rollback Complete".to_string())
    }
}

pub fn connection(fake: &FakeDataApi) -> Connection {
    let config = ConnectorConfig::new("arn:cluster", "arn:secret").with_database("app");
    Connection::with_transport(config, fake.clone())
}
