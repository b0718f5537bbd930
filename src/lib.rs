/// Aurora Connector - a client for AWS Aurora Serverless over the Data API.
///
/// Statements are sent as stateless HTTPS calls through `aws-sdk-rdsdata`
/// rather than over a database socket, so a [`Connection`] is just the cluster
/// and secret ARNs plus an SDK client.
///
/// # Layout
///
/// - [`core`]: configuration, the [`DataApi`] transport seam, connections and transactions
/// - [`helpers`]: SQL values, named parameters and result-set marshaling
///
/// # Example
///
/// ```no_run
/// use aurora_connector::{Connection, ConnectorConfig, Params};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     aurora_connector::setup_logging();
///
///     let config = ConnectorConfig::new(
///         "arn:aws:rds:eu-west-1:123456789012:cluster:app",
///         "arn:aws:secretsmanager:eu-west-1:123456789012:secret:app",
///     )
///     .with_database("app");
///     let conn = Connection::connect(config).await;
///
///     let tx = conn.begin().await?;
///     tx.execute(
///         "INSERT INTO events (name, at) VALUES (:name, :at)",
///         Params::new()
///             .bind("name", "signup")
///             .bind("at", chrono::Utc::now()),
///     )
///     .await?;
///     tx.commit().await?;
///
///     if let Some(row) = conn
///         .query_one("SELECT count(*) AS n FROM events", Params::new())
///         .await?
///     {
///         let n: i64 = row.get("n")?;
///         println!("{n} events");
///     }
///     Ok(())
/// }
/// ```
pub mod core;
pub mod errors;
pub mod helpers;

pub use crate::core::config::ConnectorConfig;
pub use crate::core::connection::Connection;
pub use crate::core::transaction::Transaction;
pub use crate::core::transport::{BatchStatement, DataApi, RdsDataApi, Statement};
pub use errors::ConnectorError;
pub use helpers::{BatchResult, Column, FromValue, Params, ResultSet, Row, Value};

/// Configure structured logging with JSON output.
///
/// Reads the filter from `RUST_LOG`, defaulting to `info`. Calling it again
/// after a subscriber is installed does nothing.
///
/// # Example
///
/// ```
/// aurora_connector::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
