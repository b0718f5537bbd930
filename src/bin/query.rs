use anyhow::{Context, Result, bail};
use aurora_connector::{Connection, ConnectorConfig, Params};
use tracing::info;

/// Runs one SQL statement against the configured cluster and prints each row
/// as a JSON object on its own line.
#[tokio::main]
async fn main() -> Result<()> {
    aurora_connector::setup_logging();

    let sql = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if sql.trim().is_empty() {
        bail!("usage: aurora-query <SQL>");
    }

    let config = ConnectorConfig::from_env().context("loading connector config")?;
    let conn = Connection::connect(config).await;

    let result = conn
        .execute(&sql, Params::new())
        .await
        .context("executing statement")?;
    info!(
        rows = result.rows.len(),
        records_updated = result.records_updated,
        "Statement finished"
    );

    for row in &result.rows {
        println!("{}", serde_json::to_string(&row.to_json())?);
    }
    Ok(())
}
