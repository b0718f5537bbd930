use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connector configuration: {0}")]
    Config(String),

    #[error("Failed to interact with the Aurora Data API: {0}")]
    Aws(String),

    #[error("Invalid statement parameter: {0}")]
    Parameter(String),

    #[error("Failed to convert value: {0}")]
    Conversion(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Expected at most one row, got {0}")]
    UnexpectedRows(usize),
}

// Generic implementation for AWS SDK errors
impl<E, R> From<aws_sdk_rdsdata::error::SdkError<E, R>> for ConnectorError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: aws_sdk_rdsdata::error::SdkError<E, R>) -> Self {
        ConnectorError::Aws(aws_sdk_rdsdata::error::DisplayErrorContext(&error).to_string())
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(error: serde_json::Error) -> Self {
        ConnectorError::Conversion(format!("json: {error}"))
    }
}

impl From<uuid::Error> for ConnectorError {
    fn from(error: uuid::Error) -> Self {
        ConnectorError::Conversion(format!("uuid: {error}"))
    }
}
