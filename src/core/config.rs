use std::env;

use crate::errors::ConnectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub continue_after_timeout: bool,
}

impl ConnectorConfig {
    pub fn new(resource_arn: impl Into<String>, secret_arn: impl Into<String>) -> Self {
        Self {
            resource_arn: resource_arn.into(),
            secret_arn: secret_arn.into(),
            database: None,
            schema: None,
            continue_after_timeout: false,
        }
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn with_continue_after_timeout(mut self, enabled: bool) -> Self {
        self.continue_after_timeout = enabled;
        self
    }

    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a flag is not a boolean.
    pub fn from_env() -> Result<Self, ConnectorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a flag is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConnectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| ConnectorError::Config(format!("{key} is not set")))
        };

        let continue_after_timeout = match get("AURORA_CONTINUE_AFTER_TIMEOUT") {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ConnectorError::Config(format!(
                    "AURORA_CONTINUE_AFTER_TIMEOUT: expected a boolean, got {raw:?}"
                ))
            })?,
        };

        Ok(Self {
            resource_arn: required("AURORA_RESOURCE_ARN")?,
            secret_arn: required("AURORA_SECRET_ARN")?,
            database: get("AURORA_DATABASE"),
            schema: get("AURORA_SCHEMA"),
            continue_after_timeout,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
