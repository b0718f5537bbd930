//! Result-set marshaling: Data API records into typed rows.

use std::sync::Arc;

use aws_sdk_rdsdata::operation::batch_execute_statement::BatchExecuteStatementOutput;
use aws_sdk_rdsdata::operation::execute_statement::ExecuteStatementOutput;
use aws_sdk_rdsdata::types::{ArrayValue, ColumnMetadata, Field};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::Map;
use uuid::Uuid;

use super::parameters::{DATE_FORMAT, TIME_FORMAT, TIMESTAMP_FORMAT};
use super::value::{FromValue, Value};
use crate::errors::ConnectorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    /// Database type name as reported by the engine, e.g. `int4` or `DATETIME`.
    pub type_name: Option<String>,
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: Option<&str>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(str::to_string),
            nullable: true,
        }
    }

    fn from_metadata(index: usize, meta: &ColumnMetadata) -> Self {
        Self {
            name: meta
                .label()
                .or_else(|| meta.name())
                .filter(|n| !n.is_empty())
                .map_or_else(|| index.to_string(), str::to_string),
            type_name: meta.type_name().map(str::to_string),
            // 0 = columnNoNulls, 1 = columnNullable, 2 = unknown
            nullable: meta.nullable() != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[Column]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[Column]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c.name == name)?;
        self.values.get(index)
    }

    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// # Errors
    ///
    /// Returns an error if the column does not exist or has an incompatible type.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, ConnectorError> {
        let value = self
            .value(name)
            .ok_or_else(|| ConnectorError::Conversion(format!("no column named {name:?}")))?;
        T::from_value(value)
            .map_err(|e| ConnectorError::Conversion(format!("column {name:?}: {}", inner(e))))
    }

    /// # Errors
    ///
    /// Returns an error if the index is out of range or the value has an incompatible type.
    pub fn get_at<T: FromValue>(&self, index: usize) -> Result<T, ConnectorError> {
        let value = self
            .value_at(index)
            .ok_or_else(|| ConnectorError::Conversion(format!("no column at index {index}")))?;
        T::from_value(value)
            .map_err(|e| ConnectorError::Conversion(format!("column {index}: {}", inner(e))))
    }

    /// Renders the row as a JSON object keyed by column name. Like
    /// [`Row::value`], the first of several same-named columns wins.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = Map::new();
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.entry(column.name.clone())
                .or_insert_with(|| value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

fn inner(error: ConnectorError) -> String {
    match error {
        ConnectorError::Conversion(msg) => msg,
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub records_updated: i64,
    pub generated_fields: Vec<Value>,
}

impl ResultSet {
    /// # Errors
    ///
    /// Returns an error if a field cannot be converted for its column type.
    pub fn from_output(output: &ExecuteStatementOutput) -> Result<Self, ConnectorError> {
        let width = output.records().iter().map(Vec::len).max().unwrap_or(0);
        let metadata = output.column_metadata();
        let columns: Vec<Column> = (0..width.max(metadata.len()))
            .map(|i| match metadata.get(i) {
                Some(meta) => Column::from_metadata(i, meta),
                None => Column::new(i.to_string(), None),
            })
            .collect();
        let shared: Arc<[Column]> = columns.clone().into();

        let rows = output
            .records()
            .iter()
            .map(|record| {
                let values = record
                    .iter()
                    .zip(shared.iter())
                    .map(|(field, column)| field_to_value(field, column.type_name.as_deref()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Row::new(Arc::clone(&shared), values))
            })
            .collect::<Result<Vec<_>, ConnectorError>>()?;

        let generated_fields = output
            .generated_fields()
            .iter()
            .map(|f| field_to_value(f, None))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            rows,
            records_updated: output.number_of_records_updated(),
            generated_fields,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResult {
    /// Generated fields for each parameter set, in submission order.
    pub generated_fields: Vec<Vec<Value>>,
}

impl BatchResult {
    /// # Errors
    ///
    /// Returns an error if a generated field cannot be converted.
    pub fn from_output(output: &BatchExecuteStatementOutput) -> Result<Self, ConnectorError> {
        let generated_fields = output
            .update_results()
            .iter()
            .map(|result| {
                result
                    .generated_fields()
                    .iter()
                    .map(|f| field_to_value(f, None))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { generated_fields })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Date,
    Time,
    Timestamp,
    Decimal,
    Uuid,
    Json,
    Other,
}

fn column_kind(type_name: Option<&str>) -> ColumnKind {
    let Some(name) = type_name else {
        return ColumnKind::Other;
    };
    match name.trim().to_ascii_lowercase().as_str() {
        "date" => ColumnKind::Date,
        "time" => ColumnKind::Time,
        "timestamp" | "timestamptz" | "datetime" => ColumnKind::Timestamp,
        "decimal" | "numeric" => ColumnKind::Decimal,
        "uuid" => ColumnKind::Uuid,
        "json" | "jsonb" => ColumnKind::Json,
        _ => ColumnKind::Other,
    }
}

/// Converts one Data API field, using the column type name to recover temporal,
/// decimal, UUID and JSON values that arrive as strings.
///
/// # Errors
///
/// Returns an error for malformed strings in typed columns or unknown field kinds.
pub fn field_to_value(field: &Field, type_name: Option<&str>) -> Result<Value, ConnectorError> {
    let value = match field {
        Field::IsNull(_) => Value::Null,
        Field::BooleanValue(b) => Value::Bool(*b),
        Field::LongValue(n) => Value::Long(*n),
        Field::DoubleValue(d) => Value::Double(*d),
        Field::BlobValue(blob) => Value::Blob(blob.as_ref().to_vec()),
        Field::StringValue(s) => string_to_value(s, column_kind(type_name))?,
        Field::ArrayValue(array) => array_to_value(array)?,
        other => {
            return Err(ConnectorError::Conversion(format!(
                "unsupported field {other:?}"
            )));
        }
    };
    Ok(value)
}

fn string_to_value(s: &str, kind: ColumnKind) -> Result<Value, ConnectorError> {
    let value = match kind {
        ColumnKind::Date => Value::Date(parse_date(s)?),
        // Postgres allows 24:00:00 and MySQL TIME is a signed duration up to
        // 838:59:59; anything outside a time of day stays text.
        ColumnKind::Time => parse_time(s).map_or_else(|_| Value::String(s.to_string()), Value::Time),
        ColumnKind::Timestamp => Value::Timestamp(parse_timestamp(s)?),
        ColumnKind::Decimal => Value::Decimal(s.to_string()),
        ColumnKind::Uuid => Value::Uuid(Uuid::parse_str(s)?),
        ColumnKind::Json => Value::Json(serde_json::from_str(s)?),
        ColumnKind::Other => Value::String(s.to_string()),
    };
    Ok(value)
}

fn array_to_value(array: &ArrayValue) -> Result<Value, ConnectorError> {
    fn items<T: Clone>(values: &[Option<T>], wrap: fn(T) -> Value) -> Vec<Value> {
        values
            .iter()
            .map(|v| v.clone().map_or(Value::Null, wrap))
            .collect()
    }

    let items = match array {
        ArrayValue::BooleanValues(v) => items(v, Value::Bool),
        ArrayValue::LongValues(v) => items(v, Value::Long),
        ArrayValue::DoubleValues(v) => items(v, Value::Double),
        ArrayValue::StringValues(v) => items(v, Value::String),
        ArrayValue::ArrayValues(v) => v
            .iter()
            .map(|inner| inner.as_ref().map_or(Ok(Value::Null), array_to_value))
            .collect::<Result<_, _>>()?,
        other => {
            return Err(ConnectorError::Conversion(format!(
                "unsupported array {other:?}"
            )));
        }
    };
    Ok(Value::Array(items))
}

fn bad_temporal(kind: &str, s: &str) -> ConnectorError {
    ConnectorError::Conversion(format!("invalid {kind} {s:?}"))
}

/// Parses `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the string is not a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ConnectorError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| bad_temporal("date", s))
}

/// Parses `HH:MM:SS` with optional fractional seconds.
///
/// # Errors
///
/// Returns an error if the string is not a time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime, ConnectorError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).map_err(|_| bad_temporal("time", s))
}

/// Parses a Data API timestamp. Accepts a space or `T` separator, optional
/// fractional seconds and an optional UTC offset, which is folded into UTC.
///
/// # Errors
///
/// Returns an error if the string is not a timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, ConnectorError> {
    let trimmed = s.trim();
    let mut normalized = trimmed.replacen('T', " ", 1);
    if normalized.ends_with('Z') || normalized.ends_with('z') {
        normalized.pop();
    }

    if let Ok(ts) = NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    DateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f%#z")
        .map(|dt| dt.naive_utc())
        .map_err(|_| bad_temporal("timestamp", s))
}
